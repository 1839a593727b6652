mod common;
mod disparity;
