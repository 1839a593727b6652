//! Auditing toolkit for automated decision models that shortlist applicants.
//!
//! The [`workflows::screening`] module hosts the applicant pipeline, the selection models,
//! and the fairness metrics. [`config`], [`telemetry`] and [`error`] carry the ambient
//! application concerns shared with the service binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
