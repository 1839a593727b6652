use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::domain::{Applicant, RawApplicantRecord};
use super::extractor::{extract, infer_gender};

/// Location of the bundled applicant export.
pub const DEFAULT_DATASET_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/applicant_cvs.json");

/// Where a batch of raw applicant records comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The bundled export at [`DEFAULT_DATASET_PATH`].
    BuiltIn,
    Path(PathBuf),
    /// An already-received JSON document, e.g. an upload.
    Inline(String),
}

impl DataSource {
    /// Map an optional path override onto a source, falling back to `default_path`.
    pub fn from_override(path: Option<PathBuf>, default_path: &Path) -> Self {
        match path {
            Some(path) => DataSource::Path(path),
            None if default_path == Path::new(DEFAULT_DATASET_PATH) => DataSource::BuiltIn,
            None => DataSource::Path(default_path.to_path_buf()),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::BuiltIn => write!(f, "built-in dataset"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Inline(_) => write!(f, "uploaded document"),
        }
    }
}

/// Failures that abort a batch load. No partial batch is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read applicant data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("applicant data must be a JSON array of {{\"name\", \"cv\"}} objects: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("applicant record {index} has an empty name")]
    MissingName { index: usize },
    #[error("applicant name '{0}' appears more than once in the batch")]
    DuplicateName(String),
}

/// Loads raw applicant exports and normalizes them into [`Applicant`] values.
pub struct ApplicantRepository;

impl ApplicantRepository {
    pub fn load(source: &DataSource) -> Result<Vec<Applicant>, DataSourceError> {
        match source {
            DataSource::BuiltIn => Self::from_path(DEFAULT_DATASET_PATH),
            DataSource::Path(path) => Self::from_path(path),
            DataSource::Inline(document) => Self::from_json_str(document),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Applicant>, DataSourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Applicant>, DataSourceError> {
        let records: Vec<RawApplicantRecord> = serde_json::from_reader(reader)?;
        Self::normalize(records)
    }

    pub fn from_json_str(document: &str) -> Result<Vec<Applicant>, DataSourceError> {
        let records: Vec<RawApplicantRecord> = serde_json::from_str(document)?;
        Self::normalize(records)
    }

    /// Extract every record in order, rejecting empty or repeated names.
    pub fn normalize(records: Vec<RawApplicantRecord>) -> Result<Vec<Applicant>, DataSourceError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut applicants = Vec::with_capacity(records.len());
        let mut misses = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(DataSourceError::MissingName { index });
            }
            if !seen.insert(record.name.clone()) {
                return Err(DataSourceError::DuplicateName(record.name));
            }

            let fields = extract(&record.cv);
            if fields.is_miss() {
                misses += 1;
            }

            applicants.push(Applicant {
                gender: infer_gender(&record.name),
                name: record.name,
                age: fields.age,
                country: fields.country,
                final_score: fields.final_score,
            });
        }

        debug!(misses, "biographies without extractable fields");
        info!(applicants = applicants.len(), "applicant batch loaded");
        Ok(applicants)
    }
}
