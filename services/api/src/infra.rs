use evalu8::config::AuditConfig;
use evalu8::workflows::screening::{AuditSession, DataSource, DataSourceError};
use metrics_exporter_prometheus::PrometheusHandle;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) sessions: SessionStore,
    pub(crate) audit: AuditConfig,
}

/// Holds the single audit session shared by every handler.
///
/// The session is created from the configured dataset on first use and replaced wholesale
/// on upload.
#[derive(Default, Clone)]
pub(crate) struct SessionStore {
    current: Arc<Mutex<Option<AuditSession>>>,
}

impl SessionStore {
    pub(crate) fn replace(&self, session: AuditSession) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        info!(
            source = session.source(),
            applicants = session.applicants().len(),
            "audit session replaced"
        );
        *guard = Some(session);
    }

    /// Run `f` against the current session, loading `fallback` first when none exists yet.
    pub(crate) fn with_session<T>(
        &self,
        fallback: &DataSource,
        f: impl FnOnce(&mut AuditSession) -> T,
    ) -> Result<T, DataSourceError> {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let session = match guard.take() {
            Some(session) => session,
            None => {
                let session = AuditSession::from_source(fallback)?;
                info!(source = session.source(), "audit session loaded on first use");
                session
            }
        };
        Ok(f(guard.insert(session)))
    }
}

/// Default dataset for requests that arrive before any upload.
pub(crate) fn default_source(config: &AuditConfig) -> DataSource {
    DataSource::from_override(None, &config.data_path)
}

/// Seeded generator when a seed is given, entropy otherwise.
pub(crate) fn rng_for(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
