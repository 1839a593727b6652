use crate::infra::{default_source, rng_for, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use evalu8::error::AppError;
use evalu8::workflows::screening::{
    run_all_models, to_csv_string, AuditReport, AuditSession, DataSource, ModelId, ModelRun,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub(crate) struct ModelRunRequest {
    pub(crate) model: String,
    #[serde(default)]
    pub(crate) k: Option<usize>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RunAllRequest {
    #[serde(default)]
    pub(crate) k: Option<usize>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuditRequest {
    pub(crate) model: String,
    #[serde(default)]
    pub(crate) k: Option<usize>,
    #[serde(default)]
    pub(crate) runs: Option<usize>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    pub(crate) source: String,
    pub(crate) applicants: usize,
    pub(crate) loaded_at: DateTime<Utc>,
}

pub(crate) fn audit_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/applicants", post(upload_applicants_endpoint))
        .route("/api/v1/models/run", post(run_model_endpoint))
        .route("/api/v1/models/run-all", post(run_all_models_endpoint))
        .route("/api/v1/audit", post(audit_endpoint))
        .route("/api/v1/audit/export", get(export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Replace the session with an uploaded `[{name, cv}]` document.
pub(crate) async fn upload_applicants_endpoint(
    Extension(state): Extension<AppState>,
    body: String,
) -> Result<Json<UploadResponse>, AppError> {
    let session = AuditSession::from_source(&DataSource::Inline(body)).map_err(|err| {
        warn!(error = %err, "applicant upload rejected");
        err
    })?;

    let response = UploadResponse {
        source: session.source().to_string(),
        applicants: session.applicants().len(),
        loaded_at: Utc::now(),
    };
    state.sessions.replace(session);
    Ok(Json(response))
}

pub(crate) async fn run_model_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ModelRunRequest>,
) -> Result<Json<ModelRun>, AppError> {
    let model: ModelId = payload.model.parse()?;
    let k = payload.k.unwrap_or(state.audit.top_k);
    let mut rng = rng_for(payload.seed.or(state.audit.random_seed));

    let run = state
        .sessions
        .with_session(&default_source(&state.audit), |session| {
            session.run(model, k, &mut rng).clone()
        })?;

    debug!(%model, k, selected = run.selected.len(), "model run served");
    Ok(Json(run))
}

pub(crate) async fn run_all_models_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RunAllRequest>,
) -> Result<Json<BTreeMap<ModelId, Vec<String>>>, AppError> {
    let k = payload.k.unwrap_or(state.audit.top_k);
    let mut rng = rng_for(payload.seed.or(state.audit.random_seed));

    let results = state
        .sessions
        .with_session(&default_source(&state.audit), |session| {
            run_all_models(session.applicants(), k, &mut rng)
        })?;
    Ok(Json(results))
}

/// Run a model and audit the shortlist; the run becomes the session's last run only when
/// the audit succeeds.
///
/// Robustness re-runs hold the session lock, so the work runs on the blocking pool.
pub(crate) async fn audit_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AuditRequest>,
) -> Result<Json<AuditReport>, AppError> {
    let model: ModelId = payload.model.parse()?;
    let k = payload.k.unwrap_or(state.audit.top_k);
    let runs = payload.runs.unwrap_or(state.audit.robustness_runs);
    let mut rng = rng_for(payload.seed.or(state.audit.random_seed));

    let sessions = state.sessions.clone();
    let source = default_source(&state.audit);
    let outcome = tokio::task::spawn_blocking(move || {
        sessions.with_session(&source, |session| session.audit(model, k, runs, &mut rng))
    })
    .await
    .map_err(std::io::Error::other)?;

    let report = outcome??;
    debug!(%model, k, runs, "audit served");
    Ok(Json(report))
}

/// Augmented rows of the last run as a CSV download.
pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .sessions
        .with_session(&default_source(&state.audit), |session| {
            session.last_run().map(|_| session.augmented_rows())
        })?
        .ok_or(AppError::NoModelRun)?;

    let document = to_csv_string(&rows)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"augmented_applicants.csv\"",
            ),
        ],
        document,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::SessionStore;
    use axum::body::Body;
    use axum::http::Request;
    use evalu8::config::AuditConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const UPLOAD: &str = r#"[
        {"name": "Clara Jansen", "cv": "Clara is a 31-year-old backend engineer from Netherlands with a final score of 92.5."},
        {"name": "Ethan Brooks", "cv": "Ethan is a 27-year-old machine learning engineer from United States with a final score of 95."},
        {"name": "Hugo Visser", "cv": "Hugo is a 30-year-old platform engineer from Netherlands with a final score of 89.5."}
    ]"#;

    fn app(ready: bool) -> axum::Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            sessions: SessionStore::default(),
            audit: AuditConfig::default(),
        };
        audit_routes().layer(Extension(state))
    }

    fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .expect("request builds")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body reads");
        (status, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_and_readiness_report_status() {
        let app = app(false);

        let (status, body) = send(&app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["status"], "ok");

        let (status, body) = send(&app, get_request("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(&body)["status"], "initializing");
    }

    #[tokio::test]
    async fn uploaded_batch_replaces_the_default_dataset() {
        let app = app(true);

        let (status, body) = send(&app, post_json("/api/v1/applicants", UPLOAD)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["applicants"], 3);

        let (status, body) = send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_3", "k": 5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["model"], "model_3");
        assert_eq!(body["selected"], json!(["Clara Jansen", "Hugo Visser"]));
    }

    #[tokio::test]
    async fn requests_before_upload_use_the_configured_dataset() {
        let app = app(true);

        let (status, body) = send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_1", "k": 2}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body)["selected"],
            json!(["Ethan Brooks", "Julia Meyer"])
        );
    }

    #[tokio::test]
    async fn unknown_models_are_bad_requests() {
        let app = app(true);
        let (status, body) = send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_42"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json_body(&body)["error"]
            .as_str()
            .expect("error message")
            .contains("model_42"));
    }

    #[tokio::test]
    async fn malformed_uploads_are_unprocessable_and_keep_the_session() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;

        let (status, _) = send(&app, post_json("/api/v1/applicants", r#"{"name": "x"}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_1", "k": 10}"#),
        )
        .await;
        assert_eq!(json_body(&body)["selected"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn run_all_returns_every_model() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;

        let (status, body) =
            send(&app, post_json("/api/v1/models/run-all", r#"{"k": 1, "seed": 3}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(&body);
        let keys: Vec<&String> = body.as_object().expect("map").keys().collect();
        assert_eq!(
            keys,
            vec!["model_1", "model_2", "model_3", "model_4", "model_5"]
        );
        assert_eq!(body["model_1"], json!(["Ethan Brooks"]));
    }

    #[tokio::test]
    async fn audit_reports_disparity_and_robustness() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;

        let (status, body) = send(
            &app,
            post_json("/api/v1/audit", r#"{"model": "model_1", "k": 1, "runs": 3}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body = json_body(&body);
        assert_eq!(body["selected"], json!(["Ethan Brooks"]));
        assert_eq!(body["robustness"]["stable_pct"], 100.0);
        assert_eq!(body["attributes"][0]["attribute"], "gender");
    }

    #[tokio::test]
    async fn audit_with_zero_runs_is_rejected() {
        let app = app(true);
        let (status, _) = send(
            &app,
            post_json("/api/v1/audit", r#"{"model": "model_1", "runs": 0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejected_audit_leaves_the_exported_run_untouched() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;
        send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_1", "k": 1}"#),
        )
        .await;
        let (_, before) = send(&app, get_request("/api/v1/audit/export")).await;

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/audit",
                r#"{"model": "model_3", "k": 3, "runs": 0}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, after) = send(&app, get_request("/api/v1/audit/export")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after, before);

        let document = String::from_utf8(after).expect("utf-8 csv");
        assert!(document.lines().skip(1).all(|line| line.ends_with("model_1")));
    }

    #[tokio::test]
    async fn successful_audit_becomes_the_exported_run() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;

        let (status, _) = send(
            &app,
            post_json("/api/v1/audit", r#"{"model": "model_3", "k": 3, "runs": 2}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get_request("/api/v1/audit/export")).await;
        let document = String::from_utf8(body).expect("utf-8 csv");
        let selected: Vec<&str> = document
            .lines()
            .filter(|line| line.ends_with("true,model_3"))
            .collect();
        assert_eq!(selected.len(), 2);
    }

    #[tokio::test]
    async fn export_requires_a_prior_run() {
        let app = app(true);
        send(&app, post_json("/api/v1/applicants", UPLOAD)).await;

        let (status, _) = send(&app, get_request("/api/v1/audit/export")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(
            &app,
            post_json("/api/v1/models/run", r#"{"model": "model_1", "k": 1}"#),
        )
        .await;
        let (status, body) = send(&app, get_request("/api/v1/audit/export")).await;
        assert_eq!(status, StatusCode::OK);

        let document = String::from_utf8(body).expect("utf-8 csv");
        let lines: Vec<&str> = document.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("name,age,age_band"));
        assert!(lines[2].starts_with("Ethan Brooks,27,25-30,United States,95.0,male,true"));
    }
}
