//! HTTP gateway to the résumé backend.
//!
//! Each operation is a single request/response exchange: no retry, no
//! queuing, no de-duplication. Transport failures map to
//! [`CvWizardError::Network`], non-success statuses to
//! [`CvWizardError::Rejected`] and unexpected bodies to
//! [`CvWizardError::Parse`].

mod opener;

use cvwizard_shared::{
    ApplyRequest, ApplyResponse, CandidateId, CvWizardError, GatewayConfig, JobPosting, Result,
    SubmissionPayload, SubmitErrorBody, SubmitResponse, SummaryPayload, SummaryResponse,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use opener::{DocumentOpener, DownloadTarget, FileDownloader};

/// User-Agent string for backend requests.
const USER_AGENT: &str = concat!("cvwizard/", env!("CARGO_PKG_VERSION"));

/// Message used when a submit rejection carries no `error` field.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Error al guardar.";

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Client for the five backend operations.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: Url,
}

impl Gateway {
    /// Build a gateway from runtime config.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CvWizardError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// The underlying HTTP client, shared with download adapters.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `POST /api/submit`. Returns the new candidate identity.
    #[instrument(skip_all)]
    pub async fn submit(&self, payload: &SubmissionPayload) -> Result<CandidateId> {
        let url = self.endpoint(&["api", "submit"])?;
        let response = self.send(self.client.post(url.clone()).json(payload), &url).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: SubmitErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = error.compose_message(SUBMIT_FALLBACK_MESSAGE);
            warn!(%status, %message, "submit rejected");
            return Err(CvWizardError::rejected(status.as_u16(), message));
        }

        let result: SubmitResponse = read_json(response, &url).await?;
        info!(candidate_id = %result.candidate_id, "submission saved");
        Ok(result.candidate_id)
    }

    /// `POST /api/generate_summary`. Returns the candidate summaries verbatim.
    #[instrument(skip_all)]
    pub async fn generate_summary(&self, payload: &SummaryPayload) -> Result<Vec<String>> {
        let url = self.endpoint(&["api", "generate_summary"])?;
        let response = self.send(self.client.post(url.clone()).json(payload), &url).await?;
        let response = ensure_success(response, &url)?;
        let result: SummaryResponse = read_json(response, &url).await?;
        debug!(options = result.options.len(), "summary options received");
        Ok(result.options)
    }

    /// `GET /api/search?q=..&location=..`. An empty list is a valid outcome.
    #[instrument(skip(self))]
    pub async fn search_jobs(&self, query: &str, location: &str) -> Result<Vec<JobPosting>> {
        let mut url = self.endpoint(&["api", "search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("location", location);

        let response = self.send(self.client.get(url.clone()), &url).await?;
        let response = ensure_success(response, &url)?;
        let jobs: Vec<JobPosting> = read_json(response, &url).await?;
        info!(results = jobs.len(), "job search finished");
        Ok(jobs)
    }

    /// `POST /api/apply` with `{candidate_id, job}`.
    #[instrument(skip_all, fields(candidate_id = %candidate_id))]
    pub async fn apply(&self, candidate_id: &CandidateId, job: &JobPosting) -> Result<ApplyResponse> {
        let url = self.endpoint(&["api", "apply"])?;
        let body = ApplyRequest { candidate_id, job };
        let response = self.send(self.client.post(url.clone()).json(&body), &url).await?;
        let response = ensure_success(response, &url)?;
        let result: ApplyResponse = read_json(response, &url).await?;
        debug!(status = ?result.status, "apply answered");
        Ok(result)
    }

    /// `GET /api/download/:candidate_id?style=..` as a URL to hand to an opener.
    pub fn download_url(&self, candidate_id: &CandidateId, style: &str) -> Result<Url> {
        let mut url = self.endpoint(&["api", "download", candidate_id.as_str()])?;
        url.query_pairs_mut().append_pair("style", style);
        Ok(url)
    }

    /// Build `<base>/<segments...>`, keeping any path prefix on the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CvWizardError::config(format!("backend URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| CvWizardError::Network(format!("{url}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_success(response: Response, url: &Url) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(%url, %status, "backend returned non-success status");
        Err(CvWizardError::rejected(
            status.as_u16(),
            format!("{url}: HTTP {status}"),
        ))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| CvWizardError::Network(format!("{url}: failed to read body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| CvWizardError::parse(format!("{url}: unexpected response body: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cvwizard_shared::FieldMap;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn gateway_for(server: &MockServer) -> Gateway {
        let config = GatewayConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        };
        Gateway::new(&config).expect("build gateway")
    }

    fn payload_without_email() -> SubmissionPayload {
        let mut payload = SubmissionPayload::default();
        payload.main.insert("full_name".into(), "Ana Pérez".into());
        payload.main.insert("email".into(), String::new());
        payload
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let config = GatewayConfig {
            base_url: "https://cv.example.com/app".into(),
            timeout: Duration::from_secs(5),
        };
        let gateway = Gateway::new(&config).unwrap();
        let url = gateway
            .download_url(&CandidateId::new("7"), "modern")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://cv.example.com/app/api/download/7?style=modern"
        );
    }

    #[tokio::test]
    async fn submit_returns_candidate_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "candidate_id": "abc123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = gateway_for(&server)
            .submit(&payload_without_email())
            .await
            .unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[tokio::test]
    async fn submit_rejection_composes_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error": "Missing fields", "fields": ["email"]}),
            ))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .submit(&payload_without_email())
            .await
            .unwrap_err();
        match err {
            CvWizardError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing fields. Faltan: email");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_rejection_without_json_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .submit(&payload_without_email())
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Error inesperado."), SUBMIT_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn summary_sends_reduced_payload() {
        let server = MockServer::start().await;
        let mut payload = SummaryPayload::default();
        payload.main.insert("professional_title".into(), "Ingeniera".into());
        payload
            .skills
            .push(FieldMap::from([("name".to_string(), "Rust".to_string())]));

        Mock::given(method("POST"))
            .and(path("/api/generate_summary"))
            .and(body_json(serde_json::json!({
                "professional_title": "Ingeniera",
                "experiences": [],
                "skills": [{"name": "Rust"}],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"options": ["uno", "dos", "tres"]})),
            )
            .mount(&server)
            .await;

        let options = gateway_for(&server).generate_summary(&payload).await.unwrap();
        assert_eq!(options, vec!["uno", "dos", "tres"]);
    }

    #[tokio::test]
    async fn search_encodes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "rust developer"))
            .and(query_param("location", "São Paulo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"title": "Rust Dev", "company": "Acme", "location": "Remote",
                 "url": "https://jobs.example.com/1", "date_posted": "2024-05-01"}
            ])))
            .mount(&server)
            .await;

        let jobs = gateway_for(&server)
            .search_jobs("rust developer", "São Paulo")
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn search_with_no_results_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let jobs = gateway_for(&server).search_jobs("cobol", "").await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn apply_posts_candidate_and_job() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .and(body_json(serde_json::json!({
                "candidate_id": 12,
                "job": {"title": "Rust Dev", "company": null, "location": null,
                        "url": "https://jobs.example.com/1", "date_posted": null,
                        "source": "Test"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "success", "job_id": 3})),
            )
            .mount(&server)
            .await;

        let job: JobPosting = serde_json::from_value(serde_json::json!({
            "title": "Rust Dev", "url": "https://jobs.example.com/1", "source": "Test"
        }))
        .unwrap();
        let response = gateway_for(&server)
            .apply(&CandidateId::new("12"), &job)
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let config = GatewayConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
        };
        let gateway = Gateway::new(&config).unwrap();
        let err = gateway.search_jobs("rust", "").await.unwrap_err();
        assert!(matches!(err, CvWizardError::Network(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate_summary"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .generate_summary(&SummaryPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CvWizardError::Parse { .. }));
    }
}
