//! Executes wizard requests against the backend.

use std::sync::Arc;

use cvwizard_gateway::{DocumentOpener, DownloadTarget, Gateway};
use tracing::{instrument, warn};

use crate::wizard::{Outcome, Request, Wizard};

/// Runs [`Request`]s with a gateway, handing downloads to an opener.
#[derive(Clone)]
pub struct ActionRunner {
    gateway: Gateway,
    opener: Arc<dyn DocumentOpener>,
}

impl ActionRunner {
    pub fn new(gateway: Gateway, opener: Arc<dyn DocumentOpener>) -> Self {
        Self { gateway, opener }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Perform one request. Downloads are opened and yield no outcome.
    #[instrument(skip_all, fields(request = request_name(&request)))]
    pub async fn run(&self, request: Request) -> Option<Outcome> {
        match request {
            Request::Submit(payload) => Some(Outcome::Submitted(self.gateway.submit(&payload).await)),
            Request::GenerateSummary(payload) => Some(Outcome::SummaryGenerated(
                self.gateway.generate_summary(&payload).await,
            )),
            Request::SearchJobs { query, location } => Some(Outcome::JobsFound(
                self.gateway.search_jobs(&query, &location).await,
            )),
            Request::Apply { candidate_id, job } => Some(Outcome::Applied(
                self.gateway.apply(&candidate_id, &job).await,
            )),
            Request::Download {
                candidate_id,
                style,
            } => {
                match self.gateway.download_url(&candidate_id, &style) {
                    Ok(url) => self.opener.open(DownloadTarget {
                        url,
                        candidate_id,
                        style,
                    }),
                    Err(e) => warn!(error = %e, "could not build download URL"),
                }
                None
            }
        }
    }

    /// Run `request` and every follow-up it produces, applying each outcome.
    pub async fn drive(&self, wizard: &mut Wizard, request: Request) {
        let mut pending = Some(request);
        while let Some(request) = pending.take() {
            if let Some(outcome) = self.run(request).await {
                pending = wizard.apply_outcome(outcome);
            }
        }
    }
}

impl std::fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRunner")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::Submit(_) => "submit",
        Request::GenerateSummary(_) => "generate_summary",
        Request::SearchJobs { .. } => "search_jobs",
        Request::Apply { .. } => "apply",
        Request::Download { .. } => "download",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use cvwizard_shared::{GatewayConfig, Section};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::presenter::{JobId, Severity};

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<DownloadTarget>>,
    }

    impl DocumentOpener for RecordingOpener {
        fn open(&self, target: DownloadTarget) {
            self.opened.lock().unwrap().push(target);
        }
    }

    fn runner_for(server: &MockServer) -> (ActionRunner, Arc<RecordingOpener>) {
        let config = GatewayConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        };
        let opener = Arc::new(RecordingOpener::default());
        let runner = ActionRunner::new(Gateway::new(&config).unwrap(), opener.clone());
        (runner, opener)
    }

    #[tokio::test]
    async fn missing_email_rejection_reaches_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"error": "Missing fields", "fields": ["email"]}),
            ))
            .mount(&server)
            .await;
        let (runner, _) = runner_for(&server);

        let mut wizard = Wizard::default();
        wizard.set_main("full_name", "Ana");
        let request = wizard.submit();
        runner.drive(&mut wizard, request).await;

        let status = wizard.presenter().status().unwrap();
        assert_eq!(status.text, "Missing fields. Faltan: email");
        assert_eq!(status.severity, Severity::Error);
    }

    #[tokio::test]
    async fn submit_search_apply_download_flow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "candidate_id": 7})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"title": "Rust Dev", "company": "Acme", "location": "Remote",
                 "url": "https://jobs.example.com/1", "date_posted": "2024-05-01"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "success", "job_id": 1})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let (runner, opener) = runner_for(&server);

        let mut wizard = Wizard::default();
        wizard.set_main("full_name", "Ana");
        wizard.set_main("email", "ana@example.com");
        let request = wizard.submit();
        runner.drive(&mut wizard, request).await;
        assert_eq!(wizard.current_step(), 5);
        assert_eq!(wizard.form().sections.items(Section::Skills).len(), 1);

        let request = wizard.search_jobs("rust", "");
        runner.drive(&mut wizard, request).await;

        let request = wizard.apply_to_job(JobId(0)).unwrap();
        runner.drive(&mut wizard, request).await;

        let opened = opener.opened.lock().unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].candidate_id.as_str(), "7");
        assert_eq!(opened[0].style, "classic");
        assert!(opened[0].url.as_str().ends_with("/api/download/7?style=classic"));
    }

    #[tokio::test]
    async fn apply_without_identity_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let (_runner, opener) = runner_for(&server);

        let mut wizard = Wizard::default();
        wizard.apply_outcome(crate::wizard::Outcome::JobsFound(Ok(vec![Default::default()])));
        assert!(wizard.apply_to_job(JobId(0)).is_none());
        assert!(wizard.presenter().alert().is_some());
        assert!(opener.opened.lock().unwrap().is_empty());
    }
}
