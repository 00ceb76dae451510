//! The wizard controller.
//!
//! [`Wizard`] owns the form, the session state and the presenter. Actions
//! that need the backend return a [`Request`]; whoever runs it hands the
//! resulting [`Outcome`] back to [`Wizard::apply_outcome`]. Outcomes are
//! applied in whatever order they arrive: a slow response can overwrite a
//! newer one.

use cvwizard_shared::{
    ApplyResponse, CandidateId, CvWizardError, JobPosting, REQUIRED_MAIN_FIELDS, Section,
    SubmissionPayload, SummaryPayload,
};
use tracing::{debug, info, warn};

use crate::form::{FormModel, ItemId};
use crate::presenter::{JobId, Presenter, Severity};
use crate::serializer;
use crate::stepper::{Advance, Controls, Region, StepController};

pub const MSG_SAVING: &str = "Guardando...";
pub const MSG_UNEXPECTED: &str = "Error inesperado.";
pub const MSG_STEP_ONE_REQUIRED: &str = "Completa tu nombre y email para continuar.";
pub const MSG_SEARCHING: &str = "Buscando ofertas...";
pub const MSG_NO_RESULTS: &str = "No se encontraron ofertas.";
pub const MSG_SEARCH_FAILED: &str = "Error al buscar ofertas.";
pub const MSG_SUMMARY_FAILED: &str = "No se pudieron generar resúmenes.";
pub const MSG_SUMMARY_EMPTY: &str = "No se recibieron sugerencias de resumen.";
pub const MSG_APPLY_NEEDS_SUBMIT: &str = "Primero guarda tu CV para postular.";
pub const MSG_APPLY_OK: &str = "Postulación registrada. Descargando CV...";
pub const MSG_APPLY_FAILED: &str = "No se pudo registrar la postulación.";
pub const MSG_DOWNLOAD_NEEDS_SUBMIT: &str = "Primero guarda tu CV para descargarlo.";

/// A backend call the UI layer should perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Submit(SubmissionPayload),
    GenerateSummary(SummaryPayload),
    SearchJobs { query: String, location: String },
    Apply { candidate_id: CandidateId, job: JobPosting },
    /// Fire-and-forget; produces no outcome.
    Download { candidate_id: CandidateId, style: String },
}

/// The result of running a [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Submitted(cvwizard_shared::Result<CandidateId>),
    SummaryGenerated(cvwizard_shared::Result<Vec<String>>),
    JobsFound(cvwizard_shared::Result<Vec<JobPosting>>),
    Applied(cvwizard_shared::Result<ApplyResponse>),
}

/// Page-session state: where the user is and who they are to the backend.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub steps: StepController,
    pub candidate_id: Option<CandidateId>,
}

/// Controller tying form, steps, requests and presentation together.
#[derive(Debug, Clone)]
pub struct Wizard {
    form: FormModel,
    session: SessionState,
    presenter: Presenter,
    style: String,
}

impl Wizard {
    pub fn new(form: FormModel, default_style: impl Into<String>) -> Self {
        Self {
            form,
            session: SessionState::default(),
            presenter: Presenter::default(),
            style: default_style.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn current_step(&self) -> u8 {
        self.session.steps.current()
    }

    pub fn region(&self) -> Region {
        self.session.steps.region()
    }

    pub fn controls(&self) -> Controls {
        self.session.steps.controls()
    }

    pub fn candidate_id(&self) -> Option<&CandidateId> {
        self.session.candidate_id.as_ref()
    }

    /// Style selected in the template view.
    pub fn style(&self) -> &str {
        &self.style
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn set_main(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.form.main.set(key, value)
    }

    pub fn add_item(&mut self, section: Section) -> Option<ItemId> {
        self.form.sections.add_item(section)
    }

    pub fn add_item_named(&mut self, name: &str) -> Option<ItemId> {
        self.form.sections.add_item_named(name)
    }

    pub fn remove_item(&mut self, section: Section, id: ItemId) -> bool {
        self.form.sections.remove_item(section, id)
    }

    pub fn set_item_field(
        &mut self,
        section: Section,
        id: ItemId,
        key: &str,
        value: impl Into<String>,
    ) -> bool {
        self.form.sections.set_field(section, id, key, value)
    }

    /// Replace the whole form with a draft payload.
    pub fn load_draft(&mut self, payload: &SubmissionPayload) {
        self.form.load_payload(payload);
    }

    pub fn select_style(&mut self, style: impl Into<String>) {
        self.style = style.into();
    }

    /// Act on behalf of a candidate saved in an earlier session.
    pub fn adopt_candidate(&mut self, candidate_id: CandidateId) {
        self.session.candidate_id = Some(candidate_id);
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Advance one step; leaving step 1 needs name and email.
    pub fn next(&mut self) -> bool {
        let complete = REQUIRED_MAIN_FIELDS
            .iter()
            .all(|key| self.form.main.is_filled(key));
        match self.session.steps.next(complete) {
            Advance::Moved(_) => true,
            Advance::Blocked => {
                self.refuse(CvWizardError::validation(MSG_STEP_ONE_REQUIRED));
                false
            }
            Advance::Unavailable => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        self.session.steps.prev()
    }

    pub fn skip_to_templates(&mut self) -> bool {
        self.session.steps.skip_to_templates()
    }

    pub fn back_from_templates(&mut self) -> bool {
        self.session.steps.back_from_templates()
    }

    // -----------------------------------------------------------------------
    // Actions producing requests
    // -----------------------------------------------------------------------

    pub fn submit(&mut self) -> Request {
        self.presenter.set_status(MSG_SAVING, Severity::Info);
        Request::Submit(serializer::submission_payload(&self.form))
    }

    /// Disables the summary trigger until the outcome arrives.
    pub fn generate_summary(&mut self) -> Request {
        self.presenter.set_summary_busy(true);
        Request::GenerateSummary(serializer::summary_payload(&self.form))
    }

    pub fn search_jobs(&mut self, query: &str, location: &str) -> Request {
        self.presenter.set_status(MSG_SEARCHING, Severity::Info);
        Request::SearchJobs {
            query: query.trim().to_string(),
            location: location.trim().to_string(),
        }
    }

    /// Apply to a shown job. Refused without a saved candidate.
    pub fn apply_to_job(&mut self, job: JobId) -> Option<Request> {
        let Some(candidate_id) = self.session.candidate_id.clone() else {
            self.refuse(CvWizardError::precondition(MSG_APPLY_NEEDS_SUBMIT));
            return None;
        };
        let card = self.presenter.jobs().card(job)?;
        Some(Request::Apply {
            candidate_id,
            job: card.job.clone(),
        })
    }

    /// Download the saved résumé in the selected style.
    pub fn download(&mut self) -> Option<Request> {
        let Some(candidate_id) = self.session.candidate_id.clone() else {
            self.refuse(CvWizardError::precondition(MSG_DOWNLOAD_NEEDS_SUBMIT));
            return None;
        };
        Some(Request::Download {
            candidate_id,
            style: self.style.clone(),
        })
    }

    // -----------------------------------------------------------------------
    // Presenter interactions
    // -----------------------------------------------------------------------

    /// Write summary option `index` into the summary field and close the list.
    pub fn choose_summary(&mut self, index: usize) -> bool {
        match self.presenter.take_summary_option(index) {
            Some(text) => self.form.main.set("summary", text),
            None => false,
        }
    }

    pub fn dismiss_summaries(&mut self) {
        self.presenter.dismiss_summary_options();
    }

    pub fn dismiss_alert(&mut self) {
        self.presenter.dismiss_alert();
    }

    // -----------------------------------------------------------------------
    // Outcomes
    // -----------------------------------------------------------------------

    /// Render an outcome. May return a follow-up request (apply → download).
    pub fn apply_outcome(&mut self, outcome: Outcome) -> Option<Request> {
        match outcome {
            Outcome::Submitted(result) => {
                self.on_submitted(result);
                None
            }
            Outcome::SummaryGenerated(result) => {
                self.presenter.set_summary_busy(false);
                match result {
                    Ok(options) if options.is_empty() => {
                        warn!("summary generation returned no options");
                        self.presenter.raise_alert(MSG_SUMMARY_EMPTY);
                    }
                    Ok(options) => {
                        debug!(count = options.len(), "showing summary options");
                        self.presenter.show_summary_options(options);
                    }
                    Err(e) => {
                        warn!(error = %e, "summary generation failed");
                        self.presenter.raise_alert(MSG_SUMMARY_FAILED);
                    }
                }
                None
            }
            Outcome::JobsFound(result) => {
                match result {
                    Ok(jobs) => {
                        let text = if jobs.is_empty() {
                            MSG_NO_RESULTS.to_string()
                        } else {
                            format!("{} ofertas encontradas.", jobs.len())
                        };
                        self.presenter.show_jobs(jobs);
                        self.presenter.set_status(text, Severity::Info);
                    }
                    Err(e) => {
                        warn!(error = %e, "job search failed");
                        self.presenter.set_status(MSG_SEARCH_FAILED, Severity::Error);
                    }
                }
                None
            }
            Outcome::Applied(result) => self.on_applied(result),
        }
    }

    /// Block an action that was refused before reaching the backend.
    fn refuse(&mut self, err: CvWizardError) {
        warn!(error = %err, "action refused");
        self.presenter.raise_alert(err.user_message(MSG_UNEXPECTED));
    }

    fn on_submitted(&mut self, result: cvwizard_shared::Result<CandidateId>) {
        match result {
            Ok(candidate_id) => {
                info!(%candidate_id, "submission accepted");
                self.presenter.set_status(
                    format!("Guardado con ID {candidate_id}."),
                    Severity::Success,
                );
                self.session.candidate_id = Some(candidate_id);
                self.session.steps.enter_search_from_submit();
                self.form.reset();
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                self.presenter
                    .set_status(e.user_message(MSG_UNEXPECTED), Severity::Error);
            }
        }
    }

    fn on_applied(&mut self, result: cvwizard_shared::Result<ApplyResponse>) -> Option<Request> {
        match result {
            Ok(response) if response.is_success() => {
                self.presenter.set_status(MSG_APPLY_OK, Severity::Success);
                self.session
                    .candidate_id
                    .clone()
                    .map(|candidate_id| Request::Download {
                        candidate_id,
                        style: self.style.clone(),
                    })
            }
            Ok(response) => {
                warn!(status = ?response.status, "apply not accepted");
                self.presenter.raise_alert(MSG_APPLY_FAILED);
                None
            }
            Err(e) => {
                warn!(error = %e, "apply failed");
                let message = match e {
                    CvWizardError::Network(_) => MSG_UNEXPECTED.to_string(),
                    _ => MSG_APPLY_FAILED.to_string(),
                };
                self.presenter.raise_alert(message);
                None
            }
        }
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(FormModel::default(), "classic")
    }
}
