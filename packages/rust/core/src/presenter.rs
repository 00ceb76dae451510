//! UI-visible outcome state: status line, blocking alert, job cards and
//! summary options.

use cvwizard_shared::JobPosting;

/// Severity tag of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// The single status message currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

/// Identity of a job card within the current result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub usize);

/// One rendered job result.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub id: JobId,
    pub job: JobPosting,
}

/// Contents of the job results region.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JobResults {
    /// Nothing searched yet.
    #[default]
    Idle,
    /// A search came back empty.
    NoResults,
    Cards(Vec<JobCard>),
}

impl JobResults {
    pub fn card(&self, id: JobId) -> Option<&JobCard> {
        match self {
            Self::Cards(cards) => cards.iter().find(|c| c.id == id),
            _ => None,
        }
    }
}

/// Rendered state derived from gateway outcomes.
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    status: Option<StatusMessage>,
    alert: Option<String>,
    jobs: JobResults,
    summary_options: Option<Vec<String>>,
    summary_busy: bool,
}

impl Presenter {
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Replace the status line.
    pub fn set_status(&mut self, text: impl Into<String>, severity: Severity) {
        self.status = Some(StatusMessage {
            text: text.into(),
            severity,
        });
    }

    /// Blocking message the user has to dismiss.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn raise_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn jobs(&self) -> &JobResults {
        &self.jobs
    }

    /// Render a fresh result set, numbering cards from zero.
    pub fn show_jobs(&mut self, jobs: Vec<JobPosting>) {
        self.jobs = if jobs.is_empty() {
            JobResults::NoResults
        } else {
            JobResults::Cards(
                jobs.into_iter()
                    .enumerate()
                    .map(|(i, job)| JobCard { id: JobId(i), job })
                    .collect(),
            )
        };
    }

    /// Open summary options, if a list is being shown.
    pub fn summary_options(&self) -> Option<&[String]> {
        self.summary_options.as_deref()
    }

    pub fn show_summary_options(&mut self, options: Vec<String>) {
        self.summary_options = Some(options);
    }

    /// Close the option list, returning option `index` if it exists.
    pub fn take_summary_option(&mut self, index: usize) -> Option<String> {
        let chosen = self.summary_options.as_ref()?.get(index).cloned()?;
        self.summary_options = None;
        Some(chosen)
    }

    pub fn dismiss_summary_options(&mut self) {
        self.summary_options = None;
    }

    /// Whether the generate-summary trigger is disabled awaiting a response.
    pub fn summary_busy(&self) -> bool {
        self.summary_busy
    }

    pub fn set_summary_busy(&mut self, busy: bool) {
        self.summary_busy = busy;
    }
}
