//! Wizard controller and in-memory form model for the résumé builder.
//!
//! This crate is framework-independent: UI crates bind to [`Wizard`] and
//! run the [`Request`]s it produces through an [`ActionRunner`].

pub mod form;
pub mod presenter;
pub mod runner;
pub mod serializer;
pub mod stepper;
pub mod wizard;

pub use form::{FormModel, Item, ItemId, ItemTemplates, MainFields, SectionStore};
pub use presenter::{JobCard, JobId, JobResults, Presenter, Severity, StatusMessage};
pub use runner::ActionRunner;
pub use stepper::{Controls, Region, StepController, StepLayout, step_layout};
pub use wizard::{Outcome, Request, SessionState, Wizard};
