//! The wizard's step state machine.
//!
//! Steps 1 through 5 are form steps sharing one container; step 6 is the
//! template-selection view that replaces it. Control visibility is a pure
//! function of the current step.

use cvwizard_shared::{Section, TOTAL_STEPS};
use tracing::debug;

/// First step; also the initial state.
pub const FIRST_STEP: u8 = 1;

/// Last ordinary form step (job search).
pub const SEARCH_STEP: u8 = 5;

/// Step that shows the submit control.
pub const SUBMIT_STEP: u8 = 4;

/// Template-selection step.
pub const TEMPLATES_STEP: u8 = TOTAL_STEPS;

/// Which UI region is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The form container, showing only the markup tagged with `step`.
    Form { step: u8 },
    /// The template-selection view.
    Templates,
}

/// Visibility of the navigation and action controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev: bool,
    pub next: bool,
    pub submit: bool,
    pub skip_to_templates: bool,
    pub back_from_templates: bool,
}

/// Content of one form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLayout {
    pub title: &'static str,
    pub main_fields: &'static [&'static str],
    pub sections: &'static [Section],
    /// Summary field with its generate action.
    pub summary: bool,
    /// Job search inputs and result cards.
    pub search: bool,
}

const STEP_LAYOUTS: [StepLayout; 5] = [
    StepLayout {
        title: "Datos personales",
        main_fields: &[
            "full_name",
            "professional_title",
            "location",
            "phone",
            "email",
            "linkedin",
            "portfolio",
            "github",
        ],
        sections: &[],
        summary: false,
        search: false,
    },
    StepLayout {
        title: "Experiencia y educación",
        main_fields: &[],
        sections: &[Section::Experiences, Section::Educations],
        summary: false,
        search: false,
    },
    StepLayout {
        title: "Habilidades",
        main_fields: &[],
        sections: &[Section::Skills, Section::Languages, Section::Certifications],
        summary: false,
        search: false,
    },
    StepLayout {
        title: "Proyectos y resumen",
        main_fields: &["summary"],
        sections: &[Section::Projects, Section::Links],
        summary: true,
        search: false,
    },
    StepLayout {
        title: "Buscar ofertas",
        main_fields: &[],
        sections: &[],
        summary: false,
        search: true,
    },
];

/// Layout of form step `step`, or `None` for step 6 and out-of-range values.
pub fn step_layout(step: u8) -> Option<&'static StepLayout> {
    match step {
        FIRST_STEP..=SEARCH_STEP => STEP_LAYOUTS.get(usize::from(step - 1)),
        _ => None,
    }
}

/// Result of a `next` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(u8),
    /// Step 1's required fields are not filled in.
    Blocked,
    /// No forward transition from here.
    Unavailable,
}

/// Owns `current_step` and the step to return to from template selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepController {
    current: u8,
    saved: u8,
}

impl StepController {
    pub fn new() -> Self {
        Self {
            current: FIRST_STEP,
            saved: FIRST_STEP,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    /// The step `back_from_templates` returns to.
    pub fn saved(&self) -> u8 {
        self.saved
    }

    pub fn in_templates(&self) -> bool {
        self.current == TEMPLATES_STEP
    }

    /// Advance one step. `step_one_complete` is the step-1 guard result.
    pub fn next(&mut self, step_one_complete: bool) -> Advance {
        if self.current >= SEARCH_STEP {
            return Advance::Unavailable;
        }
        if self.current == FIRST_STEP && !step_one_complete {
            debug!("step 1 incomplete, not advancing");
            return Advance::Blocked;
        }
        self.go(self.current + 1);
        Advance::Moved(self.current)
    }

    /// Go back one step. No-op on step 1 and in template selection.
    pub fn prev(&mut self) -> bool {
        if self.current <= FIRST_STEP || self.in_templates() {
            return false;
        }
        self.go(self.current - 1);
        true
    }

    /// Step 5 → template selection, remembering where we came from.
    pub fn skip_to_templates(&mut self) -> bool {
        if self.current != SEARCH_STEP {
            return false;
        }
        self.saved = self.current;
        self.go(TEMPLATES_STEP);
        true
    }

    /// Jump to the search step after a successful submit.
    pub fn enter_search_from_submit(&mut self) {
        self.go(SEARCH_STEP);
    }

    /// Template selection → the step held before entering it.
    pub fn back_from_templates(&mut self) -> bool {
        if !self.in_templates() {
            return false;
        }
        self.go(self.saved);
        true
    }

    pub fn region(&self) -> Region {
        if self.in_templates() {
            Region::Templates
        } else {
            Region::Form { step: self.current }
        }
    }

    pub fn controls(&self) -> Controls {
        let step = self.current;
        let form = !self.in_templates();
        Controls {
            prev: form && step > FIRST_STEP,
            next: step < SEARCH_STEP,
            submit: step == SUBMIT_STEP,
            skip_to_templates: step == SEARCH_STEP,
            back_from_templates: !form,
        }
    }

    fn go(&mut self, step: u8) {
        debug!(from = self.current, to = step, "step transition");
        self.current = step;
    }
}

impl Default for StepController {
    fn default() -> Self {
        Self::new()
    }
}
