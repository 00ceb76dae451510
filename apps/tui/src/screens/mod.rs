//! TUI screen definitions.
//!
//! Steps 1–4 render through [`form_step`], step 5 through [`job_search`]
//! and step 6 through [`templates`]. Focusable targets are derived from the
//! wizard state on every frame, so removing an item never leaves a stale
//! handle behind.

pub(crate) mod form_step;
pub(crate) mod job_search;
pub(crate) mod templates;

use cvwizard_core::{ItemId, JobResults, Region, Wizard, step_layout};
use cvwizard_shared::Section;

/// Something the cursor can sit on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Focus {
    Main(&'static str),
    Item {
        section: Section,
        id: ItemId,
        key: String,
    },
    Query,
    Location,
    Job(usize),
}

impl Focus {
    /// Whether Enter starts text editing on this target.
    pub(crate) fn is_text(&self) -> bool {
        !matches!(self, Focus::Job(_))
    }

    /// Section the target belongs to, if any.
    pub(crate) fn section(&self) -> Option<Section> {
        match self {
            Focus::Item { section, .. } => Some(*section),
            _ => None,
        }
    }
}

/// Focus targets of the current step, top to bottom.
pub(crate) fn focus_targets(wizard: &Wizard) -> Vec<Focus> {
    let Region::Form { step } = wizard.region() else {
        return Vec::new();
    };
    let Some(layout) = step_layout(step) else {
        return Vec::new();
    };

    let mut targets: Vec<Focus> = layout.main_fields.iter().copied().map(Focus::Main).collect();

    for section in layout.sections {
        for item in wizard.form().sections.items(*section) {
            for key in item.fields().keys() {
                targets.push(Focus::Item {
                    section: *section,
                    id: item.id(),
                    key: key.clone(),
                });
            }
        }
    }

    if layout.search {
        targets.push(Focus::Query);
        targets.push(Focus::Location);
        if let JobResults::Cards(cards) = wizard.presenter().jobs() {
            targets.extend(cards.iter().map(|c| Focus::Job(c.id.0)));
        }
    }

    targets
}

/// Display label for a main or item field key.
pub(crate) fn field_label(key: &str) -> &str {
    match key {
        "full_name" => "Nombre completo",
        "professional_title" => "Título profesional",
        "location" => "Ubicación",
        "phone" => "Teléfono",
        "email" => "Email",
        "linkedin" => "LinkedIn",
        "portfolio" => "Portafolio",
        "github" => "GitHub",
        "summary" => "Resumen",
        "company" => "Empresa",
        "role" => "Cargo",
        "start_date" => "Inicio",
        "end_date" => "Fin",
        "description" => "Descripción",
        "institution" => "Institución",
        "degree" => "Título",
        "field" => "Área",
        "name" => "Nombre",
        "level" => "Nivel",
        "category" => "Categoría",
        "issuer" => "Emisor",
        "date" => "Fecha",
        "url" => "URL",
        "technologies" => "Tecnologías",
        "label" => "Etiqueta",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use cvwizard_core::Outcome;
    use cvwizard_shared::{CandidateId, JobPosting};

    use super::*;

    #[test]
    fn step_one_targets_are_main_fields() {
        let wizard = Wizard::default();
        let targets = focus_targets(&wizard);
        assert_eq!(targets.first(), Some(&Focus::Main("full_name")));
        assert!(targets.iter().all(|t| matches!(t, Focus::Main(_))));
        assert!(!targets.contains(&Focus::Main("summary")));
    }

    #[test]
    fn removed_items_drop_out_of_focus() {
        let mut wizard = Wizard::default();
        wizard.set_main("full_name", "Ana");
        wizard.set_main("email", "ana@example.com");
        wizard.next();

        let before = focus_targets(&wizard).len();
        let id = wizard.add_item(Section::Experiences).unwrap();
        assert_eq!(focus_targets(&wizard).len(), before + 6);
        wizard.remove_item(Section::Experiences, id);
        assert_eq!(focus_targets(&wizard).len(), before);
    }

    #[test]
    fn search_step_lists_job_cards() {
        let mut wizard = Wizard::default();
        wizard.apply_outcome(Outcome::Submitted(Ok(CandidateId::new("1"))));
        wizard.apply_outcome(Outcome::JobsFound(Ok(vec![JobPosting::default(); 2])));
        let targets = focus_targets(&wizard);
        assert_eq!(
            targets,
            vec![Focus::Query, Focus::Location, Focus::Job(0), Focus::Job(1)]
        );
    }

    #[test]
    fn template_view_has_no_targets() {
        let mut wizard = Wizard::default();
        wizard.apply_outcome(Outcome::Submitted(Ok(CandidateId::new("1"))));
        wizard.skip_to_templates();
        assert!(focus_targets(&wizard).is_empty());
    }
}
