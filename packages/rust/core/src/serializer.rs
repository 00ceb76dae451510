//! Builds request payloads from the form model.
//!
//! Payloads are built fresh on every call and never cached.

use cvwizard_shared::{Section, SubmissionPayload, SummaryPayload};

use crate::form::FormModel;

/// Main fields plus every section, for `POST /api/submit`.
pub fn submission_payload(form: &FormModel) -> SubmissionPayload {
    let mut payload = SubmissionPayload {
        main: form.main.collect_main(),
        ..SubmissionPayload::default()
    };
    for section in Section::ALL {
        *payload.section_mut(section) = form.sections.collect_section(section);
    }
    payload
}

/// Main fields plus experiences and skills, for `POST /api/generate_summary`.
pub fn summary_payload(form: &FormModel) -> SummaryPayload {
    SummaryPayload {
        main: form.main.collect_main(),
        experiences: form.sections.collect_section(Section::Experiences),
        skills: form.sections.collect_section(Section::Skills),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> FormModel {
        let mut form = FormModel::default();
        form.main.set("full_name", "Ana Pérez");
        form.main.set("email", " ana@example.com ");

        let exp = form.sections.items(Section::Experiences)[0].id();
        form.sections
            .set_field(Section::Experiences, exp, "company", "Acme");
        let skill = form.sections.items(Section::Skills)[0].id();
        form.sections.set_field(Section::Skills, skill, "name", "Rust");
        let link = form.sections.items(Section::Links)[0].id();
        form.sections
            .set_field(Section::Links, link, "url", "https://ana.dev");
        form
    }

    #[test]
    fn submission_has_every_section_array() {
        let value = serde_json::to_value(submission_payload(&filled_form())).unwrap();
        assert_eq!(value["full_name"], "Ana Pérez");
        assert_eq!(value["email"], "ana@example.com");
        for section in Section::ALL {
            assert!(value[section.as_str()].is_array(), "{section} missing");
        }
        assert_eq!(value["experiences"][0]["company"], "Acme");
        assert_eq!(value["educations"], serde_json::json!([]));
        assert_eq!(value["links"][0]["label"], "");
    }

    #[test]
    fn summary_payload_is_reduced() {
        let value = serde_json::to_value(summary_payload(&filled_form())).unwrap();
        assert_eq!(value["skills"][0]["name"], "Rust");
        assert_eq!(value["experiences"][0]["company"], "Acme");
        assert!(value.get("links").is_none());
        assert!(value.get("educations").is_none());
        assert_eq!(value["full_name"], "Ana Pérez");
    }

    #[test]
    fn payload_reflects_latest_edits() {
        let mut form = filled_form();
        let before = submission_payload(&form);
        form.main.set("full_name", "Ana María Pérez");
        let after = submission_payload(&form);
        assert_ne!(before, after);
        assert_eq!(after.main["full_name"], "Ana María Pérez");
    }
}
