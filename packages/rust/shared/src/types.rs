//! Core domain and wire types for the résumé wizard.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered field-key → value mapping, used for main fields and items.
pub type FieldMap = IndexMap<String, String>;

/// Number of wizard steps, including the template-selection step.
pub const TOTAL_STEPS: u8 = 6;

/// Document styles the backend knows how to render.
pub const KNOWN_STYLES: [&str; 3] = ["classic", "modern", "uno"];

/// Main fields that must be non-empty before leaving step 1.
pub const REQUIRED_MAIN_FIELDS: [&str; 2] = ["full_name", "email"];

/// Main (singleton) fields in display order.
pub const MAIN_FIELDS: [&str; 9] = [
    "full_name",
    "professional_title",
    "location",
    "phone",
    "email",
    "linkedin",
    "portfolio",
    "github",
    "summary",
];

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A repeatable category of résumé content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Experiences,
    Educations,
    Skills,
    Languages,
    Certifications,
    Projects,
    Links,
}

impl Section {
    /// Every section in form order.
    pub const ALL: [Section; 7] = [
        Section::Experiences,
        Section::Educations,
        Section::Skills,
        Section::Languages,
        Section::Certifications,
        Section::Projects,
        Section::Links,
    ];

    /// Stable identifier used in payloads and markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Experiences => "experiences",
            Self::Educations => "educations",
            Self::Skills => "skills",
            Self::Languages => "languages",
            Self::Certifications => "certifications",
            Self::Projects => "projects",
            Self::Links => "links",
        }
    }

    /// Look a section up by its identifier. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Human-readable heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::Experiences => "Experiencia",
            Self::Educations => "Educación",
            Self::Skills => "Habilidades",
            Self::Languages => "Idiomas",
            Self::Certifications => "Certificaciones",
            Self::Projects => "Proyectos",
            Self::Links => "Enlaces",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CandidateId
// ---------------------------------------------------------------------------

/// Backend-issued identifier for a saved submission.
///
/// The backend may send it as a JSON string or number; the original JSON
/// kind is kept so it is echoed back the same way on apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateId {
    value: String,
    numeric: bool,
}

impl CandidateId {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        // Digits with a leading zero stay text so they round-trip unchanged
        let numeric = !value.is_empty()
            && value.bytes().all(|b| b.is_ascii_digit())
            && (value == "0" || !value.starts_with('0'));
        Self { value, numeric }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for CandidateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value.parse::<u64>() {
            Ok(n) if self.numeric => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.value),
        }
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(value) => Ok(Self {
                value,
                numeric: false,
            }),
            Raw::Number(n) => Ok(Self {
                value: n.to_string(),
                numeric: true,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Body of `POST /api/submit`: main fields flattened plus one array per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub main: FieldMap,
    #[serde(default)]
    pub experiences: Vec<FieldMap>,
    #[serde(default)]
    pub educations: Vec<FieldMap>,
    #[serde(default)]
    pub skills: Vec<FieldMap>,
    #[serde(default)]
    pub languages: Vec<FieldMap>,
    #[serde(default)]
    pub certifications: Vec<FieldMap>,
    #[serde(default)]
    pub projects: Vec<FieldMap>,
    #[serde(default)]
    pub links: Vec<FieldMap>,
}

impl SubmissionPayload {
    /// Items for one section.
    pub fn section(&self, section: Section) -> &[FieldMap] {
        match section {
            Section::Experiences => &self.experiences,
            Section::Educations => &self.educations,
            Section::Skills => &self.skills,
            Section::Languages => &self.languages,
            Section::Certifications => &self.certifications,
            Section::Projects => &self.projects,
            Section::Links => &self.links,
        }
    }

    /// Mutable items for one section.
    pub fn section_mut(&mut self, section: Section) -> &mut Vec<FieldMap> {
        match section {
            Section::Experiences => &mut self.experiences,
            Section::Educations => &mut self.educations,
            Section::Skills => &mut self.skills,
            Section::Languages => &mut self.languages,
            Section::Certifications => &mut self.certifications,
            Section::Projects => &mut self.projects,
            Section::Links => &mut self.links,
        }
    }
}

/// Body of `POST /api/generate_summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    #[serde(flatten)]
    pub main: FieldMap,
    #[serde(default)]
    pub experiences: Vec<FieldMap>,
    #[serde(default)]
    pub skills: Vec<FieldMap>,
}

/// Success body of `POST /api/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub candidate_id: CandidateId,
}

/// Failure body of `POST /api/submit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

impl SubmitErrorBody {
    /// Compose `"<error>. Faltan: <f1>, <f2>"`, or `fallback` when no error is given.
    pub fn compose_message(&self, fallback: &str) -> String {
        let Some(error) = self.error.as_deref() else {
            return fallback.to_string();
        };
        match self.fields.as_deref() {
            Some(fields) if !fields.is_empty() => {
                format!("{error}. Faltan: {}", fields.join(", "))
            }
            _ => format!("{error}."),
        }
    }
}

/// Body of `POST /api/generate_summary` responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// One posting returned by `GET /api/search`.
///
/// Extra backend fields (`source`, `logo`, `tags`, ...) are kept in `extra`
/// and sent back unchanged on apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobPosting {
    /// Title for display, never empty.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("(sin título)")
    }
}

/// Body of `POST /api/apply`.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyRequest<'a> {
    pub candidate_id: &'a CandidateId,
    pub job: &'a JobPosting,
}

/// Body of `POST /api/apply` responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl ApplyResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_candidate_ids_keep_leading_zeros() {
        assert_eq!(serde_json::to_string(&CandidateId::new("42")).unwrap(), "42");
        assert_eq!(serde_json::to_string(&CandidateId::new("007")).unwrap(), r#""007""#);
        assert_eq!(serde_json::to_string(&CandidateId::new("0")).unwrap(), "0");
        assert_eq!(CandidateId::new("007").as_str(), "007");
    }

    #[test]
    fn section_names_are_stable() {
        for section in Section::ALL {
            assert_eq!(Section::from_name(section.as_str()), Some(section));
        }
        assert_eq!(Section::from_name("hobbies"), None);
    }

    #[test]
    fn candidate_id_accepts_number_or_string() {
        let from_num: SubmitResponse = serde_json::from_str(r#"{"candidate_id": 42}"#).unwrap();
        assert_eq!(from_num.candidate_id.as_str(), "42");
        assert_eq!(serde_json::to_string(&from_num.candidate_id).unwrap(), "42");

        let from_str: SubmitResponse =
            serde_json::from_str(r#"{"candidate_id": "abc123"}"#).unwrap();
        assert_eq!(from_str.candidate_id.as_str(), "abc123");
        assert_eq!(
            serde_json::to_string(&from_str.candidate_id).unwrap(),
            r#""abc123""#
        );
    }

    #[test]
    fn error_message_composition() {
        let body: SubmitErrorBody =
            serde_json::from_str(r#"{"error":"Missing fields","fields":["email"]}"#).unwrap();
        assert_eq!(
            body.compose_message("Error al guardar."),
            "Missing fields. Faltan: email"
        );

        let body: SubmitErrorBody =
            serde_json::from_str(r#"{"error":"Missing","fields":["full_name","email"]}"#)
                .unwrap();
        assert_eq!(
            body.compose_message("Error al guardar."),
            "Missing. Faltan: full_name, email"
        );

        let body: SubmitErrorBody = serde_json::from_str(r#"{"error":"Boom"}"#).unwrap();
        assert_eq!(body.compose_message("Error al guardar."), "Boom.");

        let body = SubmitErrorBody::default();
        assert_eq!(body.compose_message("Error al guardar."), "Error al guardar.");
    }

    #[test]
    fn submission_payload_flattens_main_fields() {
        let mut payload = SubmissionPayload::default();
        payload.main.insert("full_name".into(), "Ana".into());
        payload.main.insert("email".into(), "ana@example.com".into());
        payload
            .skills
            .push(FieldMap::from([("name".to_string(), "Rust".to_string())]));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["full_name"], "Ana");
        assert_eq!(value["email"], "ana@example.com");
        assert_eq!(value["skills"][0]["name"], "Rust");
        assert_eq!(value["experiences"], serde_json::json!([]));
    }

    #[test]
    fn job_posting_keeps_extra_fields() {
        let raw = r#"{
            "title": "Backend Dev",
            "company": null,
            "location": "Remote",
            "url": "https://jobs.example.com/1",
            "date_posted": "2024-05-01",
            "source": "RemoteOK",
            "tags": ["rust"]
        }"#;
        let job: JobPosting = serde_json::from_str(raw).unwrap();
        assert_eq!(job.display_title(), "Backend Dev");
        assert_eq!(job.company, None);
        assert_eq!(job.extra["source"], "RemoteOK");

        let back = serde_json::to_value(&job).unwrap();
        assert_eq!(back["tags"][0], "rust");
    }

    #[test]
    fn apply_response_success_flag() {
        let ok: ApplyResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.is_success());
        let other: ApplyResponse = serde_json::from_str(r#"{"status":"queued"}"#).unwrap();
        assert!(!other.is_success());
    }
}
