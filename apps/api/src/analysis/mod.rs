//! Analysis — asks the model to fill one schema from a document's text.
//!
//! Flow: build prompt (task + format instructions + document) → one
//! `ChatBackend::complete` call → `coerce` into `Coercion<S>`.
//! Transport errors are returned as `LlmError`; unreadable replies come back
//! as `Coercion::Failed` so the caller can decide what to do with them.

use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info};

use crate::analysis::prompts::{
    CONTEXT_HEADER, DOCUMENT_HEADER, JOB_DESCRIPTION_TASK, JOB_SKILLS_TASK, RESUME_FORMAT_TASK,
    RESUME_IMPROVEMENTS_TASK, RESUME_SKILLS_TASK,
};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NULL_IF_UNKNOWN_INSTRUCTION};
use crate::llm_client::{ChatBackend, LlmError};
use crate::schemas::{
    coerce, format_instructions, Coercion, JobDescription, JobSkills, ResumeFormat,
    ResumeImprovements, ResumeSkills, Schema,
};

pub mod handlers;
pub mod prompts;

/// The schemas exposed for analysis, addressed by URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    JobDescription,
    JobSkills,
    ResumeSkills,
    ResumeFormat,
    ResumeImprovements,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 5] = [
        SchemaKind::JobDescription,
        SchemaKind::JobSkills,
        SchemaKind::ResumeSkills,
        SchemaKind::ResumeFormat,
        SchemaKind::ResumeImprovements,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SchemaKind::JobDescription => "job-description",
            SchemaKind::JobSkills => "job-skills",
            SchemaKind::ResumeSkills => "resume-skills",
            SchemaKind::ResumeFormat => "resume-format",
            SchemaKind::ResumeImprovements => "resume-improvements",
        }
    }

    fn task(&self) -> &'static str {
        match self {
            SchemaKind::JobDescription => JOB_DESCRIPTION_TASK,
            SchemaKind::JobSkills => JOB_SKILLS_TASK,
            SchemaKind::ResumeSkills => RESUME_SKILLS_TASK,
            SchemaKind::ResumeFormat => RESUME_FORMAT_TASK,
            SchemaKind::ResumeImprovements => RESUME_IMPROVEMENTS_TASK,
        }
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = SchemaKind::ALL.iter().map(|k| k.slug()).collect();
                format!("Unknown schema '{s}'. Expected one of: {}", known.join(", "))
            })
    }
}

/// Builds the user prompt for `S`. Document and context are inserted
/// verbatim, so braces in either are never read as placeholders.
pub fn build_prompt<S: Schema>(task: &str, document: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "{task}\n\n{}\n\n{NULL_IF_UNKNOWN_INSTRUCTION}\n\n{DOCUMENT_HEADER}\n{document}\n",
        format_instructions::<S>()
    );
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\n{CONTEXT_HEADER}\n{context}"));
    }
    prompt
}

/// Runs one structured-output call for `S`.
pub async fn analyze<S: Schema>(
    backend: &dyn ChatBackend,
    task: &str,
    document: &str,
    context: Option<&str>,
) -> Result<Coercion<S>, LlmError> {
    let prompt = build_prompt::<S>(task, document, context);
    debug!(
        "Requesting {} from {} ({} prompt chars)",
        S::TITLE,
        backend.model_name(),
        prompt.len()
    );

    let raw = backend.complete(JSON_ONLY_SYSTEM, &prompt).await?;
    let outcome = coerce::<S>(&raw);

    match &outcome {
        Coercion::Complete { .. } => info!("{} extracted", S::TITLE),
        Coercion::Partial { missing, .. } => {
            info!("{} extracted with missing fields: {:?}", S::TITLE, missing)
        }
        Coercion::Failed { reason, .. } => info!("{} coercion failed: {}", S::TITLE, reason),
    }

    Ok(outcome)
}

/// Type-erased `analyze` for callers that pick the schema at runtime.
pub async fn analyze_kind(
    kind: SchemaKind,
    backend: &dyn ChatBackend,
    document: &str,
    context: Option<&str>,
) -> Result<Coercion<Value>, LlmError> {
    let task = kind.task();
    match kind {
        SchemaKind::JobDescription => {
            erase(analyze::<JobDescription>(backend, task, document, context).await)
        }
        SchemaKind::JobSkills => {
            erase(analyze::<JobSkills>(backend, task, document, context).await)
        }
        SchemaKind::ResumeSkills => {
            erase(analyze::<ResumeSkills>(backend, task, document, context).await)
        }
        SchemaKind::ResumeFormat => {
            erase(analyze::<ResumeFormat>(backend, task, document, context).await)
        }
        SchemaKind::ResumeImprovements => {
            erase(analyze::<ResumeImprovements>(backend, task, document, context).await)
        }
    }
}

fn erase<S: Schema>(outcome: Result<Coercion<S>, LlmError>) -> Result<Coercion<Value>, LlmError> {
    outcome.map(|c| c.map(|record| serde_json::to_value(record).unwrap_or(Value::Null)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that replays a canned reply and records the prompts it saw.
    pub(crate) struct MockBackend {
        reply: Result<String, u16>,
        pub(crate) prompts: Mutex<Vec<(String, String)>>,
    }

    impl MockBackend {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for MockBackend {
        async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "Incorrect API key provided".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    #[test]
    fn test_slugs_round_trip() {
        for kind in SchemaKind::ALL {
            assert_eq!(kind.slug().parse::<SchemaKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_slug_lists_known() {
        let err = "cover-letter".parse::<SchemaKind>().unwrap_err();
        assert!(err.contains("cover-letter"));
        assert!(err.contains("resume-improvements"));
    }

    #[test]
    fn test_prompt_contains_task_schema_and_document() {
        let prompt = build_prompt::<JobSkills>(JOB_SKILLS_TASK, "Must know Rust.", None);
        assert!(prompt.starts_with(JOB_SKILLS_TASK));
        assert!(prompt.contains("Job_Skills"));
        assert!(prompt.contains("DOCUMENT:\nMust know Rust."));
        assert!(!prompt.contains("ADDITIONAL CONTEXT"));
    }

    #[test]
    fn test_prompt_appends_context_after_document() {
        let prompt = build_prompt::<ResumeImprovements>(
            RESUME_IMPROVEMENTS_TASK,
            "Jane Doe",
            Some("  Senior Go developer wanted  "),
        );
        let doc = prompt.find("DOCUMENT:").unwrap();
        let ctx = prompt.find("ADDITIONAL CONTEXT:\nSenior Go developer wanted").unwrap();
        assert!(doc < ctx);
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_not_expanded() {
        let prompt = build_prompt::<ResumeImprovements>(
            RESUME_IMPROVEMENTS_TASK,
            "Jane Doe {context} CV-BODY",
            Some("compare with {document} and {task}"),
        );
        assert_eq!(prompt.matches("CV-BODY").count(), 1);
        assert_eq!(prompt.matches(RESUME_IMPROVEMENTS_TASK).count(), 1);
        assert!(prompt.contains("DOCUMENT:\nJane Doe {context} CV-BODY\n"));
        assert!(prompt.ends_with("ADDITIONAL CONTEXT:\ncompare with {document} and {task}"));
    }

    #[test]
    fn test_blank_context_is_ignored() {
        let prompt = build_prompt::<ResumeImprovements>(RESUME_IMPROVEMENTS_TASK, "x", Some("   "));
        assert!(!prompt.contains("ADDITIONAL CONTEXT"));
    }

    #[tokio::test]
    async fn test_analyze_sends_json_only_system_prompt() {
        let backend = MockBackend::replying(r#"{"improvements": ["Add metrics to bullets"]}"#);
        let outcome = analyze::<ResumeImprovements>(&backend, RESUME_IMPROVEMENTS_TASK, "cv", None)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Coercion::Complete {
                record: ResumeImprovements {
                    improvements: vec!["Add metrics to bullets".to_string()]
                }
            }
        );
        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, JSON_ONLY_SYSTEM);
    }

    #[tokio::test]
    async fn test_analyze_kind_returns_json_record() {
        let backend = MockBackend::replying(
            r#"{"technical_skills": ["Rust", "PostgreSQL"], "non_technical_skills": ["Mentoring"]}"#,
        );
        let outcome = analyze_kind(SchemaKind::ResumeSkills, &backend, "cv text", None)
            .await
            .unwrap();
        let record = outcome.record().unwrap();
        assert_eq!(record["technical_skills"][1], "PostgreSQL");
        assert!(backend.prompts.lock().unwrap()[0].1.contains(RESUME_SKILLS_TASK));
    }

    #[tokio::test]
    async fn test_analyze_unreadable_reply_is_failed_not_error() {
        let backend = MockBackend::replying("Sorry, I can't help with that.");
        let outcome = analyze_kind(SchemaKind::JobDescription, &backend, "jd", None)
            .await
            .unwrap();
        assert!(matches!(outcome, Coercion::Failed { .. }));
    }

    #[tokio::test]
    async fn test_analyze_propagates_backend_error() {
        let backend = MockBackend::failing(401);
        let err = analyze_kind(SchemaKind::JobSkills, &backend, "jd", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 401, .. }));
    }
}
