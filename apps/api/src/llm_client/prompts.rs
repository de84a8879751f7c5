// Shared prompt fragments used by every structured-output call.
// Schema-specific task instructions live in analysis/prompts.rs.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant \
    that reads resumes and job postings. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended after the format instructions so unknown values come back as null
/// instead of invented text.
pub const NULL_IF_UNKNOWN_INSTRUCTION: &str = "\
    If a value is not stated in the document, use null for nullable fields \
    and an empty string or empty list for the others. Do NOT invent details.";
