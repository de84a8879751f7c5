use serde_json::{json, Map, Value};

use crate::schemas::{FieldKind, FieldSpec, Schema};

/// JSON Schema rendering of `S`, built from its field table.
pub fn json_schema<S: Schema>() -> Value {
    let properties: Map<String, Value> = S::FIELDS
        .iter()
        .map(|field| (field.name.to_string(), property(field)))
        .collect();
    let required: Vec<&str> = S::FIELDS.iter().map(|f| f.name).collect();

    let mut schema = json!({
        "title": S::TITLE,
        "type": "object",
        "properties": properties,
        "required": required,
    });
    if !S::DESCRIPTION.is_empty() {
        schema["description"] = Value::String(S::DESCRIPTION.to_string());
    }
    schema
}

fn property(field: &FieldSpec) -> Value {
    let mut property = match (field.kind, field.is_nullable()) {
        (FieldKind::Text, false) => json!({ "type": "string" }),
        (FieldKind::Text, true) => json!({ "type": ["string", "null"] }),
        (FieldKind::TextList, _) => json!({ "type": "array", "items": { "type": "string" } }),
    };
    property["title"] = Value::String(field.name.to_string());
    property["description"] = Value::String(field.description.to_string());
    property
}

/// Instructions telling the model to answer with a JSON instance of `S`.
///
/// Every key is listed as required so the model always emits it; nullable
/// keys accept `null`.
pub fn format_instructions<S: Schema>() -> String {
    format!(
        "The output should be formatted as a JSON instance that conforms to the JSON schema below.\n\n\
        As an example, for the schema {{\"properties\": {{\"foo\": {{\"title\": \"Foo\", \"description\": \"a list of strings\", \"type\": \"array\", \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}\n\
        the object {{\"foo\": [\"bar\", \"baz\"]}} is a well-formatted instance of the schema. \
        The object {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not well-formatted.\n\n\
        Here is the output schema:\n```\n{}\n```",
        json_schema::<S>()
    )
}
