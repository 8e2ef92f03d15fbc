//! Prompts that produce and refine the human-reviewable draft

use crate::schema::SchemaDescriptor;

/// Marker the model is asked to start every draft with
pub const DRAFT_MARKER: &str = "DRAFT:";

fn render_schema(schema: &SchemaDescriptor) -> String {
    if schema.is_empty() {
        return "NOT PROVIDED".to_string();
    }
    serde_json::to_string_pretty(schema).unwrap_or_else(|_| format!("{:?}", schema))
}

/// Build the prompt that drafts a transformation from two schemas
pub fn generate_draft_prompt(source: &SchemaDescriptor, sink: &SchemaDescriptor) -> String {
    format!(
        r#"You are a senior data integration expert.

SOURCE SCHEMA:
{source}

SINK SCHEMA:
{sink}

Tasks:
- Suggest field mappings
- Identify missing or extra fields
- Suggest transformations
- Clearly explain assumptions

The draft MUST start with the word "{marker}".
Output should be clear and structured.
"#,
        source = render_schema(source),
        sink = render_schema(sink),
        marker = DRAFT_MARKER,
    )
}

/// Build the prompt that revises an existing draft with user feedback
pub fn generate_refinement_prompt(current_draft: &str, feedback: &str) -> String {
    format!(
        r#"You are refining an existing draft transformation.

CURRENT DRAFT:
{current_draft}

USER FEEDBACK:
{feedback}

Rules:
- Update the draft based on feedback
- Keep it concise
- Maintain previous correct mappings
- Start the updated draft with the word "{marker}"
"#,
        marker = DRAFT_MARKER,
    )
}
