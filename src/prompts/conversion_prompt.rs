//! Prompt for converting a masked source document into the sink shape

use serde_json::Value;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Build the conversion instruction
///
/// `masked_source` must already have its literals replaced by placeholders;
/// the sink sample is sent as given.
pub fn generate_conversion_prompt(masked_source: &Value, sink_sample: &Value) -> String {
    format!(
        r#"You are a data transformation expert. Convert the following source JSON to the sink JSON format.

**Source JSON:**
```json
{source}
```

**Sink JSON Sample:**
```json
{sink}
```

**Instructions:**

1.  **Analyze Structure:** Analyze the structure of the source and sink JSON samples.
2.  **Map Keys and Values:** Map the keys and values from the source to the sink format based on the structure and content.
3.  **Handle Missing Keys:** If a key from the sink sample is not in the source, omit it from the output.
4.  **Drop Unmapped Keys:** If a key from the source is not in the sink sample, omit it from the output.
5.  **Preserve Placeholders:** Values of the form __MASKED_<id>__ are opaque. Copy them unchanged; never alter, merge or invent them.
6.  **Output:** Return only the converted JSON, without any extra text or explanations.

**Converted Sink JSON:**
"#,
        source = pretty(masked_source),
        sink = pretty(sink_sample),
    )
}
