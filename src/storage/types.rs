use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A model identifier known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Row id
    pub id: i64,
    /// Identifier passed to the provider (e.g. "models/gemini-flash-latest")
    pub model_name: String,
    /// Whether conversions use this model
    pub is_active: bool,
    /// When the model was registered
    pub created_at: DateTime<Utc>,
}
