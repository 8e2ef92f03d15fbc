//! Draft session state
//!
//! A [`Session`] holds everything one conversation knows: the uploaded
//! documents and their schemas, the current draft, and whether the draft has
//! been submitted. Transitions are driven by
//! [`Assistant`](crate::assistant::Assistant); this module only owns the data
//! and the commit helpers that apply a staged change in one step.

pub mod classifier;
pub mod store;

pub use classifier::{KeywordTable, MessageClassifier, MessageKind};
pub use store::{SessionHandle, SessionStore, DEFAULT_SESSION_ID};

use crate::schema::SchemaDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lifecycle status of a session's draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// A draft may be generated, refined or approved
    #[default]
    Draft,
    /// The draft was approved; only a new upload starts over
    Submitted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "DRAFT"),
            Self::Submitted => write!(f, "SUBMITTED"),
        }
    }
}

/// What the user said they want to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    SourceToSink,
}

/// Mutable state of one conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub intent: Option<Intent>,
    pub source_schema: Option<SchemaDescriptor>,
    pub sink_schema: Option<SchemaDescriptor>,
    pub source_document: Option<Value>,
    pub sink_document: Option<Value>,
    pub draft: Option<String>,
    pub status: Status,
}

/// Result of a successful upload, applied to a session in one step
#[derive(Debug, Clone)]
pub struct UploadCommit {
    pub source_schema: SchemaDescriptor,
    pub sink_schema: SchemaDescriptor,
    pub source_document: Value,
    pub sink_document: Value,
    pub draft: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_draft(&self) -> bool {
        self.draft.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Source and sink documents, when both have been uploaded
    pub fn documents(&self) -> Option<(&Value, &Value)> {
        match (&self.source_document, &self.sink_document) {
            (Some(source), Some(sink)) => Some((source, sink)),
            _ => None,
        }
    }

    /// Replace schemas, documents and draft, and reopen the draft
    pub fn apply_upload(&mut self, commit: UploadCommit) {
        self.source_schema = Some(commit.source_schema);
        self.sink_schema = Some(commit.sink_schema);
        self.source_document = Some(commit.source_document);
        self.sink_document = Some(commit.sink_document);
        self.draft = Some(commit.draft);
        self.status = Status::Draft;
    }

    /// Replace the draft text; the status is left as it is
    pub fn replace_draft(&mut self, draft: String) {
        self.draft = Some(draft);
    }

    /// Mark the draft as submitted
    pub fn submit(&mut self) {
        self.status = Status::Submitted;
    }
}
