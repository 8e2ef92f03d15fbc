//! Draft session state machine
//!
//! The [`Assistant`] drives a [`Session`] through its lifecycle:
//!
//! - an upload computes both schemas and generates a fresh draft
//! - chat messages are classified as intent, approval, refinement or
//!   unrecognized, and each kind has one transition
//! - approval flips `DRAFT` to `SUBMITTED`, running the conversion first
//!   when it is enabled and both documents are present
//!
//! Every transition is staged and committed only after all fallible work
//! (model calls, conversion) has succeeded, so a failed request leaves the
//! session exactly as it was.

use crate::conversion::ConversionService;
use crate::error::Result;
use crate::prompts::{generate_draft_prompt, generate_refinement_prompt};
use crate::providers::Provider;
use crate::schema::{extract_schema, SchemaDescriptor};
use crate::session::{
    Intent, MessageClassifier, MessageKind, Session, Status, UploadCommit,
};
use crate::upload::UploadedDocument;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const INTENT_REPLY: &str =
    "Got it. You want to convert source JSON to sink JSON.\nPlease upload the source and sink files.";
pub const NOTHING_TO_SUBMIT_REPLY: &str = "Nothing to submit yet.";
pub const SUBMITTED_REPLY: &str = "Transformation submitted successfully.";
pub const ALREADY_SUBMITTED_REPLY: &str =
    "This draft was already submitted. Upload new files to start another draft.";
pub const REFINED_REPLY: &str = "Draft updated based on your feedback.";
pub const FALLBACK_REPLY: &str =
    "Please describe what you want to do (e.g., convert source JSON to sink JSON).";
pub const UPLOADED_MESSAGE: &str = "Files uploaded successfully. Draft created.";

/// Reply to a chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ChatReply {
    fn text(reply: impl Into<String>, status: Status) -> Self {
        Self {
            reply: reply.into(),
            status,
            draft: None,
            final_output: None,
            result: None,
        }
    }
}

/// Reply to an upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReply {
    pub message: String,
    pub draft: String,
    pub status: Status,
    pub source_schema: SchemaDescriptor,
    pub sink_schema: SchemaDescriptor,
}

/// Conversational mapping assistant
pub struct Assistant {
    drafter: Arc<dyn Provider>,
    converter: Option<ConversionService>,
    classifier: MessageClassifier,
}

impl Assistant {
    /// Create an assistant
    ///
    /// `drafter` generates and refines drafts. When `converter` is `Some`,
    /// approving a draft also converts the uploaded source document.
    pub fn new(
        drafter: Arc<dyn Provider>,
        converter: Option<ConversionService>,
        classifier: MessageClassifier,
    ) -> Self {
        Self {
            drafter,
            converter,
            classifier,
        }
    }

    /// Store two uploaded documents and draft a fresh transformation
    ///
    /// Any previous draft is discarded and the status returns to `DRAFT`.
    ///
    /// # Errors
    ///
    /// Returns the provider error if draft generation fails; the session is
    /// not modified in that case
    pub async fn upload(
        &self,
        session: &mut Session,
        source: UploadedDocument,
        sink: UploadedDocument,
    ) -> Result<UploadReply> {
        let source_schema = extract_schema(&source.document);
        let sink_schema = extract_schema(&sink.document);
        tracing::info!(
            "Upload received: {} ({} fields) -> {} ({} fields)",
            source.filename,
            source_schema.len(),
            sink.filename,
            sink_schema.len()
        );

        let prompt = generate_draft_prompt(&source_schema, &sink_schema);
        let draft = self.drafter.complete(&prompt).await?.text;

        session.apply_upload(UploadCommit {
            source_schema: source_schema.clone(),
            sink_schema: sink_schema.clone(),
            source_document: source.document,
            sink_document: sink.document,
            draft: draft.clone(),
        });

        Ok(UploadReply {
            message: UPLOADED_MESSAGE.to_string(),
            draft,
            status: session.status,
            source_schema,
            sink_schema,
        })
    }

    /// Handle one free-text chat message
    ///
    /// # Errors
    ///
    /// Returns provider, registry or conversion errors; the session is not
    /// modified when an error is returned
    pub async fn chat(&self, session: &mut Session, message: &str) -> Result<ChatReply> {
        let kind = self.classifier.classify(message, session.has_draft());
        tracing::debug!("Classified message as {:?}", kind);

        match kind {
            MessageKind::ConversionIntent => {
                session.intent = Some(Intent::SourceToSink);
                Ok(ChatReply::text(INTENT_REPLY, session.status))
            }
            MessageKind::Approval => self.approve(session).await,
            MessageKind::Refinement => self.refine(session, message).await,
            MessageKind::Unrecognized => Ok(ChatReply::text(FALLBACK_REPLY, session.status)),
        }
    }

    async fn approve(&self, session: &mut Session) -> Result<ChatReply> {
        let draft = match session.draft.clone().filter(|_| session.has_draft()) {
            Some(draft) => draft,
            None => return Ok(ChatReply::text(NOTHING_TO_SUBMIT_REPLY, session.status)),
        };

        if session.status == Status::Submitted {
            return Ok(ChatReply {
                final_output: Some(draft),
                ..ChatReply::text(ALREADY_SUBMITTED_REPLY, session.status)
            });
        }

        let result = match (&self.converter, session.documents()) {
            (Some(converter), Some((source, sink))) => {
                Some(converter.convert(source, sink).await?)
            }
            _ => None,
        };

        session.submit();
        tracing::info!("Draft submitted (converted: {})", result.is_some());

        Ok(ChatReply {
            final_output: Some(draft),
            result,
            ..ChatReply::text(SUBMITTED_REPLY, session.status)
        })
    }

    async fn refine(&self, session: &mut Session, feedback: &str) -> Result<ChatReply> {
        if session.status == Status::Submitted {
            return Ok(ChatReply::text(ALREADY_SUBMITTED_REPLY, session.status));
        }

        let current = session.draft.clone().unwrap_or_default();
        let prompt = generate_refinement_prompt(&current, feedback);
        let draft = self.drafter.complete(&prompt).await?.text;
        session.replace_draft(draft.clone());

        Ok(ChatReply {
            draft: Some(draft),
            ..ChatReply::text(REFINED_REPLY, session.status)
        })
    }
}
