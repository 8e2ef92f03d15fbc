//! Classification of free-text chat messages
//!
//! Messages are normalized (trimmed, lower-cased) and checked in a fixed
//! order: conversion intent, then approval, then refinement of an existing
//! draft. Anything else is unrecognized.

use crate::config::SessionConfig;

/// What a chat message asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The user wants to convert source JSON to sink JSON
    ConversionIntent,
    /// The user approves the current draft
    Approval,
    /// Feedback on the current draft
    Refinement,
    /// Nothing matched and there is no draft to refine
    Unrecognized,
}

/// Keyword vocabulary used by the classifier
///
/// Intent keywords match anywhere in the message; approval phrases must
/// match the whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    intent_keywords: Vec<String>,
    approval_phrases: Vec<String>,
}

impl KeywordTable {
    pub fn new<I, A>(intent_keywords: I, approval_phrases: A) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let normalize = |s: &str| s.trim().to_lowercase();
        Self {
            intent_keywords: intent_keywords
                .into_iter()
                .map(|s| normalize(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
            approval_phrases: approval_phrases
                .into_iter()
                .map(|s| normalize(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.intent_keywords, &config.approval_phrases)
    }

    fn is_intent(&self, normalized: &str) -> bool {
        self.intent_keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }

    fn is_approval(&self, normalized: &str) -> bool {
        self.approval_phrases.iter().any(|phrase| phrase == normalized)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Maps a message and the session's draft state to a [`MessageKind`]
#[derive(Debug, Clone, Default)]
pub struct MessageClassifier {
    table: KeywordTable,
}

impl MessageClassifier {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// Classify a message
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::session::{MessageClassifier, MessageKind};
    ///
    /// let classifier = MessageClassifier::default();
    /// assert_eq!(classifier.classify("Please convert my file", false), MessageKind::ConversionIntent);
    /// assert_eq!(classifier.classify("  Looks Good ", true), MessageKind::Approval);
    /// assert_eq!(classifier.classify("rename email", true), MessageKind::Refinement);
    /// assert_eq!(classifier.classify("hello", false), MessageKind::Unrecognized);
    /// ```
    pub fn classify(&self, message: &str, has_draft: bool) -> MessageKind {
        let normalized = message.trim().to_lowercase();

        if self.table.is_intent(&normalized) {
            MessageKind::ConversionIntent
        } else if self.table.is_approval(&normalized) {
            MessageKind::Approval
        } else if has_draft {
            MessageKind::Refinement
        } else {
            MessageKind::Unrecognized
        }
    }
}
