//! Save notifications delivered by the host editor

use std::path::{Path, PathBuf};

/// A document that is about to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    /// Backing file; `None` for a document that has never been saved to disk
    source_path: Option<PathBuf>,
    /// Full current text of the document
    text: String,
}

impl SaveEvent {
    /// A document backed by a file
    pub fn new(source_path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source_path: Some(source_path.into()),
            text: text.into(),
        }
    }

    /// A document with no backing file
    pub fn untitled(text: impl Into<String>) -> Self {
        Self {
            source_path: None,
            text: text.into(),
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Receives "about to save" notifications from the host
pub trait SaveListener {
    /// Called before a single document is written to its backing file
    fn before_document_saving(&self, event: &SaveEvent);

    /// Called before the host saves every unsaved document at once
    ///
    /// Each document is handled on its own; one without a backing file does
    /// not stop the rest.
    fn before_all_documents_saving(&self, unsaved: &[SaveEvent]) {
        for event in unsaved {
            self.before_document_saving(event);
        }
    }
}

impl<F> SaveListener for F
where
    F: Fn(&SaveEvent),
{
    fn before_document_saving(&self, event: &SaveEvent) {
        self(event)
    }
}
