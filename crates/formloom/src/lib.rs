#![forbid(unsafe_code)]

//! Formloom public facade crate.
//!
//! Re-exports the block tree model and the drag-and-drop editor, plus a
//! prelude for hosts that embed an editing session.

use std::fmt;

// --- Model re-exports -------------------------------------------------------

pub use formloom_model::{
    AttributeUpdate, Attributes, Block, BlockCapability, BlockDescriptor, BlockId, BlockRef,
    BlockRegistry, BlockTreeStore, BlockType, ContainerAnchor, ContainerBlock, DocumentError,
    Edge, EditJournal, EditJournalEntry, EditJournalResult, EditKind, EditReport, EditStatus,
    FieldAnchor, FieldBlock, FormDocument, IdGenerator, SkipReason, TreeEdit,
};

// --- Editor re-exports ------------------------------------------------------

pub use formloom_editor::{
    DragEffect, DragPreview, DragSessionTracker, DragSource, DragState, DragTransition,
    DropAction, DropOutcome, DropResolver, DropTarget, EditorConfig, EditorConfigError,
    EditorSession, NoopReason, SelectionState, SuppressionPolicy,
};

#[cfg(feature = "tracing-json")]
pub use formloom_editor::init_json_logging;

// --- Errors -----------------------------------------------------------------

/// Top-level error for hosts embedding a session.
#[derive(Debug)]
pub enum Error {
    /// A persisted document failed to decode or validate.
    Document(DocumentError),
    /// Editor configuration failed to load or validate.
    Config(EditorConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(err) => write!(f, "document: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<DocumentError> for Error {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<EditorConfigError> for Error {
    fn from(err: EditorConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for formloom APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Open a session on a persisted document.
pub fn open_session(config: EditorConfig, json: &str) -> Result<EditorSession> {
    let mut session = EditorSession::with_config(config)?;
    session.load(json)?;
    Ok(session)
}

// --- Prelude ----------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BlockId, BlockType, DragSource, DropTarget, Edge, EditReport, EditorConfig,
        EditorSession, Error, FormDocument, Result,
    };

    pub use crate::{editor, model};
}

pub use formloom_editor as editor;
pub use formloom_model as model;
