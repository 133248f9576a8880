#![forbid(unsafe_code)]

//! Block tree model for the Formloom form builder.
//!
//! A form is an ordered list of containers, each holding an ordered list of
//! fields. [`BlockTreeStore`] owns the canonical [`FormDocument`] and is the
//! only place structural edits happen; every edit either applies completely
//! or leaves the document untouched and reports why.

pub mod block;
pub mod document;
pub mod edit;
pub mod ids;
pub mod journal;
pub mod registry;
pub mod store;

pub use block::{
    Attributes, Block, BlockCapability, BlockRef, BlockType, ContainerAnchor, ContainerBlock,
    Edge, FieldAnchor, FieldBlock,
};
pub use document::{DocumentError, FieldPosition, FormDocument};
pub use edit::{AttributeUpdate, EditKind, EditReport, EditStatus, SkipReason, TreeEdit};
pub use ids::{BlockId, DEFAULT_ID_PREFIX, IdGenerator};
pub use journal::{DEFAULT_JOURNAL_CAPACITY, EditJournal, EditJournalEntry, EditJournalResult};
pub use registry::{BlockDescriptor, BlockRegistry};
pub use store::BlockTreeStore;
