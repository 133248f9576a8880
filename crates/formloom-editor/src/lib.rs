#![forbid(unsafe_code)]

//! Drag-and-drop editing on top of the Formloom block tree.
//!
//! - [`descriptor`]: what is dragged and where it hovers.
//! - [`drag`]: the drag lifecycle tracker.
//! - [`resolver`]: drop rules mapping a drag onto a store edit.
//! - [`selection`]: selected container and properties sheet.
//! - [`session`]: [`EditorSession`], which wires them to a
//!   [`BlockTreeStore`](formloom_model::BlockTreeStore).

pub mod config;
pub mod descriptor;
pub mod drag;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod resolver;
pub mod selection;
pub mod session;

pub use config::{EditorConfig, EditorConfigError, SuppressionPolicy};
pub use descriptor::{DragSource, DropTarget};
pub use drag::{
    DragCancelReason, DragEffect, DragNoopReason, DragSessionTracker, DragState, DragTransition,
    DropRequest,
};
#[cfg(feature = "tracing-json")]
pub use logging::init_json_logging;
pub use resolver::{DropAction, DropResolver, DropRule, NoopReason};
pub use selection::SelectionState;
pub use session::{DragPreview, DropOutcome, EditorSession};
