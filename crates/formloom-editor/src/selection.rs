//! Selected container and properties sheet visibility.

use formloom_model::{BlockId, ContainerBlock, FormDocument};

/// Which container the properties sheet edits, and whether it is open.
///
/// The selection is stored by id and resolved against the document on every
/// read, so it never holds a stale copy of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<BlockId>,
    sheet_open: bool,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_container(&mut self, container_id: Option<BlockId>) {
        self.selected = container_id;
    }

    #[must_use]
    pub fn selected_container_id(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    /// The selected container in `document`, or `None` if it no longer exists.
    #[must_use]
    pub fn selected_container<'a>(&self, document: &'a FormDocument) -> Option<&'a ContainerBlock> {
        self.selected
            .as_ref()
            .and_then(|id| document.container(id))
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.sheet_open = false;
    }

    /// Drop a selection that no longer resolves. Returns whether it was cleared.
    pub fn prune(&mut self, document: &FormDocument) -> bool {
        match &self.selected {
            Some(id) if document.container(id).is_none() => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_sheet_open(&self) -> bool {
        self.sheet_open
    }

    pub fn open_sheet(&mut self) {
        self.sheet_open = true;
    }

    pub fn close_sheet(&mut self) {
        self.sheet_open = false;
    }

    pub fn toggle_sheet(&mut self) {
        self.sheet_open = !self.sheet_open;
    }
}
