//! Editor session: one document, one drag, one selection.
//!
//! The session is the surface hosts talk to. Drag events flow through the
//! [`DragSessionTracker`]; a drop is resolved by [`DropResolver`] and the
//! resulting action is applied to the [`BlockTreeStore`] before `drop`
//! returns.

use serde_json::Value;

use formloom_model::{
    AttributeUpdate, Attributes, BlockDescriptor, BlockId, BlockRegistry, BlockTreeStore, BlockType,
    ContainerBlock, DocumentError, EditJournal, EditReport, FieldBlock, FormDocument,
    IdGenerator, SkipReason, TreeEdit,
};

use crate::config::{EditorConfig, EditorConfigError};
use crate::descriptor::{DragSource, DropTarget};
use crate::drag::{DragNoopReason, DragSessionTracker, DragState, DragTransition};
use crate::resolver::{DropAction, DropResolver};
use crate::selection::SelectionState;

/// Everything a drop produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub transition: DragTransition,
    /// `None` when the drag ended over nothing or was not active.
    pub action: Option<DropAction>,
    /// `None` when there was no action or it resolved to a no-op.
    pub report: Option<EditReport>,
}

impl DropOutcome {
    /// Whether the drop changed the document.
    #[must_use]
    pub fn applied(&self) -> bool {
        self.report.as_ref().is_some_and(EditReport::is_applied)
    }
}

/// What the drag overlay should render for the current drag.
#[derive(Debug, Clone, Copy)]
pub enum DragPreview<'a> {
    Palette(&'static BlockDescriptor),
    Container(&'a ContainerBlock),
    Field(&'a FieldBlock),
}

/// A form builder editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    store: BlockTreeStore,
    tracker: DragSessionTracker,
    resolver: DropResolver,
    selection: SelectionState,
    published: bool,
    config: EditorConfig,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl EditorSession {
    /// Session with the default configuration and an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session built from `config`, which must validate.
    pub fn with_config(config: EditorConfig) -> Result<Self, EditorConfigError> {
        Ok(Self::build(config.validated()?))
    }

    fn build(config: EditorConfig) -> Self {
        let store = BlockTreeStore::with_parts(
            FormDocument::new(),
            IdGenerator::new(config.id_prefix.clone()),
            EditJournal::with_capacity(config.journal_capacity),
        );
        let mut session = Self {
            store,
            tracker: DragSessionTracker::new(config.suppression),
            resolver: DropResolver,
            selection: SelectionState::new(),
            published: false,
            config,
        };
        if session.config.starter_section {
            session.seed_starter_section();
        }
        session
    }

    /// Locked heading and paragraph section at the top of a new form.
    fn seed_starter_section(&mut self) {
        let Some(container) = self.store.new_container(BlockType::RowLayout) else {
            return;
        };
        let container_id = container.id().clone();
        let container = [BlockType::Heading, BlockType::Paragraph]
            .into_iter()
            .filter_map(|tag| self.store.new_field(tag, &container_id))
            .fold(container.with_locked(true), ContainerBlock::with_child);
        let _ = self.store.insert_container(container, None);
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &FormDocument {
        self.store.document()
    }

    #[must_use]
    pub fn store(&self) -> &BlockTreeStore {
        &self.store
    }

    #[must_use]
    pub fn journal(&self) -> &EditJournal {
        self.store.journal()
    }

    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        self.store.registry()
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Sheet visibility and selection for the properties collaborator.
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn set_selected_container(&mut self, container_id: Option<BlockId>) {
        self.selection.set_selected_container(container_id);
    }

    #[must_use]
    pub fn selected_container(&self) -> Option<&ContainerBlock> {
        self.selection.selected_container(self.store.document())
    }

    #[must_use]
    pub fn drag_state(&self) -> &DragState {
        self.tracker.state()
    }

    #[must_use]
    pub const fn nested_drop_suppressed(&self) -> bool {
        self.tracker.nested_drop_suppressed()
    }

    #[must_use]
    pub const fn is_published(&self) -> bool {
        self.published
    }

    /// Freeze or unfreeze the form structure. Publishing cancels any drag.
    pub fn set_published(&mut self, published: bool) {
        if self.published == published {
            return;
        }
        self.published = published;
        if published && self.tracker.is_dragging() {
            let _ = self.tracker.cancel();
        }
        tracing::info!(
            target: "formloom.session",
            published,
            containers = self.store.document().len(),
            "form publish state changed"
        );
    }

    pub fn start_drag(&mut self, source: DragSource) -> DragTransition {
        if self.published {
            return self.tracker.refuse(DragNoopReason::FormPublished);
        }
        self.tracker.start(source)
    }

    pub fn hover(&mut self, target: DropTarget) -> DragTransition {
        self.tracker.hover(target)
    }

    pub fn leave(&mut self) -> DragTransition {
        self.tracker.leave()
    }

    pub fn cancel_drag(&mut self) -> DragTransition {
        self.tracker.cancel()
    }

    /// End the drag, resolve it, and apply the action.
    pub fn drop(&mut self) -> DropOutcome {
        let (transition, request) = self.tracker.drop();
        let Some(request) = request else {
            return DropOutcome {
                transition,
                action: None,
                report: None,
            };
        };
        if self.published {
            return DropOutcome {
                transition,
                action: None,
                report: None,
            };
        }
        let action = self
            .resolver
            .resolve(&request.source, &request.target, self.store.document());
        let report = self.apply_action(action.clone());
        DropOutcome {
            transition,
            action: Some(action),
            report,
        }
    }

    /// Apply a resolved drop action. New blocks get fresh ids and registry
    /// defaults here. `None` for no-op actions.
    pub fn apply_action(&mut self, action: DropAction) -> Option<EditReport> {
        let edit = match action {
            DropAction::Noop { .. } => return None,
            DropAction::InsertNewContainer { block_type, anchor } => {
                let container = self.store.new_container(block_type)?;
                TreeEdit::InsertContainer { container, anchor }
            }
            DropAction::InsertNewField {
                block_type,
                container_id,
                anchor,
            } => {
                let field = self.store.new_field(block_type, &container_id)?;
                TreeEdit::InsertField {
                    container_id,
                    field,
                    anchor,
                }
            }
            DropAction::ReorderContainer {
                container_id,
                anchor,
            } => TreeEdit::ReorderContainer {
                container_id,
                anchor,
            },
            DropAction::MoveField {
                field_id,
                from_container_id,
                to_container_id,
                anchor,
            } => TreeEdit::MoveField {
                field_id,
                from_container_id,
                to_container_id,
                anchor: Some(anchor),
            },
        };
        Some(self.submit(edit))
    }

    /// Apply any edit, honoring the published lock for structural ones.
    pub fn submit(&mut self, edit: TreeEdit) -> EditReport {
        if self.published && edit.is_structural() {
            return self.store.reject(&edit, SkipReason::FormPublished);
        }
        let report = self.store.apply(edit);
        if report.is_applied() && self.selection.prune(self.store.document()) {
            tracing::debug!(
                target: "formloom.session",
                operation_id = report.operation_id,
                "selection cleared by edit"
            );
        }
        report
    }

    pub fn duplicate_container(&mut self, container_id: &BlockId) -> EditReport {
        self.submit(TreeEdit::DuplicateContainer {
            container_id: container_id.clone(),
        })
    }

    pub fn remove_container(&mut self, container_id: &BlockId) -> EditReport {
        self.submit(TreeEdit::RemoveContainer {
            container_id: container_id.clone(),
        })
    }

    pub fn remove_field(&mut self, container_id: &BlockId, field_id: &BlockId) -> EditReport {
        self.submit(TreeEdit::RemoveField {
            container_id: container_id.clone(),
            field_id: field_id.clone(),
        })
    }

    pub fn update_attributes(&mut self, block_id: &BlockId, patch: Attributes) -> EditReport {
        self.submit(TreeEdit::UpdateAttributes {
            block_id: block_id.clone(),
            patch,
            mode: AttributeUpdate::Merge,
        })
    }

    /// What the overlay shows for the current drag; `None` when idle or the
    /// dragged block no longer exists.
    #[must_use]
    pub fn drag_preview(&self) -> Option<DragPreview<'_>> {
        let document = self.store.document();
        match self.tracker.source()? {
            DragSource::PaletteItem { block_type } => {
                Some(DragPreview::Palette(self.store.registry().descriptor(*block_type)))
            }
            DragSource::ExistingContainer { container_id } => {
                document.container(container_id).map(DragPreview::Container)
            }
            DragSource::ExistingField {
                container_id,
                field_id,
            } => document
                .container(container_id)
                .and_then(|container| container.child(field_id))
                .map(DragPreview::Field),
        }
    }

    /// Replace the document with a persisted one.
    ///
    /// Clears the selection and cancels any drag. On error the session is
    /// unchanged.
    pub fn load(&mut self, json: &str) -> Result<(), DocumentError> {
        let document = FormDocument::from_json_str(json)?;
        if self.tracker.is_dragging() {
            let _ = self.tracker.cancel();
        }
        self.selection.clear();
        tracing::info!(
            target: "formloom.session",
            containers = document.len(),
            blocks = document.block_count(),
            "document loaded"
        );
        let _ = self.store.replace_document(document);
        Ok(())
    }

    /// Payload for the save and publish collaborators.
    #[must_use]
    pub fn snapshot_value(&self) -> Value {
        self.store.document().to_json_value()
    }

    #[must_use]
    pub fn snapshot_json(&self) -> String {
        self.store.document().to_json_string()
    }
}
