//! Block tree store: owns the document and applies edits atomically.
//!
//! Every edit is staged on a clone of the current document. The clone
//! replaces the document only when the edit fully applies and the result
//! validates; otherwise the document is left exactly as it was and the
//! report carries a [`SkipReason`]. No edit panics or returns an error.

use crate::block::{
    Attributes, BlockType, ContainerAnchor, ContainerBlock, FieldAnchor, FieldBlock,
};
use crate::document::FormDocument;
use crate::edit::{AttributeUpdate, EditReport, EditStatus, SkipReason, TreeEdit};
use crate::ids::{BlockId, IdGenerator};
use crate::journal::EditJournal;
use crate::registry::BlockRegistry;

/// Owner of the canonical [`FormDocument`].
#[derive(Debug, Clone)]
pub struct BlockTreeStore {
    document: FormDocument,
    ids: IdGenerator,
    registry: BlockRegistry,
    journal: EditJournal,
    next_operation_id: u64,
}

impl Default for BlockTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTreeStore {
    /// Empty document with the default id generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(FormDocument::new(), IdGenerator::default(), EditJournal::default())
    }

    /// Wrap a document. [`FormDocument`] values are validated when built
    /// or decoded, so the store always starts from a consistent tree.
    #[must_use]
    pub fn from_document(document: FormDocument) -> Self {
        Self::with_parts(document, IdGenerator::default(), EditJournal::default())
    }

    #[must_use]
    pub fn with_parts(document: FormDocument, ids: IdGenerator, journal: EditJournal) -> Self {
        Self {
            document,
            ids,
            registry: BlockRegistry::STANDARD,
            journal,
            next_operation_id: 1,
        }
    }

    /// Read-only snapshot for renderers.
    #[must_use]
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    #[must_use]
    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    #[must_use]
    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    /// Swap in a different document, keeping the id generator and journal.
    ///
    /// Returns the previous document.
    pub fn replace_document(&mut self, document: FormDocument) -> FormDocument {
        tracing::debug!(
            target: "formloom.store",
            containers = document.len(),
            blocks = document.block_count(),
            state_hash = document.state_hash(),
            "document replaced"
        );
        std::mem::replace(&mut self.document, document)
    }

    /// Next id that is not already used in the document.
    pub fn fresh_id(&mut self) -> BlockId {
        let document = &self.document;
        self.ids.next_id_where(|id| document.contains_id(id))
    }

    /// Instantiate a detached container with a fresh id.
    pub fn new_container(&mut self, block_type: BlockType) -> Option<ContainerBlock> {
        if !block_type.is_container() {
            return None;
        }
        let id = self.fresh_id();
        self.registry.create_container(block_type, id)
    }

    /// Instantiate a detached field with a fresh id, parented on `parent_id`.
    pub fn new_field(&mut self, block_type: BlockType, parent_id: &BlockId) -> Option<FieldBlock> {
        if !block_type.is_field() {
            return None;
        }
        let id = self.fresh_id();
        self.registry.create_field(block_type, id, parent_id.clone())
    }

    pub fn insert_container(
        &mut self,
        container: ContainerBlock,
        anchor: Option<ContainerAnchor>,
    ) -> EditReport {
        self.apply(TreeEdit::InsertContainer { container, anchor })
    }

    pub fn reorder_container(&mut self, container_id: &BlockId, anchor: ContainerAnchor) -> EditReport {
        self.apply(TreeEdit::ReorderContainer {
            container_id: container_id.clone(),
            anchor,
        })
    }

    pub fn insert_field(
        &mut self,
        container_id: &BlockId,
        field: FieldBlock,
        anchor: Option<FieldAnchor>,
    ) -> EditReport {
        self.apply(TreeEdit::InsertField {
            container_id: container_id.clone(),
            field,
            anchor,
        })
    }

    pub fn move_field(
        &mut self,
        field_id: &BlockId,
        from_container_id: &BlockId,
        to_container_id: &BlockId,
        anchor: Option<FieldAnchor>,
    ) -> EditReport {
        self.apply(TreeEdit::MoveField {
            field_id: field_id.clone(),
            from_container_id: from_container_id.clone(),
            to_container_id: to_container_id.clone(),
            anchor,
        })
    }

    pub fn duplicate_container(&mut self, container_id: &BlockId) -> EditReport {
        self.apply(TreeEdit::DuplicateContainer {
            container_id: container_id.clone(),
        })
    }

    pub fn remove_container(&mut self, container_id: &BlockId) -> EditReport {
        self.apply(TreeEdit::RemoveContainer {
            container_id: container_id.clone(),
        })
    }

    pub fn remove_field(&mut self, container_id: &BlockId, field_id: &BlockId) -> EditReport {
        self.apply(TreeEdit::RemoveField {
            container_id: container_id.clone(),
            field_id: field_id.clone(),
        })
    }

    /// Shallow-merge `patch` into a block's attributes.
    pub fn update_attributes(&mut self, block_id: &BlockId, patch: Attributes) -> EditReport {
        self.apply(TreeEdit::UpdateAttributes {
            block_id: block_id.clone(),
            patch,
            mode: AttributeUpdate::Merge,
        })
    }

    /// Overwrite a block's attributes.
    pub fn replace_attributes(&mut self, block_id: &BlockId, attributes: Attributes) -> EditReport {
        self.apply(TreeEdit::UpdateAttributes {
            block_id: block_id.clone(),
            patch: attributes,
            mode: AttributeUpdate::Replace,
        })
    }

    /// Record a skipped edit without attempting it.
    ///
    /// Used by callers that gate edits on state the store does not own, such
    /// as a published form.
    pub fn reject(&mut self, edit: &TreeEdit, reason: SkipReason) -> EditReport {
        let operation_id = self.next_operation_id();
        let hash = self.document.state_hash();
        self.finish(EditReport {
            operation_id,
            kind: edit.kind(),
            touched: edit.referenced_ids(),
            created: Vec::new(),
            before_hash: hash,
            after_hash: hash,
            status: EditStatus::Skipped(reason),
        })
    }

    /// Apply one edit atomically.
    pub fn apply(&mut self, edit: TreeEdit) -> EditReport {
        let operation_id = self.next_operation_id();
        let kind = edit.kind();
        let mut touched = edit.referenced_ids();
        let before_hash = self.document.state_hash();
        let mut working = self.document.clone();
        let mut created = Vec::new();

        let staged = apply_edit(&mut working, &mut self.ids, edit, &mut created)
            .and_then(|()| {
                working
                    .validate()
                    .map_err(|err| SkipReason::InvariantViolation {
                        detail: err.to_string(),
                    })
            });

        let report = match staged {
            Ok(()) => {
                for id in &created {
                    if !touched.contains(id) {
                        touched.push(id.clone());
                    }
                }
                let after_hash = working.state_hash();
                self.document = working;
                EditReport {
                    operation_id,
                    kind,
                    touched,
                    created,
                    before_hash,
                    after_hash,
                    status: EditStatus::Applied,
                }
            }
            Err(reason) => EditReport {
                operation_id,
                kind,
                touched,
                created: Vec::new(),
                before_hash,
                after_hash: before_hash,
                status: EditStatus::Skipped(reason),
            },
        };
        self.finish(report)
    }

    fn finish(&mut self, report: EditReport) -> EditReport {
        match &report.status {
            EditStatus::Applied => tracing::debug!(
                target: "formloom.store",
                operation_id = report.operation_id,
                kind = ?report.kind,
                touched = report.touched.len(),
                before_hash = report.before_hash,
                after_hash = report.after_hash,
                "edit applied"
            ),
            EditStatus::Skipped(reason) => tracing::debug!(
                target: "formloom.store",
                operation_id = report.operation_id,
                kind = ?report.kind,
                reason = %reason,
                "edit skipped"
            ),
        }
        self.journal.record(&report);
        report
    }

    fn next_operation_id(&mut self) -> u64 {
        let id = self.next_operation_id;
        self.next_operation_id = self.next_operation_id.saturating_add(1);
        id
    }
}

fn apply_edit(
    document: &mut FormDocument,
    ids: &mut IdGenerator,
    edit: TreeEdit,
    created: &mut Vec<BlockId>,
) -> Result<(), SkipReason> {
    match edit {
        TreeEdit::InsertContainer { container, anchor } => {
            insert_container(document, container, anchor, created)
        }
        TreeEdit::ReorderContainer {
            container_id,
            anchor,
        } => reorder_container(document, &container_id, &anchor),
        TreeEdit::InsertField {
            container_id,
            field,
            anchor,
        } => insert_field(document, &container_id, field, anchor.as_ref(), created),
        TreeEdit::MoveField {
            field_id,
            from_container_id,
            to_container_id,
            anchor,
        } => move_field(
            document,
            &field_id,
            &from_container_id,
            &to_container_id,
            anchor.as_ref(),
        ),
        TreeEdit::DuplicateContainer { container_id } => {
            duplicate_container(document, ids, &container_id, created)
        }
        TreeEdit::RemoveContainer { container_id } => remove_container(document, &container_id),
        TreeEdit::RemoveField {
            container_id,
            field_id,
        } => remove_field(document, &container_id, &field_id),
        TreeEdit::UpdateAttributes {
            block_id,
            patch,
            mode,
        } => update_attributes(document, &block_id, patch, mode),
    }
}

fn stale(id: &BlockId) -> SkipReason {
    SkipReason::StaleReference { id: id.clone() }
}

fn locked(container_id: &BlockId) -> SkipReason {
    SkipReason::LockedTarget {
        container_id: container_id.clone(),
    }
}

fn insert_container(
    document: &mut FormDocument,
    mut container: ContainerBlock,
    anchor: Option<ContainerAnchor>,
    created: &mut Vec<BlockId>,
) -> Result<(), SkipReason> {
    if !container.block_type().is_container() {
        return Err(SkipReason::CapabilityMismatch {
            id: container.id().clone(),
            block_type: container.block_type(),
        });
    }
    let incoming = std::iter::once(container.id()).chain(container.children().iter().map(FieldBlock::id));
    for id in incoming {
        if document.contains_id(id) {
            return Err(SkipReason::DuplicateId { id: id.clone() });
        }
    }
    let index = match &anchor {
        None => document.len(),
        Some(anchor) => {
            let anchor_index = document
                .container_index(&anchor.container_id)
                .ok_or_else(|| stale(&anchor.container_id))?;
            anchor.edge.insertion_index(anchor_index)
        }
    };
    let container_id = container.id().clone();
    for field in container.children_mut() {
        field.set_parent(container_id.clone());
    }
    created.push(container_id);
    created.extend(container.children().iter().map(|field| field.id().clone()));
    document.containers_mut().insert(index, container);
    Ok(())
}

fn reorder_container(
    document: &mut FormDocument,
    container_id: &BlockId,
    anchor: &ContainerAnchor,
) -> Result<(), SkipReason> {
    if *container_id == anchor.container_id {
        return Err(SkipReason::SameBlock {
            id: container_id.clone(),
        });
    }
    let from = document
        .container_index(container_id)
        .ok_or_else(|| stale(container_id))?;
    if document.container_index(&anchor.container_id).is_none() {
        return Err(stale(&anchor.container_id));
    }
    if document.containers()[from].is_locked() {
        return Err(locked(container_id));
    }
    let containers = document.containers_mut();
    let moving = containers.remove(from);
    let anchor_index = containers
        .iter()
        .position(|container| *container.id() == anchor.container_id)
        .ok_or_else(|| stale(&anchor.container_id))?;
    containers.insert(anchor.edge.insertion_index(anchor_index), moving);
    Ok(())
}

fn insert_field(
    document: &mut FormDocument,
    container_id: &BlockId,
    mut field: FieldBlock,
    anchor: Option<&FieldAnchor>,
    created: &mut Vec<BlockId>,
) -> Result<(), SkipReason> {
    if !field.block_type().is_field() {
        return Err(SkipReason::CapabilityMismatch {
            id: field.id().clone(),
            block_type: field.block_type(),
        });
    }
    if document.contains_id(field.id()) {
        return Err(SkipReason::DuplicateId {
            id: field.id().clone(),
        });
    }
    let container = document
        .container_mut(container_id)
        .ok_or_else(|| stale(container_id))?;
    if container.is_locked() {
        return Err(locked(container_id));
    }
    let index = match anchor {
        None => container.children().len(),
        Some(anchor) => {
            let anchor_index = container
                .child_index(&anchor.field_id)
                .ok_or_else(|| stale(&anchor.field_id))?;
            anchor.edge.insertion_index(anchor_index)
        }
    };
    field.set_parent(container_id.clone());
    created.push(field.id().clone());
    container.children_mut().insert(index, field);
    Ok(())
}

fn move_field(
    document: &mut FormDocument,
    field_id: &BlockId,
    from_container_id: &BlockId,
    to_container_id: &BlockId,
    anchor: Option<&FieldAnchor>,
) -> Result<(), SkipReason> {
    for container_id in [from_container_id, to_container_id] {
        let container = document
            .container(container_id)
            .ok_or_else(|| stale(container_id))?;
        if container.is_locked() {
            return Err(locked(container_id));
        }
    }

    // Detach first; the anchor index is computed against the post-removal list.
    let source = document
        .container_mut(from_container_id)
        .ok_or_else(|| stale(from_container_id))?;
    let field_index = source
        .child_index(field_id)
        .ok_or_else(|| stale(field_id))?;
    let mut field = source.children_mut().remove(field_index);

    let destination = document
        .container_mut(to_container_id)
        .ok_or_else(|| stale(to_container_id))?;
    let index = match anchor {
        None => destination.children().len(),
        Some(anchor) => {
            let anchor_index = destination
                .child_index(&anchor.field_id)
                .ok_or_else(|| stale(&anchor.field_id))?;
            anchor.edge.insertion_index(anchor_index)
        }
    };
    field.set_parent(to_container_id.clone());
    destination.children_mut().insert(index, field);
    Ok(())
}

fn duplicate_container(
    document: &mut FormDocument,
    ids: &mut IdGenerator,
    container_id: &BlockId,
    created: &mut Vec<BlockId>,
) -> Result<(), SkipReason> {
    let index = document
        .container_index(container_id)
        .ok_or_else(|| stale(container_id))?;
    let mut clone = document.containers()[index].clone();

    let taken = |id: &BlockId| document.contains_id(id);
    let clone_id = ids.next_id_where(taken);
    let child_ids: Vec<BlockId> = clone
        .children()
        .iter()
        .map(|_| ids.next_id_where(taken))
        .collect();

    clone.set_id(clone_id.clone());
    clone.set_locked(false);
    for (field, id) in clone.children_mut().iter_mut().zip(child_ids) {
        field.set_id(id);
        field.set_parent(clone_id.clone());
    }
    created.push(clone_id);
    created.extend(clone.children().iter().map(|field| field.id().clone()));
    document.containers_mut().insert(index + 1, clone);
    Ok(())
}

fn remove_container(document: &mut FormDocument, container_id: &BlockId) -> Result<(), SkipReason> {
    let index = document
        .container_index(container_id)
        .ok_or_else(|| stale(container_id))?;
    if document.containers()[index].is_locked() {
        return Err(locked(container_id));
    }
    let _ = document.containers_mut().remove(index);
    Ok(())
}

fn remove_field(
    document: &mut FormDocument,
    container_id: &BlockId,
    field_id: &BlockId,
) -> Result<(), SkipReason> {
    let container = document
        .container_mut(container_id)
        .ok_or_else(|| stale(container_id))?;
    if container.is_locked() {
        return Err(locked(container_id));
    }
    let index = container
        .child_index(field_id)
        .ok_or_else(|| stale(field_id))?;
    let _ = container.children_mut().remove(index);
    Ok(())
}

fn update_attributes(
    document: &mut FormDocument,
    block_id: &BlockId,
    patch: Attributes,
    mode: AttributeUpdate,
) -> Result<(), SkipReason> {
    let attributes = document
        .attributes_mut(block_id)
        .ok_or_else(|| stale(block_id))?;
    match mode {
        AttributeUpdate::Merge => {
            for (key, value) in patch {
                let _ = attributes.insert(key, value);
            }
        }
        AttributeUpdate::Replace => *attributes = patch,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Edge;
    use serde_json::json;

    fn id(raw: &str) -> BlockId {
        BlockId::from(raw)
    }

    /// Store with containers `c1..` holding fields named by `layout`.
    fn store_with(layout: &[(&str, &[&str])]) -> BlockTreeStore {
        let registry = BlockRegistry::STANDARD;
        let containers = layout
            .iter()
            .map(|(container_id, fields)| {
                fields.iter().fold(
                    registry
                        .create_container(BlockType::RowLayout, id(container_id))
                        .expect("row layout"),
                    |container, field_id| {
                        container.with_child(
                            registry
                                .create_field(BlockType::TextField, id(field_id), id(container_id))
                                .expect("text field"),
                        )
                    },
                )
            })
            .collect();
        BlockTreeStore::from_document(FormDocument::from_containers(containers).expect("valid"))
    }

    fn lock(store: &mut BlockTreeStore, container_id: &str) {
        let mut document = store.document().clone();
        document
            .container_mut(&id(container_id))
            .expect("container")
            .set_locked(true);
        let _ = store.replace_document(document);
    }

    fn children(store: &BlockTreeStore, container_id: &str) -> Vec<String> {
        store
            .document()
            .container(&id(container_id))
            .expect("container")
            .children()
            .iter()
            .map(|field| field.id().to_string())
            .collect()
    }

    fn order(store: &BlockTreeStore) -> Vec<String> {
        store
            .document()
            .container_ids()
            .into_iter()
            .map(BlockId::into_string)
            .collect()
    }

    #[test]
    fn insert_container_appends_without_anchor() {
        let mut store = BlockTreeStore::new();
        let container = store.new_container(BlockType::RowLayout).expect("container");
        let report = store.insert_container(container, None);
        assert!(report.is_applied());
        assert_eq!(store.document().len(), 1);
        assert_eq!(report.created, vec![id("blk-1")]);
    }

    #[test]
    fn insert_container_respects_anchor_edges() {
        let mut store = store_with(&[("a", &[]), ("b", &[])]);
        let above = store.new_container(BlockType::RowLayout).expect("container");
        let above_id = above.id().to_string();
        let _ = store.insert_container(above, Some(ContainerAnchor::new("b", Edge::Above)));
        let below = store.new_container(BlockType::RowLayout).expect("container");
        let below_id = below.id().to_string();
        let _ = store.insert_container(below, Some(ContainerAnchor::new("b", Edge::Below)));
        assert_eq!(order(&store), ["a".to_string(), above_id, "b".into(), below_id]);
    }

    #[test]
    fn insert_container_with_missing_anchor_is_noop() {
        let mut store = store_with(&[("a", &[])]);
        let before = store.document().clone();
        let container = store.new_container(BlockType::RowLayout).expect("container");
        let report =
            store.insert_container(container, Some(ContainerAnchor::new("ghost", Edge::Below)));
        assert_eq!(
            report.skip_reason(),
            Some(&SkipReason::StaleReference { id: id("ghost") })
        );
        assert_eq!(store.document(), &before);
        assert_eq!(report.before_hash, report.after_hash);
    }

    #[test]
    fn insert_container_rejects_reused_ids() {
        let mut store = store_with(&[("a", &["f"])]);
        let clash = BlockRegistry::STANDARD
            .create_container(BlockType::RowLayout, id("f"))
            .expect("container");
        let report = store.insert_container(clash, None);
        assert_eq!(report.skip_reason(), Some(&SkipReason::DuplicateId { id: id("f") }));
    }

    #[test]
    fn reorder_container_moves_without_touching_children() {
        let mut store = store_with(&[("a", &["f1"]), ("b", &[]), ("c", &["f2", "f3"])]);
        let report = store.reorder_container(&id("c"), ContainerAnchor::new("a", Edge::Above));
        assert!(report.is_applied());
        assert_eq!(order(&store), ["c", "a", "b"]);
        assert_eq!(children(&store, "c"), ["f2", "f3"]);

        let _ = store.reorder_container(&id("c"), ContainerAnchor::new("b", Edge::Below));
        assert_eq!(order(&store), ["a", "b", "c"]);
    }

    #[test]
    fn reorder_container_below_previous_neighbour_uses_post_removal_index() {
        let mut store = store_with(&[("a", &[]), ("b", &[]), ("c", &[])]);
        let _ = store.reorder_container(&id("a"), ContainerAnchor::new("b", Edge::Below));
        assert_eq!(order(&store), ["b", "a", "c"]);
    }

    #[test]
    fn reorder_container_noops() {
        let mut store = store_with(&[("a", &[]), ("b", &[])]);
        let same = store.reorder_container(&id("a"), ContainerAnchor::new("a", Edge::Below));
        assert_eq!(same.skip_reason(), Some(&SkipReason::SameBlock { id: id("a") }));
        let missing = store.reorder_container(&id("a"), ContainerAnchor::new("zz", Edge::Below));
        assert!(!missing.is_applied());
        lock(&mut store, "a");
        let locked = store.reorder_container(&id("a"), ContainerAnchor::new("b", Edge::Below));
        assert_eq!(
            locked.skip_reason(),
            Some(&SkipReason::LockedTarget { container_id: id("a") })
        );
        assert_eq!(order(&store), ["a", "b"]);
    }

    #[test]
    fn insert_field_places_and_parents() {
        let mut store = store_with(&[("c", &["a", "b"])]);
        let field = store.new_field(BlockType::Heading, &id("elsewhere")).expect("field");
        let new_id = field.id().to_string();
        let report = store.insert_field(&id("c"), field, Some(FieldAnchor::new("a", Edge::Below)));
        assert!(report.is_applied());
        assert_eq!(children(&store, "c"), ["a".to_string(), new_id.clone(), "b".into()]);
        let placed = store.document().field(&id(&new_id)).expect("field");
        assert_eq!(placed.parent_id(), &id("c"));
    }

    #[test]
    fn insert_field_into_locked_container_is_rejected() {
        let mut store = store_with(&[("c", &[])]);
        lock(&mut store, "c");
        let field = store.new_field(BlockType::TextArea, &id("c")).expect("field");
        let report = store.insert_field(&id("c"), field, None);
        assert_eq!(
            report.skip_reason(),
            Some(&SkipReason::LockedTarget { container_id: id("c") })
        );
        assert!(children(&store, "c").is_empty());
    }

    #[test]
    fn move_field_within_container_uses_post_removal_indices() {
        let mut store = store_with(&[("c", &["a", "b", "d"])]);
        let report = store.move_field(
            &id("a"),
            &id("c"),
            &id("c"),
            Some(FieldAnchor::new("b", Edge::Below)),
        );
        assert!(report.is_applied());
        assert_eq!(children(&store, "c"), ["b", "a", "d"]);

        let _ = store.move_field(
            &id("d"),
            &id("c"),
            &id("c"),
            Some(FieldAnchor::new("b", Edge::Above)),
        );
        assert_eq!(children(&store, "c"), ["d", "b", "a"]);
    }

    #[test]
    fn move_field_onto_itself_is_noop() {
        let mut store = store_with(&[("c", &["a", "b"])]);
        let before = store.document().clone();
        let report = store.move_field(
            &id("a"),
            &id("c"),
            &id("c"),
            Some(FieldAnchor::new("a", Edge::Below)),
        );
        assert!(!report.is_applied());
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn move_field_across_containers_reparents() {
        let mut store = store_with(&[("c1", &["f1"]), ("c2", &["f2"])]);
        let report = store.move_field(
            &id("f1"),
            &id("c1"),
            &id("c2"),
            Some(FieldAnchor::new("f2", Edge::Below)),
        );
        assert!(report.is_applied());
        assert!(children(&store, "c1").is_empty());
        assert_eq!(children(&store, "c2"), ["f2", "f1"]);
        assert_eq!(
            store.document().field(&id("f1")).expect("f1").parent_id(),
            &id("c2")
        );
    }

    #[test]
    fn move_field_with_stale_anchor_leaves_source_intact() {
        let mut store = store_with(&[("c1", &["f1"]), ("c2", &["f2"])]);
        let before = store.document().clone();
        let report = store.move_field(
            &id("f1"),
            &id("c1"),
            &id("c2"),
            Some(FieldAnchor::new("ghost", Edge::Above)),
        );
        assert!(!report.is_applied());
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn move_field_respects_locks_on_both_sides() {
        let mut store = store_with(&[("c1", &["f1"]), ("c2", &["f2"])]);
        lock(&mut store, "c2");
        let into_locked = store.move_field(&id("f1"), &id("c1"), &id("c2"), None);
        assert!(!into_locked.is_applied());
        let out_of_locked = store.move_field(&id("f2"), &id("c2"), &id("c1"), None);
        assert!(!out_of_locked.is_applied());
        assert_eq!(children(&store, "c1"), ["f1"]);
        assert_eq!(children(&store, "c2"), ["f2"]);
    }

    #[test]
    fn duplicate_container_is_deep_and_disjoint() {
        let mut store = store_with(&[("c", &["f1", "f2"]), ("z", &[])]);
        let _ = store.update_attributes(&id("f2"), {
            let mut patch = Attributes::new();
            let _ = patch.insert("label".into(), json!("Email"));
            patch
        });
        let report = store.duplicate_container(&id("c"));
        assert!(report.is_applied());
        let document = store.document();
        assert_eq!(document.len(), 3);
        let clone = &document.containers()[1];
        assert_eq!(report.created[0], *clone.id());
        assert_ne!(clone.id(), &id("c"));
        let original = document.container(&id("c")).expect("original");
        for (copy, source) in clone.children().iter().zip(original.children()) {
            assert_ne!(copy.id(), source.id());
            assert_eq!(copy.parent_id(), clone.id());
            assert_eq!(copy.attributes(), source.attributes());
        }
        assert_eq!(clone.children()[1].attribute("label"), Some(&json!("Email")));
        assert!(document.validate().is_ok());
    }

    #[test]
    fn duplicate_of_empty_container_lands_right_after_it() {
        let mut store = store_with(&[("a", &["f"]), ("empty", &[]), ("z", &[])]);
        let report = store.duplicate_container(&id("empty"));
        assert!(report.is_applied());
        assert_eq!(report.created.len(), 1);
        let clone_id = report.created[0].to_string();
        assert_eq!(order(&store), ["a", "empty", clone_id.as_str(), "z"]);
        assert!(children(&store, &clone_id).is_empty());
        assert_eq!(children(&store, "a"), ["f"]);
    }

    #[test]
    fn decoded_documents_accept_edits() {
        let json = r#"[{"id":"c1","blockType":"RowLayout","childBlocks":[{"id":"f1","blockType":"TextField"}]},
            {"id":"c2","blockType":"RowLayout"}]"#;
        let document: FormDocument = serde_json::from_str(json).expect("valid");
        let mut store = BlockTreeStore::from_document(document);
        let report = store.move_field(&id("f1"), &id("c1"), &id("c2"), None);
        assert!(report.is_applied(), "{:?}", report.status);
        assert_eq!(children(&store, "c2"), ["f1"]);
    }

    #[test]
    fn duplicate_of_locked_container_is_unlocked() {
        let mut store = store_with(&[("c", &["f"])]);
        lock(&mut store, "c");
        let report = store.duplicate_container(&id("c"));
        assert!(report.is_applied());
        assert!(!store.document().containers()[1].is_locked());
    }

    #[test]
    fn duplicate_skips_ids_already_in_loaded_documents() {
        let mut store = store_with(&[("blk-1", &["blk-2"])]);
        let report = store.duplicate_container(&id("blk-1"));
        assert_eq!(report.created, vec![id("blk-3"), id("blk-4")]);
    }

    #[test]
    fn remove_container_discards_children() {
        let mut store = store_with(&[("a", &["f1"]), ("b", &[])]);
        let report = store.remove_container(&id("a"));
        assert!(report.is_applied());
        assert!(store.document().field(&id("f1")).is_none());
        assert_eq!(order(&store), ["b"]);
        assert!(!store.remove_container(&id("a")).is_applied());
    }

    #[test]
    fn remove_field_and_locks() {
        let mut store = store_with(&[("a", &["f1", "f2"]), ("b", &["g"])]);
        assert!(store.remove_field(&id("a"), &id("f1")).is_applied());
        assert_eq!(children(&store, "a"), ["f2"]);
        assert!(!store.remove_field(&id("a"), &id("g")).is_applied());
        lock(&mut store, "b");
        assert!(!store.remove_field(&id("b"), &id("g")).is_applied());
        assert!(!store.remove_container(&id("b")).is_applied());
    }

    #[test]
    fn attribute_updates_merge_or_replace() {
        let mut store = store_with(&[("c", &["f"])]);
        let mut patch = Attributes::new();
        let _ = patch.insert("required".into(), json!(true));
        assert!(store.update_attributes(&id("f"), patch).is_applied());
        let field = store.document().field(&id("f")).expect("field");
        assert_eq!(field.attribute("required"), Some(&json!(true)));
        assert_eq!(field.attribute("label"), Some(&json!("Text Field")));

        let mut replacement = Attributes::new();
        let _ = replacement.insert("label".into(), json!("Only"));
        assert!(store.replace_attributes(&id("f"), replacement).is_applied());
        let field = store.document().field(&id("f")).expect("field");
        assert_eq!(field.attributes().len(), 1);

        assert!(!store.update_attributes(&id("ghost"), Attributes::new()).is_applied());
    }

    #[test]
    fn journal_records_applied_and_skipped() {
        let mut store = store_with(&[("a", &[])]);
        let _ = store.remove_container(&id("ghost"));
        let _ = store.remove_container(&id("a"));
        let kinds: Vec<bool> = store
            .journal()
            .entries()
            .map(|entry| entry.result == crate::journal::EditJournalResult::Applied)
            .collect();
        assert_eq!(kinds, [false, true]);
    }

    #[test]
    fn reject_records_without_mutating() {
        let mut store = store_with(&[("a", &[])]);
        let before = store.document().clone();
        let edit = TreeEdit::RemoveContainer {
            container_id: id("a"),
        };
        let report = store.reject(&edit, SkipReason::FormPublished);
        assert_eq!(report.skip_reason(), Some(&SkipReason::FormPublished));
        assert_eq!(store.document(), &before);
        assert_eq!(store.journal().len(), 1);
    }
}
