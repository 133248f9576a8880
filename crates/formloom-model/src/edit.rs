//! Structural edit descriptions and their outcome reports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::{Attributes, BlockType, ContainerAnchor, ContainerBlock, FieldAnchor, FieldBlock};
use crate::ids::BlockId;

/// How an attribute patch combines with the current attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeUpdate {
    /// Shallow merge: patch keys overwrite, other keys stay.
    Merge,
    /// Replace the whole attribute map.
    Replace,
}

/// One mutation of the block tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeEdit {
    /// Insert a detached container at the end or next to an anchor container.
    InsertContainer {
        container: ContainerBlock,
        anchor: Option<ContainerAnchor>,
    },
    /// Move a container next to another one.
    ReorderContainer {
        container_id: BlockId,
        anchor: ContainerAnchor,
    },
    /// Insert a detached field into a container.
    InsertField {
        container_id: BlockId,
        field: FieldBlock,
        anchor: Option<FieldAnchor>,
    },
    /// Move a field within or across containers.
    MoveField {
        field_id: BlockId,
        from_container_id: BlockId,
        to_container_id: BlockId,
        anchor: Option<FieldAnchor>,
    },
    /// Deep-copy a container and its fields with fresh ids.
    DuplicateContainer { container_id: BlockId },
    /// Delete a container and its fields.
    RemoveContainer { container_id: BlockId },
    /// Delete one field.
    RemoveField {
        container_id: BlockId,
        field_id: BlockId,
    },
    /// Attribute pass-through; not structural.
    UpdateAttributes {
        block_id: BlockId,
        patch: Attributes,
        mode: AttributeUpdate,
    },
}

impl TreeEdit {
    #[must_use]
    pub const fn kind(&self) -> EditKind {
        match self {
            Self::InsertContainer { .. } => EditKind::InsertContainer,
            Self::ReorderContainer { .. } => EditKind::ReorderContainer,
            Self::InsertField { .. } => EditKind::InsertField,
            Self::MoveField { .. } => EditKind::MoveField,
            Self::DuplicateContainer { .. } => EditKind::DuplicateContainer,
            Self::RemoveContainer { .. } => EditKind::RemoveContainer,
            Self::RemoveField { .. } => EditKind::RemoveField,
            Self::UpdateAttributes { .. } => EditKind::UpdateAttributes,
        }
    }

    /// Whether the edit changes membership or ordering.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::UpdateAttributes { .. })
    }

    /// Ids the edit names, in argument order, without duplicates.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<BlockId> = match self {
            Self::InsertContainer { container, anchor } => {
                let mut ids = vec![container.id().clone()];
                ids.extend(anchor.iter().map(|a| a.container_id.clone()));
                ids
            }
            Self::ReorderContainer {
                container_id,
                anchor,
            } => vec![container_id.clone(), anchor.container_id.clone()],
            Self::InsertField {
                container_id,
                field,
                anchor,
            } => {
                let mut ids = vec![container_id.clone(), field.id().clone()];
                ids.extend(anchor.iter().map(|a| a.field_id.clone()));
                ids
            }
            Self::MoveField {
                field_id,
                from_container_id,
                to_container_id,
                anchor,
            } => {
                let mut ids = vec![
                    field_id.clone(),
                    from_container_id.clone(),
                    to_container_id.clone(),
                ];
                ids.extend(anchor.iter().map(|a| a.field_id.clone()));
                ids
            }
            Self::DuplicateContainer { container_id } | Self::RemoveContainer { container_id } => {
                vec![container_id.clone()]
            }
            Self::RemoveField {
                container_id,
                field_id,
            } => vec![container_id.clone(), field_id.clone()],
            Self::UpdateAttributes { block_id, .. } => vec![block_id.clone()],
        };
        let mut seen = Vec::with_capacity(ids.len());
        ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
        ids
    }
}

/// Stable edit discriminator used in logs and the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    InsertContainer,
    ReorderContainer,
    InsertField,
    MoveField,
    DuplicateContainer,
    RemoveContainer,
    RemoveField,
    UpdateAttributes,
}

/// Why an edit left the document unchanged.
///
/// None of these are errors: drag-and-drop races and disabled zones are
/// expected to produce them, and callers are free to ignore the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// An id argument does not resolve in the current document.
    StaleReference { id: BlockId },
    /// The edit would change a locked container.
    LockedTarget { container_id: BlockId },
    /// Source and anchor are the same block.
    SameBlock { id: BlockId },
    /// A container tag was used where a field is required, or vice versa.
    CapabilityMismatch { id: BlockId, block_type: BlockType },
    /// The inserted block reuses an id already in the document.
    DuplicateId { id: BlockId },
    /// The form is published and its structure is frozen.
    FormPublished,
    /// The staged document failed validation and was discarded.
    InvariantViolation { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleReference { id } => write!(f, "block {id} does not resolve"),
            Self::LockedTarget { container_id } => {
                write!(f, "container {container_id} is locked")
            }
            Self::SameBlock { id } => write!(f, "block {id} cannot anchor to itself"),
            Self::CapabilityMismatch { id, block_type } => {
                write!(f, "block {id} has tag {block_type} with the wrong capability")
            }
            Self::DuplicateId { id } => write!(f, "block id {id} is already in use"),
            Self::FormPublished => f.write_str("form is published"),
            Self::InvariantViolation { detail } => write!(f, "invariant violation: {detail}"),
        }
    }
}

/// Applied or skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditStatus {
    Applied,
    Skipped(SkipReason),
}

/// Outcome of one edit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReport {
    pub operation_id: u64,
    pub kind: EditKind,
    /// Ids named by the edit plus any it created.
    pub touched: Vec<BlockId>,
    /// Ids of blocks the edit created, container first.
    pub created: Vec<BlockId>,
    pub before_hash: u64,
    pub after_hash: u64,
    pub status: EditStatus,
}

impl EditReport {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self.status, EditStatus::Applied)
    }

    #[must_use]
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            EditStatus::Applied => None,
            EditStatus::Skipped(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Edge;

    #[test]
    fn referenced_ids_deduplicate_same_container_moves() {
        let edit = TreeEdit::MoveField {
            field_id: BlockId::from("f"),
            from_container_id: BlockId::from("c"),
            to_container_id: BlockId::from("c"),
            anchor: Some(FieldAnchor::new("g", Edge::Below)),
        };
        let ids = edit.referenced_ids();
        let ids: Vec<&str> = ids.iter().map(BlockId::as_str).collect();
        assert_eq!(ids, ["f", "c", "g"]);
        assert_eq!(edit.kind(), EditKind::MoveField);
        assert!(edit.is_structural());
    }

    #[test]
    fn skip_reason_serializes_with_tag() {
        let reason = SkipReason::LockedTarget {
            container_id: BlockId::from("c"),
        };
        let value = serde_json::to_value(&reason).expect("serialize");
        assert_eq!(value["reason"], "locked_target");
        assert_eq!(value["container_id"], "c");
    }
}
