//! Drag source and drop target descriptors.
//!
//! Hosts translate their pointer events into these values before handing them
//! to the drag tracker; nothing here knows about pixels or DOM nodes.

use serde::{Deserialize, Serialize};

use formloom_model::{BlockId, BlockType, Edge};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DragSource {
    /// A new block from the palette.
    PaletteItem { block_type: BlockType },
    /// A container already in the document.
    ExistingContainer { container_id: BlockId },
    /// A field already in the document.
    ExistingField {
        container_id: BlockId,
        field_id: BlockId,
    },
}

impl DragSource {
    #[must_use]
    pub fn palette(block_type: BlockType) -> Self {
        Self::PaletteItem { block_type }
    }

    #[must_use]
    pub fn container(container_id: impl Into<BlockId>) -> Self {
        Self::ExistingContainer {
            container_id: container_id.into(),
        }
    }

    #[must_use]
    pub fn field(container_id: impl Into<BlockId>, field_id: impl Into<BlockId>) -> Self {
        Self::ExistingField {
            container_id: container_id.into(),
            field_id: field_id.into(),
        }
    }

    /// Palette tag, if this is a palette drag.
    #[must_use]
    pub const fn palette_tag(&self) -> Option<BlockType> {
        match self {
            Self::PaletteItem { block_type } => Some(*block_type),
            _ => None,
        }
    }
}

/// Where the pointer currently hovers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum DropTarget {
    /// Empty canvas, outside every container.
    CanvasRoot,
    /// Above or below a container.
    ContainerEdge { container_id: BlockId, edge: Edge },
    /// Inside a container, not over a field edge.
    ContainerBody { container_id: BlockId },
    /// Above or below a field.
    FieldEdge {
        container_id: BlockId,
        field_id: BlockId,
        edge: Edge,
    },
}

impl DropTarget {
    #[must_use]
    pub fn container_edge(container_id: impl Into<BlockId>, edge: Edge) -> Self {
        Self::ContainerEdge {
            container_id: container_id.into(),
            edge,
        }
    }

    #[must_use]
    pub fn container_body(container_id: impl Into<BlockId>) -> Self {
        Self::ContainerBody {
            container_id: container_id.into(),
        }
    }

    #[must_use]
    pub fn field_edge(
        container_id: impl Into<BlockId>,
        field_id: impl Into<BlockId>,
        edge: Edge,
    ) -> Self {
        Self::FieldEdge {
            container_id: container_id.into(),
            field_id: field_id.into(),
            edge,
        }
    }

    /// Container whose drop zone this is; `None` for the canvas.
    #[must_use]
    pub fn owning_container(&self) -> Option<&BlockId> {
        match self {
            Self::CanvasRoot => None,
            Self::ContainerEdge { container_id, .. }
            | Self::ContainerBody { container_id }
            | Self::FieldEdge { container_id, .. } => Some(container_id),
        }
    }

    /// Field-edge zones are the ones nested-drop suppression disables.
    #[must_use]
    pub const fn is_field_edge(&self) -> bool {
        matches!(self, Self::FieldEdge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_serialize_tagged() {
        let source = DragSource::field("c", "f");
        let value = serde_json::to_value(&source).expect("serialize");
        assert_eq!(value["source"], "existing_field");
        assert_eq!(value["field_id"], "f");

        let target = DropTarget::container_edge("c", Edge::Below);
        let value = serde_json::to_value(&target).expect("serialize");
        assert_eq!(value["target"], "container_edge");
        assert_eq!(value["edge"], "below");
    }

    #[test]
    fn owning_container_covers_every_zone() {
        assert_eq!(DropTarget::CanvasRoot.owning_container(), None);
        for target in [
            DropTarget::container_edge("c", Edge::Above),
            DropTarget::container_body("c"),
            DropTarget::field_edge("c", "f", Edge::Below),
        ] {
            assert_eq!(target.owning_container().map(BlockId::as_str), Some("c"));
        }
    }
}
