//! Drop resolution: (source, target) pairs to editor actions.
//!
//! Rules are checked in order and the first match wins. Resolution is pure;
//! applying the resulting [`DropAction`] is the session's job.

use serde::{Deserialize, Serialize};

use formloom_model::{BlockId, BlockType, ContainerAnchor, FieldAnchor, FormDocument};

use crate::descriptor::{DragSource, DropTarget};

/// Why a drop resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoopReason {
    /// No rule accepts this source on this target.
    NoMatchingRule,
    /// The target zone belongs to a locked container.
    LockedTarget { container_id: BlockId },
}

/// What a drop asks the store to do. New blocks are named by tag only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DropAction {
    InsertNewContainer {
        block_type: BlockType,
        anchor: Option<ContainerAnchor>,
    },
    ReorderContainer {
        container_id: BlockId,
        anchor: ContainerAnchor,
    },
    InsertNewField {
        block_type: BlockType,
        container_id: BlockId,
        anchor: Option<FieldAnchor>,
    },
    MoveField {
        field_id: BlockId,
        from_container_id: BlockId,
        to_container_id: BlockId,
        anchor: FieldAnchor,
    },
    Noop {
        reason: NoopReason,
    },
}

impl DropAction {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }

    const fn no_match() -> Self {
        Self::Noop {
            reason: NoopReason::NoMatchingRule,
        }
    }
}

/// Resolution rules in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropRule {
    FieldOntoFieldEdge,
    PaletteFieldOntoFieldEdge,
    PaletteContainerOntoCanvas,
    PaletteContainerOntoContainerEdge,
    ContainerOntoContainerEdge,
    PaletteFieldOntoContainerBody,
}

impl DropRule {
    pub const ORDER: [Self; 6] = [
        Self::FieldOntoFieldEdge,
        Self::PaletteFieldOntoFieldEdge,
        Self::PaletteContainerOntoCanvas,
        Self::PaletteContainerOntoContainerEdge,
        Self::ContainerOntoContainerEdge,
        Self::PaletteFieldOntoContainerBody,
    ];

    /// The action this rule produces, or `None` if it does not match.
    #[must_use]
    pub fn apply(self, source: &DragSource, target: &DropTarget) -> Option<DropAction> {
        match (self, source, target) {
            (
                Self::FieldOntoFieldEdge,
                DragSource::ExistingField {
                    container_id: from,
                    field_id,
                },
                DropTarget::FieldEdge {
                    container_id: to,
                    field_id: anchor_id,
                    edge,
                },
            ) => Some(DropAction::MoveField {
                field_id: field_id.clone(),
                from_container_id: from.clone(),
                to_container_id: to.clone(),
                anchor: FieldAnchor::new(anchor_id.clone(), *edge),
            }),
            (
                Self::PaletteFieldOntoFieldEdge,
                DragSource::PaletteItem { block_type },
                DropTarget::FieldEdge {
                    container_id,
                    field_id,
                    edge,
                },
            ) if block_type.is_field() => Some(DropAction::InsertNewField {
                block_type: *block_type,
                container_id: container_id.clone(),
                anchor: Some(FieldAnchor::new(field_id.clone(), *edge)),
            }),
            (
                Self::PaletteContainerOntoCanvas,
                DragSource::PaletteItem { block_type },
                DropTarget::CanvasRoot,
            ) if block_type.is_container() => Some(DropAction::InsertNewContainer {
                block_type: *block_type,
                anchor: None,
            }),
            (
                Self::PaletteContainerOntoContainerEdge,
                DragSource::PaletteItem { block_type },
                DropTarget::ContainerEdge { container_id, edge },
            ) if block_type.is_container() => Some(DropAction::InsertNewContainer {
                block_type: *block_type,
                anchor: Some(ContainerAnchor::new(container_id.clone(), *edge)),
            }),
            (
                Self::ContainerOntoContainerEdge,
                DragSource::ExistingContainer { container_id },
                DropTarget::ContainerEdge {
                    container_id: anchor_id,
                    edge,
                },
            ) => Some(DropAction::ReorderContainer {
                container_id: container_id.clone(),
                anchor: ContainerAnchor::new(anchor_id.clone(), *edge),
            }),
            (
                Self::PaletteFieldOntoContainerBody,
                DragSource::PaletteItem { block_type },
                DropTarget::ContainerBody { container_id },
            ) if block_type.is_field() => Some(DropAction::InsertNewField {
                block_type: *block_type,
                container_id: container_id.clone(),
                anchor: None,
            }),
            _ => None,
        }
    }
}

/// Stateless resolver; see [`DropRule::ORDER`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DropResolver;

impl DropResolver {
    /// Resolve a drop against the current document.
    ///
    /// The document is consulted only to disable zones owned by locked
    /// containers.
    #[must_use]
    pub fn resolve(
        &self,
        source: &DragSource,
        target: &DropTarget,
        document: &FormDocument,
    ) -> DropAction {
        let Some((rule, action)) = DropRule::ORDER
            .into_iter()
            .find_map(|rule| rule.apply(source, target).map(|action| (rule, action)))
        else {
            tracing::debug!(
                target: "formloom.resolver",
                source = ?source,
                drop_target = ?target,
                "no drop rule matched"
            );
            return DropAction::no_match();
        };

        let locked_owner = target.owning_container().filter(|container_id| {
            document
                .container(container_id)
                .is_some_and(|container| container.is_locked())
        });
        if let Some(container_id) = locked_owner {
            tracing::debug!(
                target: "formloom.resolver",
                rule = ?rule,
                container_id = %container_id,
                "drop zone disabled by locked container"
            );
            return DropAction::Noop {
                reason: NoopReason::LockedTarget {
                    container_id: container_id.clone(),
                },
            };
        }

        tracing::debug!(
            target: "formloom.resolver",
            rule = ?rule,
            action = ?action,
            "drop resolved"
        );
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formloom_model::{BlockRegistry, Edge};

    fn document() -> FormDocument {
        let registry = BlockRegistry::STANDARD;
        let open = registry
            .create_container(BlockType::RowLayout, BlockId::from("c1"))
            .expect("container")
            .with_child(
                registry
                    .create_field(BlockType::TextField, BlockId::from("f1"), BlockId::from("c1"))
                    .expect("field"),
            );
        let locked = registry
            .create_container(BlockType::RowLayout, BlockId::from("c2"))
            .expect("container")
            .with_locked(true);
        FormDocument::from_containers(vec![open, locked]).expect("valid")
    }

    fn resolve(source: DragSource, target: DropTarget) -> DropAction {
        DropResolver.resolve(&source, &target, &document())
    }

    #[test]
    fn existing_field_onto_field_edge_moves() {
        let action = resolve(
            DragSource::field("c1", "f1"),
            DropTarget::field_edge("c3", "g", Edge::Below),
        );
        assert_eq!(
            action,
            DropAction::MoveField {
                field_id: BlockId::from("f1"),
                from_container_id: BlockId::from("c1"),
                to_container_id: BlockId::from("c3"),
                anchor: FieldAnchor::new("g", Edge::Below),
            }
        );
    }

    #[test]
    fn palette_items_route_by_capability() {
        assert_eq!(
            resolve(DragSource::palette(BlockType::RowLayout), DropTarget::CanvasRoot),
            DropAction::InsertNewContainer {
                block_type: BlockType::RowLayout,
                anchor: None,
            }
        );
        assert_eq!(
            resolve(
                DragSource::palette(BlockType::Heading),
                DropTarget::container_body("c1")
            ),
            DropAction::InsertNewField {
                block_type: BlockType::Heading,
                container_id: BlockId::from("c1"),
                anchor: None,
            }
        );
        assert!(resolve(DragSource::palette(BlockType::Heading), DropTarget::CanvasRoot).is_noop());
        assert!(
            resolve(
                DragSource::palette(BlockType::RowLayout),
                DropTarget::container_body("c1")
            )
            .is_noop()
        );
    }

    #[test]
    fn container_onto_container_edge_reorders() {
        assert_eq!(
            resolve(
                DragSource::container("c1"),
                DropTarget::container_edge("c9", Edge::Above)
            ),
            DropAction::ReorderContainer {
                container_id: BlockId::from("c1"),
                anchor: ContainerAnchor::new("c9", Edge::Above),
            }
        );
    }

    #[test]
    fn unmatched_pairs_are_noops() {
        for (source, target) in [
            (DragSource::container("c1"), DropTarget::CanvasRoot),
            (DragSource::container("c1"), DropTarget::container_body("c1")),
            (DragSource::field("c1", "f1"), DropTarget::container_body("c1")),
            (DragSource::field("c1", "f1"), DropTarget::CanvasRoot),
        ] {
            assert_eq!(
                resolve(source, target),
                DropAction::Noop {
                    reason: NoopReason::NoMatchingRule
                }
            );
        }
    }

    #[test]
    fn locked_container_zones_are_disabled() {
        for target in [
            DropTarget::container_edge("c2", Edge::Below),
            DropTarget::container_body("c2"),
        ] {
            let source = match &target {
                DropTarget::ContainerBody { .. } => DragSource::palette(BlockType::TextArea),
                _ => DragSource::container("c1"),
            };
            assert_eq!(
                resolve(source, target),
                DropAction::Noop {
                    reason: NoopReason::LockedTarget {
                        container_id: BlockId::from("c2")
                    }
                }
            );
        }
    }
}
