//! Drag session lifecycle.
//!
//! ```text
//! Idle -> Dragging -> Idle
//!           |  ^
//!           hover / leave
//! ```
//!
//! Every call emits a [`DragTransition`], including calls that do not apply
//! to the current state; those carry [`DragEffect::Noop`] and leave the state
//! alone.

use serde::{Deserialize, Serialize};

use crate::descriptor::{DragSource, DropTarget};

/// Which palette drags raise the nested-drop suppression flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionPolicy {
    /// Only palette items with a container tag.
    #[default]
    ContainerDrags,
    /// Every palette item.
    AllPaletteDrags,
}

impl SuppressionPolicy {
    #[must_use]
    pub fn applies_to(self, source: &DragSource) -> bool {
        match (self, source.palette_tag()) {
            (_, None) => false,
            (Self::AllPaletteDrags, Some(_)) => true,
            (Self::ContainerDrags, Some(tag)) => tag.is_container(),
        }
    }
}

/// Tracker state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        hovered: Option<DropTarget>,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    NothingHovered,
    FormPublished,
}

/// Why a drag ended without a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    /// The host cancelled (escape key, focus loss, document reload).
    Requested,
    /// The pointer was released outside every drop zone.
    ReleasedOutside,
}

/// Effect of one tracker step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        source: DragSource,
        suppress_nested: bool,
    },
    Hovered {
        target: DropTarget,
    },
    Left {
        target: DropTarget,
    },
    Dropped {
        source: DragSource,
        target: DropTarget,
    },
    Canceled {
        source: DragSource,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One tracker transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Source and target handed to the resolver after a drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRequest {
    pub source: DragSource,
    pub target: DropTarget,
}

/// Tracks the single in-flight drag of an editor session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragSessionTracker {
    state: DragState,
    policy: SuppressionPolicy,
    suppress_nested: bool,
    transition_counter: u64,
}

impl DragSessionTracker {
    #[must_use]
    pub fn new(policy: SuppressionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn policy(&self) -> SuppressionPolicy {
        self.policy
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    #[must_use]
    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { source, .. } => Some(source),
        }
    }

    #[must_use]
    pub fn hovered(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { hovered, .. } => hovered.as_ref(),
        }
    }

    /// Whether renderers should disable field-edge zones right now.
    #[must_use]
    pub const fn nested_drop_suppressed(&self) -> bool {
        self.suppress_nested
    }

    pub fn start(&mut self, source: DragSource) -> DragTransition {
        let from = self.state.clone();
        let effect = match &self.state {
            DragState::Dragging { .. } => DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            },
            DragState::Idle => {
                self.suppress_nested = self.policy.applies_to(&source);
                self.state = DragState::Dragging {
                    source: source.clone(),
                    hovered: None,
                };
                DragEffect::Started {
                    source,
                    suppress_nested: self.suppress_nested,
                }
            }
        };
        self.emit(from, effect)
    }

    pub fn hover(&mut self, target: DropTarget) -> DragTransition {
        let from = self.state.clone();
        let effect = match &mut self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Dragging { hovered, .. } => {
                *hovered = Some(target.clone());
                DragEffect::Hovered { target }
            }
        };
        self.emit(from, effect)
    }

    /// Pointer left the hovered zone without entering another.
    pub fn leave(&mut self) -> DragTransition {
        let from = self.state.clone();
        let effect = match &mut self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Dragging { hovered, .. } => match hovered.take() {
                Some(target) => DragEffect::Left { target },
                None => DragEffect::Noop {
                    reason: DragNoopReason::NothingHovered,
                },
            },
        };
        self.emit(from, effect)
    }

    /// End the drag. A drop over a zone yields the request for the resolver;
    /// a drop over nothing is reported as a cancel.
    pub fn drop(&mut self) -> (DragTransition, Option<DropRequest>) {
        let from = self.state.clone();
        match std::mem::take(&mut self.state) {
            DragState::Idle => {
                let effect = DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                };
                (self.emit(from, effect), None)
            }
            DragState::Dragging {
                source,
                hovered: Some(target),
            } => {
                self.suppress_nested = false;
                let request = DropRequest {
                    source: source.clone(),
                    target: target.clone(),
                };
                let effect = DragEffect::Dropped { source, target };
                (self.emit(from, effect), Some(request))
            }
            DragState::Dragging {
                source,
                hovered: None,
            } => {
                self.suppress_nested = false;
                let effect = DragEffect::Canceled {
                    source,
                    reason: DragCancelReason::ReleasedOutside,
                };
                (self.emit(from, effect), None)
            }
        }
    }

    pub fn cancel(&mut self) -> DragTransition {
        let from = self.state.clone();
        let effect = match std::mem::take(&mut self.state) {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Dragging { source, .. } => {
                self.suppress_nested = false;
                DragEffect::Canceled {
                    source,
                    reason: DragCancelReason::Requested,
                }
            }
        };
        self.emit(from, effect)
    }

    /// Record an event the caller refused for its own reasons.
    pub fn refuse(&mut self, reason: DragNoopReason) -> DragTransition {
        let from = self.state.clone();
        self.emit(from, DragEffect::Noop { reason })
    }

    fn emit(&mut self, from: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.clone(),
            effect,
        };
        tracing::trace!(
            target: "formloom.drag",
            transition_id = transition.transition_id,
            effect = ?transition.effect,
            dragging = self.is_dragging(),
            suppress_nested = self.suppress_nested,
            "drag transition"
        );
        transition
    }
}
