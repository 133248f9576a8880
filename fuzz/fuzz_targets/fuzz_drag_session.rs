#![no_main]

use arbitrary::Arbitrary;
use formloom_editor::{DragSource, DropTarget, EditorConfig, EditorSession};
use formloom_model::{BlockId, BlockType, Edge};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    PaletteDrag { tag: u8 },
    ContainerDrag { container: u8 },
    FieldDrag { container: u8, field: u8 },
    HoverCanvas,
    HoverContainerEdge { container: u8, below: bool },
    HoverContainerBody { container: u8 },
    HoverFieldEdge { container: u8, field: u8, below: bool },
    Leave,
    Drop,
    Cancel,
    Duplicate { container: u8 },
    Remove { container: u8 },
    Publish(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    starter_section: bool,
    steps: Vec<Step>,
}

fn edge(below: bool) -> Edge {
    if below { Edge::Below } else { Edge::Above }
}

/// Pick an existing container id, or a stale one when out of range.
fn container_id(session: &EditorSession, index: u8) -> BlockId {
    let ids = session.document().container_ids();
    ids.get(usize::from(index))
        .cloned()
        .unwrap_or_else(|| BlockId::from("stale-container"))
}

fn field_id(session: &EditorSession, container: &BlockId, index: u8) -> BlockId {
    session
        .document()
        .container(container)
        .and_then(|c| c.children().get(usize::from(index)))
        .map(|f| f.id().clone())
        .unwrap_or_else(|| BlockId::from("stale-field"))
}

fuzz_target!(|input: Input| {
    let config = EditorConfig {
        starter_section: input.starter_section,
        ..EditorConfig::default()
    };
    let Ok(mut session) = EditorSession::with_config(config) else {
        return;
    };

    for step in input.steps.into_iter().take(256) {
        let before = session.document().clone();
        match step {
            Step::PaletteDrag { tag } => {
                let tag = BlockType::ALL[usize::from(tag) % BlockType::ALL.len()];
                let _ = session.start_drag(DragSource::palette(tag));
            }
            Step::ContainerDrag { container } => {
                let c = container_id(&session, container);
                let _ = session.start_drag(DragSource::container(c));
            }
            Step::FieldDrag { container, field } => {
                let c = container_id(&session, container);
                let f = field_id(&session, &c, field);
                let _ = session.start_drag(DragSource::field(c, f));
            }
            Step::HoverCanvas => {
                let _ = session.hover(DropTarget::CanvasRoot);
            }
            Step::HoverContainerEdge { container, below } => {
                let c = container_id(&session, container);
                let _ = session.hover(DropTarget::container_edge(c, edge(below)));
            }
            Step::HoverContainerBody { container } => {
                let c = container_id(&session, container);
                let _ = session.hover(DropTarget::container_body(c));
            }
            Step::HoverFieldEdge {
                container,
                field,
                below,
            } => {
                let c = container_id(&session, container);
                let f = field_id(&session, &c, field);
                let _ = session.hover(DropTarget::field_edge(c, f, edge(below)));
            }
            Step::Leave => {
                let _ = session.leave();
            }
            Step::Drop => {
                let outcome = session.drop();
                if !outcome.applied() {
                    assert_eq!(session.document(), &before);
                }
            }
            Step::Cancel => {
                let _ = session.cancel_drag();
            }
            Step::Duplicate { container } => {
                let c = container_id(&session, container);
                let _ = session.duplicate_container(&c);
            }
            Step::Remove { container } => {
                let c = container_id(&session, container);
                let _ = session.remove_container(&c);
            }
            Step::Publish(published) => session.set_published(published),
        }

        assert!(session.document().validate().is_ok());
        if session.is_published() {
            assert_eq!(session.document(), &before);
        }
    }
});
