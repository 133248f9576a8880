//! Static block registry: tag → capability, palette label, and factory.

use serde_json::{Value, json};

use crate::block::{Attributes, Block, BlockCapability, BlockType, ContainerBlock, FieldBlock};
use crate::ids::BlockId;

const PARAGRAPH_TEXT: &str = "Lorem ipsum dolor sit amet,consectetur adipiscing elit. Curabitur quis sem odio. Sed commodo vestibulum leo.";

/// Registry entry for one block tag.
#[derive(Debug, Clone, Copy)]
pub struct BlockDescriptor {
    pub block_type: BlockType,
    pub capability: BlockCapability,
    /// Palette button label.
    pub label: &'static str,
    default_attributes: fn() -> Value,
}

impl BlockDescriptor {
    /// Fresh copy of the tag's default attributes.
    #[must_use]
    pub fn default_attributes(&self) -> Attributes {
        match (self.default_attributes)() {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }
}

static DESCRIPTORS: [BlockDescriptor; 10] = [
    BlockDescriptor {
        block_type: BlockType::RowLayout,
        capability: BlockCapability::Container,
        label: "Row Layout",
        default_attributes: || json!({}),
    },
    BlockDescriptor {
        block_type: BlockType::Heading,
        capability: BlockCapability::Field,
        label: "Heading",
        default_attributes: || {
            json!({
                "label": "Heading",
                "level": 1,
                "fontSize": "medium",
                "fontWeight": "normal",
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::Paragraph,
        capability: BlockCapability::Field,
        label: "Paragraph",
        default_attributes: || {
            json!({
                "label": "Paragraph",
                "text": PARAGRAPH_TEXT,
                "fontSize": "small",
                "fontWeight": "normal",
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::TextField,
        capability: BlockCapability::Field,
        label: "Text Field",
        default_attributes: || {
            json!({
                "label": "Text Field",
                "helperText": "",
                "required": false,
                "placeHolder": "Enter Text",
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::TextArea,
        capability: BlockCapability::Field,
        label: "Text Area",
        default_attributes: || {
            json!({
                "label": "Text Area",
                "helperText": "",
                "required": false,
                "placeHolder": "Enter Text",
                "rows": 3,
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::Select,
        capability: BlockCapability::Field,
        label: "Select",
        default_attributes: || {
            json!({
                "label": "Select Field",
                "helperText": "",
                "required": false,
                "placeHolder": "Select",
                "options": ["Option1", "Option2"],
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::MultipleChoice,
        capability: BlockCapability::Field,
        label: "Multiple Choice",
        default_attributes: || {
            json!({
                "label": "Multiple Choice",
                "helperText": "",
                "required": false,
                "placeHolder": "Select",
                "options": ["Option1", "Option2"],
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::RadioSelect,
        capability: BlockCapability::Field,
        label: "Radio",
        default_attributes: || {
            json!({
                "label": "Select an option",
                "options": ["Option1", "Option2"],
                "required": false,
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::StarRating,
        capability: BlockCapability::Field,
        label: "Star Rating",
        default_attributes: || {
            json!({
                "label": "Star Rating",
                "helperText": "",
                "maxStars": 5,
                "required": true,
            })
        },
    },
    BlockDescriptor {
        block_type: BlockType::FileUpload,
        capability: BlockCapability::Field,
        label: "Upload File",
        default_attributes: || {
            json!({
                "label": "Upload File",
                "helperText": "",
                "required": false,
            })
        },
    },
];

/// Side table mapping every [`BlockType`] to its descriptor and factory.
///
/// The tree engine only asks the registry for capabilities; concrete field
/// semantics stay inside the attribute bags the factory seeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRegistry;

impl BlockRegistry {
    /// The built-in registry.
    pub const STANDARD: Self = Self;

    #[must_use]
    pub fn descriptor(&self, block_type: BlockType) -> &'static BlockDescriptor {
        let index = match block_type {
            BlockType::RowLayout => 0,
            BlockType::Heading => 1,
            BlockType::Paragraph => 2,
            BlockType::TextField => 3,
            BlockType::TextArea => 4,
            BlockType::Select => 5,
            BlockType::MultipleChoice => 6,
            BlockType::RadioSelect => 7,
            BlockType::StarRating => 8,
            BlockType::FileUpload => 9,
        };
        &DESCRIPTORS[index]
    }

    #[must_use]
    pub fn capability(&self, block_type: BlockType) -> BlockCapability {
        self.descriptor(block_type).capability
    }

    /// Descriptors in palette order.
    pub fn palette(&self) -> impl Iterator<Item = &'static BlockDescriptor> {
        DESCRIPTORS.iter()
    }

    /// Build a block of any capability.
    ///
    /// `parent_id` is required for field tags and ignored for containers;
    /// `None` is returned when a field tag is requested without one.
    #[must_use]
    pub fn create(
        &self,
        block_type: BlockType,
        id: BlockId,
        parent_id: Option<&BlockId>,
    ) -> Option<Block> {
        match self.capability(block_type) {
            BlockCapability::Container => self.create_container(block_type, id).map(Block::Container),
            BlockCapability::Field => {
                let parent_id = parent_id?;
                self.create_field(block_type, id, parent_id.clone())
                    .map(Block::Field)
            }
        }
    }

    /// Build an unlocked, empty container. `None` for field tags.
    #[must_use]
    pub fn create_container(&self, block_type: BlockType, id: BlockId) -> Option<ContainerBlock> {
        let descriptor = self.descriptor(block_type);
        if descriptor.capability != BlockCapability::Container {
            return None;
        }
        Some(ContainerBlock::new(
            id,
            block_type,
            descriptor.default_attributes(),
        ))
    }

    /// Build a field owned by `parent_id`. `None` for container tags.
    #[must_use]
    pub fn create_field(
        &self,
        block_type: BlockType,
        id: BlockId,
        parent_id: BlockId,
    ) -> Option<FieldBlock> {
        let descriptor = self.descriptor(block_type);
        if descriptor.capability != BlockCapability::Field {
            return None;
        }
        Some(FieldBlock::new(
            id,
            block_type,
            parent_id,
            descriptor.default_attributes(),
        ))
    }
}
