//! Block types, capabilities, and the container/field records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::BlockId;

/// Block-type-specific configuration. Opaque to the tree engine.
pub type Attributes = Map<String, Value>;

/// Closed set of block tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockType {
    RowLayout,
    Heading,
    Paragraph,
    TextField,
    TextArea,
    Select,
    MultipleChoice,
    RadioSelect,
    StarRating,
    #[serde(alias = "Fileupload")]
    FileUpload,
}

impl BlockType {
    /// Every tag, in palette order.
    pub const ALL: [Self; 10] = [
        Self::RowLayout,
        Self::Heading,
        Self::Paragraph,
        Self::TextField,
        Self::TextArea,
        Self::Select,
        Self::MultipleChoice,
        Self::RadioSelect,
        Self::StarRating,
        Self::FileUpload,
    ];

    /// Capability implied by the tag.
    #[must_use]
    pub const fn capability(self) -> BlockCapability {
        match self {
            Self::RowLayout => BlockCapability::Container,
            _ => BlockCapability::Field,
        }
    }

    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self.capability(), BlockCapability::Container)
    }

    #[must_use]
    pub const fn is_field(self) -> bool {
        matches!(self.capability(), BlockCapability::Field)
    }

    /// Stable tag name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowLayout => "RowLayout",
            Self::Heading => "Heading",
            Self::Paragraph => "Paragraph",
            Self::TextField => "TextField",
            Self::TextArea => "TextArea",
            Self::Select => "Select",
            Self::MultipleChoice => "MultipleChoice",
            Self::RadioSelect => "RadioSelect",
            Self::StarRating => "StarRating",
            Self::FileUpload => "FileUpload",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a block can do in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCapability {
    /// Holds an ordered list of fields.
    Container,
    /// Leaf input or content element.
    Field,
}

/// Which half of a rendered block a drop landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Above,
    Below,
}

impl Edge {
    /// Insertion index relative to an anchor found at `anchor_index`.
    #[must_use]
    pub const fn insertion_index(self, anchor_index: usize) -> usize {
        match self {
            Self::Above => anchor_index,
            Self::Below => anchor_index + 1,
        }
    }
}

/// Placement next to an existing container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerAnchor {
    pub container_id: BlockId,
    pub edge: Edge,
}

impl ContainerAnchor {
    #[must_use]
    pub fn new(container_id: impl Into<BlockId>, edge: Edge) -> Self {
        Self {
            container_id: container_id.into(),
            edge,
        }
    }
}

/// Placement next to an existing field inside one container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldAnchor {
    pub field_id: BlockId,
    pub edge: Edge,
}

impl FieldAnchor {
    #[must_use]
    pub fn new(field_id: impl Into<BlockId>, edge: Edge) -> Self {
        Self {
            field_id: field_id.into(),
            edge,
        }
    }
}

/// Leaf block owned by exactly one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBlock {
    id: BlockId,
    block_type: BlockType,
    parent_id: BlockId,
    #[serde(default)]
    attributes: Attributes,
}

impl FieldBlock {
    pub(crate) fn new(
        id: BlockId,
        block_type: BlockType,
        parent_id: BlockId,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            block_type,
            parent_id,
            attributes,
        }
    }

    #[must_use]
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Id of the owning container.
    #[must_use]
    pub fn parent_id(&self) -> &BlockId {
        &self.parent_id
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Convenience accessor for one attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub(crate) fn set_parent(&mut self, parent_id: BlockId) {
        self.parent_id = parent_id;
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Top-level block holding an ordered list of fields.
///
/// Decoding fills in a missing `parentId` on a child with the id of the
/// container that holds it. A `parentId` that is present is kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ContainerRecord")]
pub struct ContainerBlock {
    id: BlockId,
    block_type: BlockType,
    #[serde(rename = "isLocked", default)]
    locked: bool,
    #[serde(default)]
    attributes: Attributes,
    #[serde(rename = "childBlocks", default)]
    children: Vec<FieldBlock>,
}

impl ContainerBlock {
    pub(crate) fn new(id: BlockId, block_type: BlockType, attributes: Attributes) -> Self {
        Self {
            id,
            block_type,
            locked: false,
            attributes,
            children: Vec::new(),
        }
    }

    /// Set the lock flag on a container that is not yet part of a document.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Append a field to a container that is not yet part of a document.
    ///
    /// The field is re-parented onto this container.
    #[must_use]
    pub fn with_child(mut self, mut field: FieldBlock) -> Self {
        field.set_parent(self.id.clone());
        self.children.push(field);
        self
    }

    #[must_use]
    pub fn id(&self) -> &BlockId {
        &self.id
    }

    #[must_use]
    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Fields in render order.
    #[must_use]
    pub fn children(&self) -> &[FieldBlock] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, field_id: &BlockId) -> Option<&FieldBlock> {
        self.children.iter().find(|field| field.id() == field_id)
    }

    #[must_use]
    pub fn child_index(&self, field_id: &BlockId) -> Option<usize> {
        self.children.iter().position(|field| field.id() == field_id)
    }

    /// Child ids in render order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<BlockId> {
        self.children.iter().map(|field| field.id().clone()).collect()
    }

    pub(crate) fn set_id(&mut self, id: BlockId) {
        self.id = id;
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<FieldBlock> {
        &mut self.children
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// Persisted container shape, where children may omit `parentId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerRecord {
    id: BlockId,
    block_type: BlockType,
    #[serde(default)]
    is_locked: bool,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    child_blocks: Vec<FieldRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    id: BlockId,
    block_type: BlockType,
    #[serde(default)]
    parent_id: Option<BlockId>,
    #[serde(default)]
    attributes: Attributes,
}

impl From<ContainerRecord> for ContainerBlock {
    fn from(record: ContainerRecord) -> Self {
        let children = record
            .child_blocks
            .into_iter()
            .map(|field| {
                let parent_id = field.parent_id.unwrap_or_else(|| record.id.clone());
                FieldBlock::new(field.id, field.block_type, parent_id, field.attributes)
            })
            .collect();
        Self {
            id: record.id,
            block_type: record.block_type,
            locked: record.is_locked,
            attributes: record.attributes,
            children,
        }
    }
}

/// Owned block of either capability, as produced by the registry factory.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Container(ContainerBlock),
    Field(FieldBlock),
}

impl Block {
    #[must_use]
    pub fn id(&self) -> &BlockId {
        match self {
            Self::Container(container) => container.id(),
            Self::Field(field) => field.id(),
        }
    }

    #[must_use]
    pub const fn capability(&self) -> BlockCapability {
        match self {
            Self::Container(_) => BlockCapability::Container,
            Self::Field(_) => BlockCapability::Field,
        }
    }

    #[must_use]
    pub fn into_container(self) -> Option<ContainerBlock> {
        match self {
            Self::Container(container) => Some(container),
            Self::Field(_) => None,
        }
    }

    #[must_use]
    pub fn into_field(self) -> Option<FieldBlock> {
        match self {
            Self::Field(field) => Some(field),
            Self::Container(_) => None,
        }
    }
}

/// Borrowed view of a block found in a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockRef<'a> {
    Container(&'a ContainerBlock),
    Field(&'a FieldBlock),
}

impl<'a> BlockRef<'a> {
    #[must_use]
    pub fn id(self) -> &'a BlockId {
        match self {
            Self::Container(container) => container.id(),
            Self::Field(field) => field.id(),
        }
    }

    #[must_use]
    pub fn block_type(self) -> BlockType {
        match self {
            Self::Container(container) => container.block_type(),
            Self::Field(field) => field.block_type(),
        }
    }

    #[must_use]
    pub fn attributes(self) -> &'a Attributes {
        match self {
            Self::Container(container) => container.attributes(),
            Self::Field(field) => field.attributes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_follows_tag() {
        assert!(BlockType::RowLayout.is_container());
        for tag in BlockType::ALL.into_iter().filter(|t| *t != BlockType::RowLayout) {
            assert_eq!(tag.capability(), BlockCapability::Field, "{tag}");
        }
    }

    #[test]
    fn legacy_file_upload_tag_is_accepted() {
        let tag: BlockType = serde_json::from_str("\"Fileupload\"").expect("legacy tag");
        assert_eq!(tag, BlockType::FileUpload);
        assert_eq!(
            serde_json::to_string(&BlockType::FileUpload).expect("serialize"),
            "\"FileUpload\""
        );
    }

    #[test]
    fn edge_insertion_index() {
        assert_eq!(Edge::Above.insertion_index(2), 2);
        assert_eq!(Edge::Below.insertion_index(2), 3);
    }

    #[test]
    fn with_child_reparents_field() {
        let field = FieldBlock::new(
            BlockId::from("f"),
            BlockType::Heading,
            BlockId::from("elsewhere"),
            Attributes::new(),
        );
        let container =
            ContainerBlock::new(BlockId::from("c"), BlockType::RowLayout, Attributes::new())
                .with_child(field);
        assert_eq!(container.children()[0].parent_id().as_str(), "c");
    }

    #[test]
    fn decode_fills_missing_parent_from_container() {
        let json = r#"{"id":"c","blockType":"RowLayout","childBlocks":[
            {"id":"a","blockType":"TextField"},
            {"id":"b","blockType":"Heading","parentId":"elsewhere"}]}"#;
        let container: ContainerBlock = serde_json::from_str(json).expect("decode");
        assert!(!container.is_locked());
        assert_eq!(container.children()[0].parent_id().as_str(), "c");
        assert_eq!(container.children()[1].parent_id().as_str(), "elsewhere");
    }

    #[test]
    fn container_serializes_in_persisted_shape() {
        let container =
            ContainerBlock::new(BlockId::from("c"), BlockType::RowLayout, Attributes::new())
                .with_locked(true);
        let value = serde_json::to_value(&container).expect("serialize");
        assert_eq!(value["blockType"], "RowLayout");
        assert_eq!(value["isLocked"], true);
        assert!(value["childBlocks"].as_array().expect("array").is_empty());
    }
}
