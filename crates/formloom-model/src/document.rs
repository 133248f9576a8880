//! The canonical form document: an ordered list of containers.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize, Serializer};

use crate::block::{Attributes, BlockCapability, BlockRef, BlockType, ContainerBlock, FieldBlock};
use crate::ids::BlockId;

/// Location of a field inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPosition {
    pub container_index: usize,
    pub field_index: usize,
}

/// Ordered list of containers; list order is render order.
///
/// Every public way of building one, decoding included, validates it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Vec<ContainerBlock>")]
pub struct FormDocument {
    containers: Vec<ContainerBlock>,
}

impl TryFrom<Vec<ContainerBlock>> for FormDocument {
    type Error = DocumentError;

    fn try_from(containers: Vec<ContainerBlock>) -> Result<Self, Self::Error> {
        Self::from_containers(containers)
    }
}

impl Serialize for FormDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.containers.serialize(serializer)
    }
}

impl FormDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from containers, rejecting any that break document invariants.
    pub fn from_containers(containers: Vec<ContainerBlock>) -> Result<Self, DocumentError> {
        let document = Self { containers };
        document.validate()?;
        Ok(document)
    }

    /// Decode the persisted JSON shape and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let containers: Vec<ContainerBlock> =
            serde_json::from_str(json).map_err(DocumentError::Json)?;
        Self::from_containers(containers)
    }

    /// Nested plain-data form handed to persistence collaborators.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.containers
                .iter()
                .filter_map(|container| serde_json::to_value(container).ok())
                .collect(),
        )
    }

    /// Compact JSON string of [`Self::to_json_value`].
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    #[must_use]
    pub fn containers(&self) -> &[ContainerBlock] {
        &self.containers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Container ids in render order.
    #[must_use]
    pub fn container_ids(&self) -> Vec<BlockId> {
        self.containers
            .iter()
            .map(|container| container.id().clone())
            .collect()
    }

    #[must_use]
    pub fn container(&self, id: &BlockId) -> Option<&ContainerBlock> {
        self.containers.iter().find(|container| container.id() == id)
    }

    #[must_use]
    pub fn container_index(&self, id: &BlockId) -> Option<usize> {
        self.containers
            .iter()
            .position(|container| container.id() == id)
    }

    /// Find a field anywhere in the document.
    #[must_use]
    pub fn field_position(&self, field_id: &BlockId) -> Option<FieldPosition> {
        self.containers
            .iter()
            .enumerate()
            .find_map(|(container_index, container)| {
                container
                    .child_index(field_id)
                    .map(|field_index| FieldPosition {
                        container_index,
                        field_index,
                    })
            })
    }

    #[must_use]
    pub fn field(&self, field_id: &BlockId) -> Option<&FieldBlock> {
        let position = self.field_position(field_id)?;
        self.containers[position.container_index]
            .children()
            .get(position.field_index)
    }

    /// Look up a block of either capability.
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<BlockRef<'_>> {
        if let Some(container) = self.container(id) {
            return Some(BlockRef::Container(container));
        }
        self.field(id).map(BlockRef::Field)
    }

    #[must_use]
    pub fn contains_id(&self, id: &BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Every id in the document: containers first, each followed by its fields.
    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.containers.iter().flat_map(|container| {
            std::iter::once(container.id()).chain(container.children().iter().map(FieldBlock::id))
        })
    }

    /// Total number of blocks (containers plus fields).
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.containers
            .iter()
            .map(|container| 1 + container.children().len())
            .sum()
    }

    /// Check id uniqueness, parent consistency and capability consistency.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = FxHashSet::default();
        for container in &self.containers {
            if !container.block_type().is_container() {
                return Err(DocumentError::CapabilityMismatch {
                    id: container.id().clone(),
                    block_type: container.block_type(),
                    expected: BlockCapability::Container,
                });
            }
            if !seen.insert(container.id()) {
                return Err(DocumentError::DuplicateId {
                    id: container.id().clone(),
                });
            }
            for field in container.children() {
                if !field.block_type().is_field() {
                    return Err(DocumentError::CapabilityMismatch {
                        id: field.id().clone(),
                        block_type: field.block_type(),
                        expected: BlockCapability::Field,
                    });
                }
                if !seen.insert(field.id()) {
                    return Err(DocumentError::DuplicateId {
                        id: field.id().clone(),
                    });
                }
                if field.parent_id() != container.id() {
                    return Err(DocumentError::ParentMismatch {
                        field_id: field.id().clone(),
                        expected: container.id().clone(),
                        actual: field.parent_id().clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Deterministic structural hash, used in edit reports and the journal.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_str(hash: &mut u64, value: &str) {
            mix_u64(hash, value.len() as u64);
            mix_bytes(hash, value.as_bytes());
        }

        fn mix_attributes(hash: &mut u64, attributes: &Attributes) {
            mix_u64(hash, attributes.len() as u64);
            for (key, value) in attributes {
                mix_str(hash, key);
                mix_str(hash, &value.to_string());
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_u64(&mut hash, self.containers.len() as u64);
        for container in &self.containers {
            mix_str(&mut hash, container.id().as_str());
            mix_str(&mut hash, container.block_type().as_str());
            mix_bytes(&mut hash, &[u8::from(container.is_locked())]);
            mix_attributes(&mut hash, container.attributes());
            mix_u64(&mut hash, container.children().len() as u64);
            for field in container.children() {
                mix_str(&mut hash, field.id().as_str());
                mix_str(&mut hash, field.block_type().as_str());
                mix_str(&mut hash, field.parent_id().as_str());
                mix_attributes(&mut hash, field.attributes());
            }
        }
        hash
    }

    pub(crate) fn containers_mut(&mut self) -> &mut Vec<ContainerBlock> {
        &mut self.containers
    }

    pub(crate) fn container_mut(&mut self, id: &BlockId) -> Option<&mut ContainerBlock> {
        self.containers
            .iter_mut()
            .find(|container| container.id() == id)
    }

    pub(crate) fn attributes_mut(&mut self, id: &BlockId) -> Option<&mut Attributes> {
        if let Some(index) = self.container_index(id) {
            return Some(self.containers[index].attributes_mut());
        }
        let position = self.field_position(id)?;
        self.containers[position.container_index]
            .children_mut()
            .get_mut(position.field_index)
            .map(FieldBlock::attributes_mut)
    }
}

/// Reasons a document fails validation or decoding.
#[derive(Debug)]
pub enum DocumentError {
    DuplicateId {
        id: BlockId,
    },
    ParentMismatch {
        field_id: BlockId,
        expected: BlockId,
        actual: BlockId,
    },
    CapabilityMismatch {
        id: BlockId,
        block_type: BlockType,
        expected: BlockCapability,
    },
    Json(serde_json::Error),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "duplicate block id {id}"),
            Self::ParentMismatch {
                field_id,
                expected,
                actual,
            } => write!(
                f,
                "field {field_id} lives in container {expected} but records parent {actual}"
            ),
            Self::CapabilityMismatch {
                id,
                block_type,
                expected,
            } => write!(
                f,
                "block {id} has tag {block_type}, which is not a {expected:?} tag"
            ),
            Self::Json(err) => write!(f, "document JSON decode error: {err}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Json(err) = self {
            return Some(err);
        }
        None
    }
}
