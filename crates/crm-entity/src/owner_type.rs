//! Entity type identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a business entity type (lead, deal, a dynamic type, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypeId(i32);

impl EntityTypeId {
    /// Lead.
    pub const LEAD: Self = Self(1);
    /// Deal.
    pub const DEAL: Self = Self(2);
    /// Contact.
    pub const CONTACT: Self = Self(3);
    /// Company.
    pub const COMPANY: Self = Self(4);

    /// First id reserved for dynamic types.
    pub const DYNAMIC_TYPE_START: i32 = 128;
    /// End (exclusive) of the dynamic type id range.
    pub const DYNAMIC_TYPE_END: i32 = 192;

    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns true if the id falls into the range reserved for dynamic types.
    ///
    /// This says nothing about whether such a type is actually registered.
    #[must_use]
    pub const fn is_possible_dynamic_type(self) -> bool {
        self.0 >= Self::DYNAMIC_TYPE_START && self.0 < Self::DYNAMIC_TYPE_END
    }
}

impl From<i32> for EntityTypeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A row of the dynamic type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeRecord {
    /// Row id of the type definition.
    pub id: i64,
    /// Entity type id assigned to the type.
    pub entity_type_id: EntityTypeId,
    /// Symbolic code.
    pub code: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl EntityTypeRecord {
    /// Creates a new record.
    pub fn new(
        id: i64,
        entity_type_id: EntityTypeId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            entity_type_id,
            code: code.into(),
            name: name.into(),
        }
    }
}
