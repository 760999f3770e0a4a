//! Core types for the genealogy grapher

use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// One person as known to the lineage database.
///
/// Field order matters: the derived `Ord` compares `(name, institution, year, id)`
/// lexicographically, with an absent institution or year sorting first.
/// Fields are read-only outside the crate and every path in, deserialization
/// included, goes through [`Record::new`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct Record {
    name: String,
    institution: Option<String>,
    year: Option<i32>,
    id: u64,
}

#[derive(Deserialize)]
struct RecordFields {
    name: String,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    id: u64,
}

impl TryFrom<RecordFields> for Record {
    type Error = GraphError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        Record::new(fields.name, fields.institution, fields.year, fields.id)
    }
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        institution: Option<String>,
        year: Option<i32>,
        id: u64,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GraphError::InvalidRecord(format!(
                "record {} has an empty name",
                id
            )));
        }

        Ok(Self {
            name,
            institution,
            year,
            id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn institution(&self) -> Option<&str> {
        self.institution.as_deref()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn has_institution(&self) -> bool {
        self.institution.is_some()
    }

    pub fn has_year(&self) -> bool {
        self.year.is_some()
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Everything a resolver knows about one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub name: String,
    pub institution: Option<String>,
    pub year: Option<i32>,
    /// Advisor ids, in source order
    pub ancestor_ids: Vec<u64>,
    /// Advisee ids, in source order
    pub descendant_ids: Vec<u64>,
}

/// Which relations a traversal follows away from its seeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalDirections {
    pub ancestors: bool,
    pub descendants: bool,
}

impl TraversalDirections {
    pub fn new(ancestors: bool, descendants: bool) -> Self {
        Self {
            ancestors,
            descendants,
        }
    }

    pub fn both() -> Self {
        Self::new(true, true)
    }

    pub fn is_empty(&self) -> bool {
        !self.ancestors && !self.descendants
    }
}
