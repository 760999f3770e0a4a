use crate::types::Record;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A graph vertex: one person plus the ids of their advisors and advisees.
///
/// Relation sets are ordered so that every walk over them enumerates ids in
/// ascending order.
#[derive(Debug, Clone)]
pub struct Node {
    record: Record,
    ancestors: BTreeSet<u64>,
    descendants: BTreeSet<u64>,
}

impl Node {
    pub fn new(record: Record, ancestors: BTreeSet<u64>, descendants: BTreeSet<u64>) -> Self {
        Self {
            record,
            ancestors,
            descendants,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn ancestors(&self) -> &BTreeSet<u64> {
        &self.ancestors
    }

    pub fn descendants(&self) -> &BTreeSet<u64> {
        &self.descendants
    }

    /// Returns true if the id was not already present.
    pub fn add_ancestor(&mut self, id: u64) -> bool {
        self.ancestors.insert(id)
    }

    /// Returns true if the id was not already present.
    pub fn add_descendant(&mut self, id: u64) -> bool {
        self.descendants.insert(id)
    }

    pub fn get_id(&self) -> u64 {
        self.record.id()
    }

    /// Rewrites the node's identity. An owning graph keeps this node under its
    /// old key; re-keying is up to the caller.
    pub fn set_id(&mut self, id: u64) {
        self.record.set_id(id);
    }

    /// Label text for graph renderers. The separator is a literal `\n`
    /// escape, not a line break.
    pub fn label(&self) -> String {
        let mut label = self.record.name().to_string();

        match (self.record.institution(), self.record.year()) {
            (Some(institution), Some(year)) => {
                label.push_str(&format!(" \\n{} ({})", institution, year));
            }
            (Some(institution), None) => {
                label.push_str(&format!(" \\n{}", institution));
            }
            (None, Some(year)) => {
                label.push_str(&format!(" \\n({})", year));
            }
            (None, None) => {}
        }

        label
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// Equality and ordering look only at the record, never at the relation sets.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.record == other.record
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.record.cmp(&other.record)
    }
}
