//! Record lookup: one identifier in, one person's record and relation ids out.

pub mod http;
pub mod page;

pub use http::GenealogyClient;
pub use page::PageParser;

use crate::error::ResolveError;
use crate::types::PersonRecord;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of person records.
///
/// Implementations report a missing record as [`ResolveError::UnknownId`];
/// traversal treats every other error as fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, id: u64) -> Result<PersonRecord, ResolveError>;
}

/// Resolver over a fixed table of records
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    records: HashMap<u64, PersonRecord>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, id: u64, record: PersonRecord) -> Self {
        self.insert(id, record);
        self
    }

    pub fn insert(&mut self, id: u64, record: PersonRecord) -> Option<PersonRecord> {
        self.records.insert(id, record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, id: u64) -> Result<PersonRecord, ResolveError> {
        self.records
            .get(&id)
            .cloned()
            .ok_or(ResolveError::UnknownId(id))
    }
}
