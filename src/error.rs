use thiserror::Error;

/// Errors raised by the graph containers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An id was inserted twice
    #[error("node with id {0} already exists")]
    DuplicateNode(u64),

    /// Lookup of an id the graph does not hold
    #[error("node with id {0} not found")]
    NodeNotFound(u64),

    /// Record fields failed validation
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// Outcome of a failed record lookup
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The source has no record for this id. Traversal skips it.
    #[error("unknown identifier {0}")]
    UnknownId(u64),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with an unexpected status
    #[error("unexpected status {status} for id {id}")]
    Status { id: u64, status: u16 },

    /// The record page could not be understood
    #[error("failed to parse record {id}: {reason}")]
    Parse { id: u64, reason: String },
}

/// Errors that abort a traversal
#[derive(Error, Debug)]
pub enum TraversalError {
    #[error("no seed identifiers given")]
    NoSeeds,

    #[error("seed {0} could not be resolved")]
    SeedUnresolvable(u64),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
