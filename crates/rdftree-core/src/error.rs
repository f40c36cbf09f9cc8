use thiserror::Error;

/// Malformed result graphs. Every variant is a property of the input; none is
/// transient, so callers should report rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RdfTreeError {
    #[error("{this} is not the subject of any result statement, so a tree cannot be generated")]
    MissingRoot { this: String },

    #[error("conflicting result shape: {reason}")]
    ConflictingShape { reason: String },

    #[error("invalid control statement {predicate}: {reason}")]
    InvalidControlTriple { predicate: String, reason: String },

    #[error("ordering statement does not fit the result shape: {reason}")]
    ShapeMismatch { reason: String },

    #[error("unknown sort order: {value}")]
    UnknownSortOrder { value: String },

    #[error("malformed result list at {resource}: {reason}")]
    MalformedList { resource: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RdfTreeError>;
