//! Provider error types

use std::fmt;

use fmgdevice_core::schema::TypeError;
use fmgdevice_core::{ApiError, MarshalError};
use thiserror::Error;

/// CRUD operation names used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        };
        write!(f, "{}", verb)
    }
}

/// Errors returned by the CRUD orchestrator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// A required path parameter resolved to nothing
    #[error("{resource_type}: Parameter {param} is missing")]
    MissingPathParameter {
        resource_type: String,
        param: String,
    },

    /// The natural key field is unset on create
    #[error("{resource_type}: key field {field} is not set")]
    MissingKey {
        resource_type: String,
        field: String,
    },

    /// Update called on a resource that has no identifier
    #[error("{resource_type}: resource has no identifier")]
    MissingIdentifier { resource_type: String },

    #[error("{resource_type}: invalid attributes: {}", format_type_errors(.errors))]
    InvalidAttributes {
        resource_type: String,
        errors: Vec<TypeError>,
    },

    #[error("Error {operation} {resource_type} resource: {source}")]
    Remote {
        resource_type: String,
        operation: Operation,
        source: ApiError,
    },

    #[error("{resource_type}: {source}")]
    Marshal {
        resource_type: String,
        source: MarshalError,
    },
}

impl ProviderError {
    pub fn remote(resource_type: impl Into<String>, operation: Operation, source: ApiError) -> Self {
        Self::Remote {
            resource_type: resource_type.into(),
            operation,
            source,
        }
    }

    pub fn marshal(resource_type: impl Into<String>, source: MarshalError) -> Self {
        Self::Marshal {
            resource_type: resource_type.into(),
            source,
        }
    }
}

fn format_type_errors(errors: &[TypeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
