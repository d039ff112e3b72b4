//! Contract error types for the maintenance service

/// Maintenance service domain errors
///
/// The `Display` text is what callers show inline next to a form or grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaintenanceError {
    /// Row not found
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource name (e.g. "Equipment type")
        resource: String,
        /// Row identifier
        id: String,
    },

    /// Duplicate row or row still referenced
    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    /// Invalid input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Referenced row exists but is flagged inactive
    #[error("{resource} is inactive: {id}")]
    Inactive { resource: String, id: String },

    /// Report rendering failed
    #[error("Export failed: {message}")]
    Export { message: String },

    /// Storage or other unexpected failure
    #[error("Internal error")]
    Internal,
}

impl MaintenanceError {
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn inactive(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::Inactive {
            resource: resource.into(),
            id: id.to_string(),
        }
    }
}
