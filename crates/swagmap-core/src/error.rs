//! Error types for swagmap.

use thiserror::Error;

/// Main error type for swagmap operations.
///
/// Only hard lookup failures are errors. Orphan skills, unreachable goals and
/// loops that hit their pass cap are reported as data on the result types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwagmapError {
    /// A project was looked up by a name that is not in the catalogue.
    #[error("Project not found: {name}")]
    UnknownProject { name: String },

    /// A project extends a parent that is not in the catalogue.
    #[error("Project '{project}' extends unknown project '{parent}'")]
    UnknownParent { project: String, parent: String },

    /// A goal or start descriptor did not canonicalize to exactly one skill.
    #[error("Descriptor '{descriptor}' does not name a single skill")]
    EmptyGoal { descriptor: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SwagmapError {
    /// Returns true if this error comes from a missing catalogue entry.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            SwagmapError::UnknownProject { .. } | SwagmapError::UnknownParent { .. }
        )
    }

    /// Returns the project name involved, if any.
    pub fn project(&self) -> Option<&str> {
        match self {
            SwagmapError::UnknownProject { name } => Some(name),
            SwagmapError::UnknownParent { project, .. } => Some(project),
            _ => None,
        }
    }
}

/// Convenience Result type for swagmap operations.
pub type Result<T> = std::result::Result<T, SwagmapError>;

impl From<serde_json::Error> for SwagmapError {
    fn from(err: serde_json::Error) -> Self {
        SwagmapError::Serialization(err.to_string())
    }
}
