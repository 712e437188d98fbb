//! Error type shared by spec validation, tree editing and binding.

use crate::anchor::Axis;
use std::fmt;
use thiserror::Error;

/// Why an axis declaration was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCause {
    /// More information than the axis can use (e.g. two anchors plus a size).
    Redundant {
        /// Number of anchors declared on the axis.
        declared: usize,
    },
    /// Not enough information to place the axis.
    Insufficient {
        /// Number of anchors declared on the axis.
        declared: usize,
    },
}

impl fmt::Display for ValidationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redundant { declared } => {
                write!(f, "redundant declaration ({declared} anchors)")
            }
            Self::Insufficient { declared } => {
                write!(f, "insufficient declaration ({declared} anchors)")
            }
        }
    }
}

/// Errors raised by the layout engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// An axis is over- or under-constrained. Raised when an item is built.
    #[error("invalid {axis} anchors: {cause}")]
    Validation {
        /// Offending axis.
        axis: Axis,
        /// Redundancy or insufficiency.
        cause: ValidationCause,
    },
    /// Siblings reference each other in a loop.
    #[error("cyclic anchor dependency in `{scope}` between {members:?}")]
    CyclicDependency {
        /// Path of the parent whose children could not be ordered.
        scope: String,
        /// Keys of the children left in the cycle.
        members: Vec<String>,
    },
    /// A reference names a sibling that is not in the scope.
    #[error("unresolved reference `{reference}` from `{item}` in `{scope}`")]
    UnresolvedReference {
        /// Path of the parent scope.
        scope: String,
        /// Key of the declaring item.
        item: String,
        /// Reference text as declared.
        reference: String,
    },
    /// Reference text is not of the form `target.anchor`.
    #[error("malformed anchor reference `{0}`")]
    MalformedReference(String),
    /// Child keys must be non-empty, trimmed, free of `.` and `/`, and not `parent`.
    #[error("invalid item key `{0}`")]
    InvalidKey(String),
    /// A parent already holds a child with this key.
    #[error("`{parent}` already has a child named `{key}`")]
    DuplicateKey {
        /// Path of the parent.
        parent: String,
        /// Key that was reused.
        key: String,
    },
    /// The handle refers to an item that was detached.
    #[error("item handle no longer refers to a live item")]
    StaleItem,
    /// The root's rectangle is the viewport and cannot be re-declared.
    #[error("the root item's geometry is fixed by the viewport")]
    RootGeometry,
    /// Geometry was requested from an item without a successful bind.
    #[error("item `{0}` has no resolved geometry")]
    Unbound(String),
}

impl LayoutError {
    /// Whether the error comes from resolving a scope during bind.
    pub fn is_bind_error(&self) -> bool {
        matches!(
            self,
            Self::CyclicDependency { .. } | Self::UnresolvedReference { .. } | Self::Unbound(_)
        )
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_axis_and_cause() {
        let err = LayoutError::Validation {
            axis: Axis::Horizontal,
            cause: ValidationCause::Redundant { declared: 2 },
        };
        assert_eq!(
            err.to_string(),
            "invalid horizontal anchors: redundant declaration (2 anchors)"
        );
        assert!(!err.is_bind_error());
    }

    #[test]
    fn bind_errors_are_classified() {
        let err = LayoutError::CyclicDependency {
            scope: "root".into(),
            members: vec!["a".into(), "b".into()],
        };
        assert!(err.is_bind_error());
        assert!(err.to_string().contains("\"a\""));
    }
}
