//! Runtime errors
//!
//! Every failing operation in the crate reports a [`SceneError`]. Variants
//! carry enough context to be actionable on their own; callers that only
//! care about the failure class can branch on [`SceneError::kind`] instead
//! of matching every variant.

use crate::element::ElementKind;
use thiserror::Error;

/// Abstract failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path, name or lookup failed to resolve.
    NotFound,
    /// A cast or attribute access hit an incompatible type.
    TypeMismatch,
    /// An operation was applied to an object in the wrong lifecycle state.
    State,
    /// An operation would violate composition or uniqueness rules.
    Conflict,
    /// No way to carry out the request exists.
    NotSupported,
}

/// Scene runtime errors.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Path resolution failed.
    #[error("path '{path}' does not point to an element in this scene")]
    PathNotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// A mutating attribute accessor addressed a missing attribute.
    #[error("element '{element}' has no attribute named '{name}'")]
    AttributeNotFound {
        /// Owning element name.
        element: String,
        /// Requested attribute name.
        name: String,
    },

    /// Checked cast to a capability the element does not carry.
    #[error("element '{name}' is not compatible with {expected:?}")]
    IncompatibleCast {
        /// Element name.
        name: String,
        /// Capability the cast required.
        expected: ElementKind,
    },

    /// An attribute exists (or was written) with a different type.
    #[error("attribute '{name}' has type '{existing}', not '{requested}'")]
    AttributeTypeMismatch {
        /// Attribute name.
        name: String,
        /// Type currently stored.
        existing: String,
        /// Type the caller asked for.
        requested: String,
    },

    /// Port capabilities do not line up for a connection.
    #[error("cannot connect '{output}' to '{input}': a connection pairs an output with an input")]
    InvalidConnection {
        /// Name of the upstream element.
        output: String,
        /// Name of the downstream element.
        input: String,
    },

    /// Access through a handle whose referent has been disposed.
    #[error("cannot access disposed element '{name}'")]
    Disposed {
        /// Element name.
        name: String,
    },

    /// Restoration of an element that is still alive.
    #[error("element '{name}' is already alive")]
    NotDisposed {
        /// Element name.
        name: String,
    },

    /// Removal, disposal or restructuring aimed at a scene root.
    #[error("the scene root cannot be removed or restructured")]
    RootImmutable,

    /// Disposal blocked by a live connection inside the subtree.
    #[error("port '{port}' is connected; disconnect it before disposing")]
    ConnectedPort {
        /// First connected port found.
        port: String,
    },

    /// An input port already has an upstream connection.
    #[error("input '{port}' is already connected")]
    AlreadyConnected {
        /// Input port name.
        port: String,
    },

    /// The same scene object is already referenced.
    #[error("scene '{name}' is already referenced")]
    DuplicateReference {
        /// Referenced scene name.
        name: String,
    },

    /// A scene referencing itself.
    #[error("scene '{name}' cannot reference itself")]
    SelfReference {
        /// Scene name.
        name: String,
    },

    /// A scene name is already taken in the session.
    #[error("a scene named '{name}' already exists")]
    DuplicateScene {
        /// Requested scene name.
        name: String,
    },

    /// Session lookup for an unknown scene.
    #[error("no scene named '{name}'")]
    SceneNotFound {
        /// Requested scene name.
        name: String,
    },

    /// The creation chain found no way to build the requested type.
    #[error("don't know how to create an element of type '{type_name}'")]
    UnknownElementType {
        /// Requested type name.
        type_name: String,
    },

    /// Attribute creation with a type name the value system does not know.
    #[error("unknown value type '{type_name}'")]
    UnknownValueType {
        /// Requested value type name.
        type_name: String,
    },
}

impl SceneError {
    /// The abstract failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathNotFound { .. }
            | Self::AttributeNotFound { .. }
            | Self::SceneNotFound { .. } => ErrorKind::NotFound,
            Self::IncompatibleCast { .. }
            | Self::AttributeTypeMismatch { .. }
            | Self::InvalidConnection { .. } => ErrorKind::TypeMismatch,
            Self::Disposed { .. } | Self::NotDisposed { .. } | Self::RootImmutable => {
                ErrorKind::State
            }
            Self::ConnectedPort { .. }
            | Self::AlreadyConnected { .. }
            | Self::DuplicateReference { .. }
            | Self::SelfReference { .. }
            | Self::DuplicateScene { .. } => ErrorKind::Conflict,
            Self::UnknownElementType { .. } | Self::UnknownValueType { .. } => {
                ErrorKind::NotSupported
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_five_classes() {
        let not_found = SceneError::PathNotFound {
            path: "/a".to_string(),
        };
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let mismatch = SceneError::IncompatibleCast {
            name: "a".to_string(),
            expected: ElementKind::CONTAINER,
        };
        assert_eq!(mismatch.kind(), ErrorKind::TypeMismatch);

        assert_eq!(SceneError::RootImmutable.kind(), ErrorKind::State);

        let conflict = SceneError::DuplicateReference {
            name: "lib".to_string(),
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);

        let unsupported = SceneError::UnknownElementType {
            type_name: "warp".to_string(),
        };
        assert_eq!(unsupported.kind(), ErrorKind::NotSupported);
    }
}
