//! # Scene Runtime
//!
//! An in-memory hierarchical object store: named, capability-tagged
//! elements arranged in scenes, addressed by path, composed across scenes
//! by reference, and reached through shared-ownership handles that stay
//! valid across soft deletion.
//!
//! ## Features
//!
//! - **Path addressing**: every element is locatable from its scene's root
//! - **Composition**: a scene references other scenes' content by name,
//!   without copying
//! - **Soft deletion**: disposed subtrees detach but survive for later
//!   restoration
//! - **Pluggable creation**: element construction dispatches through an
//!   explicit creator/definition registry
//! - **Composed traversal**: one iterator walks a scene and its reference
//!   closure in deterministic order
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_runtime::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut session = Session::default();
//!     session.registry_mut().register_creator(
//!         "group",
//!         Arc::new(|_, name, _| Ok(ContainerHandle::new(name).element().clone())),
//!     );
//!
//!     let scene = session.create_scene("main")?;
//!     let geo = scene.create_element(
//!         &ScenePath::root(),
//!         "geo",
//!         "group",
//!         session.registry(),
//!     )?;
//!     assert_eq!(geo.path().to_string(), "/geo");
//!     Ok(())
//! }
//! ```
//!
//! Structural mutation is not internally synchronized; serialize it
//! externally when sharing a scene across threads. Handle copies and drops
//! are always thread-safe.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod element;
pub mod error;
pub mod foundation;
pub mod scene;

pub use error::{ErrorKind, SceneError};

/// Common imports for runtime users.
pub mod prelude {
    pub use crate::config::{Config, ConfigError, SessionConfig};
    pub use crate::element::{
        connect, disconnect, ChildCollection, ContainerHandle, ElementHandle, ElementKind,
    };
    pub use crate::error::{ErrorKind, SceneError};
    pub use crate::foundation::{ScenePath, TypedValue, Value};
    pub use crate::scene::{
        instantiate_definition, ComposedIterator, CreateRegistry, CreatorFn, ElementPredicate,
        Scene, Session,
    };
}
