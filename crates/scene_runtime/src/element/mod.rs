//! Elements: the base unit of the graph and its typed views

pub mod children;
pub mod container;
pub mod element;
pub mod kind;
pub mod port;

pub use children::ChildCollection;
pub use container::ContainerHandle;
pub use element::ElementHandle;
pub use kind::ElementKind;
pub use port::{connect, disconnect};
