//! Leaf utilities: paths and typed attribute values

pub mod path;
pub mod value;

pub use path::{ScenePath, ROOT_NAME};
pub use value::{TypedValue, Value};
