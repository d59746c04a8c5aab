//! Placement policies
//!
//! Two closed policy families drive every edit: [`ComponentOrder`]
//! decides where a component's statements go relative to its siblings,
//! [`MethodOrder`] decides where an invocation goes relative to the
//! other statements of the same component.

pub mod component;
pub mod method;

pub use component::ComponentOrder;
pub use method::{ChildFilter, MethodOrder};
