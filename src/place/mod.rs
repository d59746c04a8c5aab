//! Placement engine
//!
//! [`child`] computes statement targets for components joining or moving
//! inside a container; [`editor`] applies whole edits to a form:
//! adding components, adding invocations, moving subtrees.

pub mod child;
pub mod editor;

pub use editor::{FormEditor, NewComponent};

use thiserror::Error;

/// A placement could not be computed because the model is missing a
/// piece the rules need.
#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Component has no creation statement")]
    NoCreationStatement,
    #[error("Component has no variable; it must be materialized first")]
    NotMaterialized,
    #[error("Component has no parent container")]
    NoParent,
    #[error("Method '{0}' not found in the form")]
    MissingMethod(String),
}
