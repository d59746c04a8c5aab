//! Formloom - statement ordering for generated UI form code
//!
//! This library keeps the source of a UI form class well ordered while it
//! is edited as a model: a catalog describes for every component type
//! where its creation, its configuration calls and its attachment to the
//! parent belong, and the placement engine turns those rules into exact
//! statement positions.
//!
//! # Example
//!
//! ```rust
//! use formloom::{Catalog, FormEditor, FormModel, NewComponent};
//!
//! let catalog = Catalog::default();
//! let mut form = FormModel::new("MyPanel");
//! let root = form.set_root_this("javax.swing.JPanel");
//!
//! let mut editor = FormEditor::new(&mut form, &catalog);
//! editor
//!     .add_component(root, NewComponent::new("javax.swing.JButton"))
//!     .unwrap();
//!
//! assert!(form.render().contains("add(button);"));
//! ```

pub mod catalog;
pub mod error;
pub mod model;
pub mod order;
pub mod place;
pub mod rules;
pub mod source;

pub use catalog::{Catalog, CatalogError};
pub use error::RuleError;
pub use model::FormModel;
pub use order::{ComponentOrder, MethodOrder};
pub use place::{FormEditor, NewComponent, PlaceError};
pub use rules::{parse_component_order, parse_method_order};
pub use source::{SourceArena, StatementTarget};
