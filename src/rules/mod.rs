//! Order-rule text parsing
//!
//! Catalog records declare placement policies as short rule strings.
//! This module turns those strings into [`ComponentOrder`](crate::order::ComponentOrder)
//! and [`MethodOrder`](crate::order::MethodOrder) values, failing fast on
//! malformed text.

mod grammar;
pub mod lexer;

pub use grammar::{parse_component_order, parse_method_order};
