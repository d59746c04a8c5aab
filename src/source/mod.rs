//! In-memory statement model
//!
//! Placement decisions are made against a snapshot of the source as an
//! arena of methods, blocks and statements. Handles stay stable across
//! edits, so a target computed before an insertion still points at the
//! same statement afterwards.

pub mod arena;
pub mod target;

pub use arena::{
    BlockId, BlockOwner, MethodId, SourceArena, StatementId, StatementKind,
};
pub use target::{StatementTarget, TargetAnchor};
