//! Placement targets

use super::{BlockId, StatementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetAnchor {
    Statement(StatementId),
    Block(BlockId),
}

/// Where a new statement goes: before or after an anchor statement, or
/// at the beginning or end of an anchor block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTarget {
    anchor: TargetAnchor,
    before: bool,
}

impl StatementTarget {
    pub fn before(statement: StatementId) -> Self {
        Self {
            anchor: TargetAnchor::Statement(statement),
            before: true,
        }
    }

    pub fn after(statement: StatementId) -> Self {
        Self {
            anchor: TargetAnchor::Statement(statement),
            before: false,
        }
    }

    pub fn block_begin(block: BlockId) -> Self {
        Self {
            anchor: TargetAnchor::Block(block),
            before: true,
        }
    }

    pub fn block_end(block: BlockId) -> Self {
        Self {
            anchor: TargetAnchor::Block(block),
            before: false,
        }
    }

    pub fn anchor(&self) -> TargetAnchor {
        self.anchor
    }

    pub fn is_before(&self) -> bool {
        self.before
    }

    /// The anchor statement, if the target anchors on one.
    pub fn statement(&self) -> Option<StatementId> {
        match self.anchor {
            TargetAnchor::Statement(statement) => Some(statement),
            TargetAnchor::Block(_) => None,
        }
    }
}
