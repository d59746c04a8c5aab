//! Statement arena
//!
//! Methods, blocks and statements live in flat vectors and are addressed
//! by copyable ids. Ids stay stable for the lifetime of the arena:
//! editing never removes entries, it only splices the per-block statement
//! lists. Flow order is the depth-first walk of methods in declaration
//! order, which makes "earlier in flow" a lexicographic comparison of
//! index paths.

use crate::model::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementId(pub(crate) usize);

/// What a single statement is, as far as ordering is concerned.
///
/// Statement text that the placement rules never inspect is kept as
/// opaque strings; only component references are structured.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Creates a component instance, e.g. `JButton button = new JButton();`
    Creation { component: ComponentId },
    /// Invokes a method on a component, e.g. `button.setEnabled(false);`
    Invocation {
        component: ComponentId,
        signature: String,
        args: String,
    },
    /// Attaches a child to its parent, e.g. `add(button);`
    ///
    /// `call` holds the invocation text with `@` standing for the child
    /// expression. `signature` is present when the association is itself
    /// a described method of the parent, e.g. `setProperty(@)`.
    Association {
        child: ComponentId,
        signature: Option<String>,
        call: String,
    },
    /// Leading superclass call, e.g. `super(parent, style);`
    SuperCall { text: String },
    /// A nested block statement; `header` is e.g. `if (button == null)`
    /// for guarded blocks, or absent for a bare `{ ... }` block.
    Nested {
        header: Option<String>,
        body: BlockId,
    },
    /// Statement text the ordering rules do not interpret.
    Raw { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOwner {
    Method(MethodId),
    Statement(StatementId),
}

#[derive(Debug)]
pub struct MethodData {
    /// Declaration line without body, e.g. `public Test()`.
    pub decl: String,
    /// Bare method name used for lookups, e.g. `Test`.
    pub name: String,
    pub body: BlockId,
}

#[derive(Debug)]
pub struct BlockData {
    pub owner: BlockOwner,
    pub statements: Vec<StatementId>,
}

#[derive(Debug)]
pub struct StatementData {
    pub block: BlockId,
    pub kind: StatementKind,
}

#[derive(Debug, Default)]
pub struct SourceArena {
    methods: Vec<MethodData>,
    blocks: Vec<BlockData>,
    statements: Vec<StatementData>,
}

impl SourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a method with an empty body. Methods execute in the order
    /// they are added.
    pub fn add_method(&mut self, decl: &str, name: &str) -> MethodId {
        let method = MethodId(self.methods.len());
        let body = BlockId(self.blocks.len());
        self.blocks.push(BlockData {
            owner: BlockOwner::Method(method),
            statements: Vec::new(),
        });
        self.methods.push(MethodData {
            decl: decl.to_string(),
            name: name.to_string(),
            body,
        });
        method
    }

    pub fn method(&self, id: MethodId) -> &MethodData {
        &self.methods[id.0]
    }

    pub fn method_by_name(&self, name: &str) -> Option<MethodId> {
        self.methods
            .iter()
            .position(|m| m.name == name)
            .map(MethodId)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len()).map(MethodId)
    }

    pub fn block(&self, id: BlockId) -> &BlockData {
        &self.blocks[id.0]
    }

    pub fn statement(&self, id: StatementId) -> &StatementData {
        &self.statements[id.0]
    }

    pub fn kind(&self, id: StatementId) -> &StatementKind {
        &self.statements[id.0].kind
    }

    /// Append a statement at the end of a block.
    pub fn append(&mut self, block: BlockId, kind: StatementKind) -> StatementId {
        let id = StatementId(self.statements.len());
        self.statements.push(StatementData { block, kind });
        self.blocks[block.0].statements.push(id);
        id
    }

    /// Append a nested block statement, returning the statement and the
    /// new inner block.
    pub fn append_nested(&mut self, block: BlockId, header: Option<&str>) -> (StatementId, BlockId) {
        let body = BlockId(self.blocks.len());
        let id = StatementId(self.statements.len());
        self.blocks.push(BlockData {
            owner: BlockOwner::Statement(id),
            statements: Vec::new(),
        });
        self.statements.push(StatementData {
            block,
            kind: StatementKind::Nested {
                header: header.map(str::to_string),
                body,
            },
        });
        self.blocks[block.0].statements.push(id);
        (id, body)
    }

    /// Insert a statement at a resolved target position.
    pub fn insert(&mut self, target: &super::StatementTarget, kind: StatementKind) -> StatementId {
        let (block, index) = self.resolve_target(target);
        let id = StatementId(self.statements.len());
        self.statements.push(StatementData { block, kind });
        self.blocks[block.0].statements.insert(index, id);
        id
    }

    /// Resolve a target to a concrete insertion point.
    pub fn resolve_target(&self, target: &super::StatementTarget) -> (BlockId, usize) {
        use super::TargetAnchor;
        match target.anchor() {
            TargetAnchor::Statement(stmt) => {
                let block = self.statements[stmt.0].block;
                let position = self.index_in_block(stmt);
                if target.is_before() {
                    (block, position)
                } else {
                    (block, position + 1)
                }
            }
            TargetAnchor::Block(block) => {
                if target.is_before() {
                    (block, 0)
                } else {
                    (block, self.blocks[block.0].statements.len())
                }
            }
        }
    }

    /// Move statements to a target, keeping their relative order.
    ///
    /// The moved statements must not contain the target anchor.
    pub fn move_statements(&mut self, moved: &[StatementId], target: &super::StatementTarget) {
        let (block, mut index) = self.resolve_target(target);
        // Detach first so the insertion index stays meaningful when the
        // statements move within the same block.
        for &id in moved {
            let old_block = self.statements[id.0].block;
            let position = self.index_in_block(id);
            self.blocks[old_block.0].statements.remove(position);
            if old_block == block && position < index {
                index -= 1;
            }
        }
        for &id in moved {
            self.statements[id.0].block = block;
            self.blocks[block.0].statements.insert(index, id);
            index += 1;
        }
    }

    fn index_in_block(&self, id: StatementId) -> usize {
        let block = self.statements[id.0].block;
        self.blocks[block.0]
            .statements
            .iter()
            .position(|&s| s == id)
            .expect("statement listed in its block")
    }

    /// Depth-first flow path of a statement: method index followed by
    /// statement indices down the block chain. Lexicographic comparison
    /// of two paths is flow order.
    pub fn flow_path(&self, id: StatementId) -> Vec<usize> {
        let mut path = vec![self.index_in_block(id)];
        let mut block = self.statements[id.0].block;
        loop {
            match self.blocks[block.0].owner {
                BlockOwner::Method(method) => {
                    path.push(method.0);
                    break;
                }
                BlockOwner::Statement(owner) => {
                    path.push(self.index_in_block(owner));
                    block = self.statements[owner.0].block;
                }
            }
        }
        path.reverse();
        path
    }

    /// Flow path of a block: the path of its owning statement, or just
    /// the method index for a method body.
    pub fn block_path(&self, id: BlockId) -> Vec<usize> {
        match self.blocks[id.0].owner {
            BlockOwner::Method(method) => vec![method.0],
            BlockOwner::Statement(owner) => self.flow_path(owner),
        }
    }

    /// Flow path of the slot a target resolves to. A statement inserted
    /// at the target would take exactly this path.
    pub fn insertion_path(&self, target: &super::StatementTarget) -> Vec<usize> {
        let (block, index) = self.resolve_target(target);
        let mut path = self.block_path(block);
        path.push(index);
        path
    }

    /// `true` if `a` executes before `b`.
    pub fn precedes(&self, a: StatementId, b: StatementId) -> bool {
        self.flow_path(a) < self.flow_path(b)
    }

    /// `true` if `inner` is `outer` or nested anywhere below it.
    pub fn block_within(&self, inner: BlockId, outer: BlockId) -> bool {
        let mut block = inner;
        loop {
            if block == outer {
                return true;
            }
            match self.blocks[block.0].owner {
                BlockOwner::Method(_) => return false,
                BlockOwner::Statement(owner) => block = self.statements[owner.0].block,
            }
        }
    }

    /// The method a statement ultimately belongs to.
    pub fn method_of(&self, id: StatementId) -> MethodId {
        let mut block = self.statements[id.0].block;
        loop {
            match self.blocks[block.0].owner {
                BlockOwner::Method(method) => return method,
                BlockOwner::Statement(owner) => block = self.statements[owner.0].block,
            }
        }
    }

    /// The nested statement owning a block, if the block is not a method
    /// body.
    pub fn owner_statement(&self, block: BlockId) -> Option<StatementId> {
        match self.blocks[block.0].owner {
            BlockOwner::Method(_) => None,
            BlockOwner::Statement(owner) => Some(owner),
        }
    }

    /// The ancestor of `statement` lying directly in `scope`, or the
    /// statement itself when it already does. `None` if `scope` does not
    /// enclose the statement.
    pub fn lift_into(&self, statement: StatementId, scope: BlockId) -> Option<StatementId> {
        let mut current = statement;
        loop {
            let block = self.statements[current.0].block;
            if block == scope {
                return Some(current);
            }
            current = self.owner_statement(block)?;
        }
    }

    /// All statements of a method in flow order, nested blocks included.
    /// A `Nested` statement appears before its contents.
    pub fn statements_in_flow(&self, method: MethodId) -> Vec<StatementId> {
        let mut out = Vec::new();
        self.collect_flow(self.methods[method.0].body, &mut out);
        out
    }

    fn collect_flow(&self, block: BlockId, out: &mut Vec<StatementId>) {
        for &id in &self.blocks[block.0].statements {
            out.push(id);
            if let StatementKind::Nested { body, .. } = &self.statements[id.0].kind {
                self.collect_flow(*body, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StatementTarget;

    fn raw(text: &str) -> StatementKind {
        StatementKind::Raw {
            text: text.to_string(),
        }
    }

    #[test]
    fn append_keeps_statement_order() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));
        let b = arena.append(body, raw("b();"));
        assert_eq!(arena.block(body).statements, vec![a, b]);
    }

    #[test]
    fn insert_before_and_after_statement() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));
        let b = arena.append(body, raw("b();"));

        let x = arena.insert(&StatementTarget::after(a), raw("x();"));
        let y = arena.insert(&StatementTarget::before(a), raw("y();"));
        assert_eq!(arena.block(body).statements, vec![y, a, x, b]);
    }

    #[test]
    fn insert_at_block_ends() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));

        let first = arena.insert(&StatementTarget::block_begin(body), raw("first();"));
        let last = arena.insert(&StatementTarget::block_end(body), raw("last();"));
        assert_eq!(arena.block(body).statements, vec![first, a, last]);
    }

    #[test]
    fn flow_paths_are_lexicographic() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));
        let (block_stmt, inner) = arena.append_nested(body, None);
        let nested = arena.append(inner, raw("nested();"));
        let b = arena.append(body, raw("b();"));

        assert_eq!(arena.flow_path(a), vec![0, 0]);
        assert_eq!(arena.flow_path(block_stmt), vec![0, 1]);
        assert_eq!(arena.flow_path(nested), vec![0, 1, 0]);
        assert_eq!(arena.flow_path(b), vec![0, 2]);

        assert!(arena.precedes(a, nested));
        assert!(arena.precedes(block_stmt, nested));
        assert!(arena.precedes(nested, b));
    }

    #[test]
    fn flow_order_spans_methods_in_declaration_order() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let helper = arena.add_method("private void init()", "init");
        let in_ctor = arena.append(arena.method(ctor).body, raw("a();"));
        let in_helper = arena.append(arena.method(helper).body, raw("b();"));
        assert!(arena.precedes(in_ctor, in_helper));
    }

    #[test]
    fn statements_in_flow_visits_nested_blocks() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));
        let (block_stmt, inner) = arena.append_nested(body, None);
        let nested = arena.append(inner, raw("nested();"));
        let b = arena.append(body, raw("b();"));

        assert_eq!(
            arena.statements_in_flow(ctor),
            vec![a, block_stmt, nested, b]
        );
    }

    #[test]
    fn lift_into_resolves_the_enclosing_ancestor() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let (block_stmt, inner) = arena.append_nested(body, None);
        let nested = arena.append(inner, raw("nested();"));

        assert_eq!(arena.lift_into(nested, body), Some(block_stmt));
        assert_eq!(arena.lift_into(nested, inner), Some(nested));

        let other = arena.add_method("private void init()", "init");
        assert_eq!(arena.lift_into(nested, arena.method(other).body), None);
    }

    #[test]
    fn move_statements_within_block() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));
        let b = arena.append(body, raw("b();"));
        let c = arena.append(body, raw("c();"));

        arena.move_statements(&[c], &StatementTarget::before(a));
        assert_eq!(arena.block(body).statements, vec![c, a, b]);

        arena.move_statements(&[a, b], &StatementTarget::before(c));
        assert_eq!(arena.block(body).statements, vec![a, b, c]);
    }

    #[test]
    fn move_statements_across_blocks() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let (_, inner) = arena.append_nested(body, None);
        let x = arena.append(inner, raw("x();"));
        let tail = arena.append(body, raw("tail();"));

        arena.move_statements(&[x], &StatementTarget::after(tail));
        assert!(arena.block(inner).statements.is_empty());
        assert_eq!(arena.statement(x).block, body);
        assert_eq!(arena.flow_path(x), vec![0, 2]);
    }

    #[test]
    fn block_within_walks_owner_chain() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let (_, inner) = arena.append_nested(body, None);
        let (_, innermost) = arena.append_nested(inner, None);

        assert!(arena.block_within(innermost, body));
        assert!(arena.block_within(innermost, inner));
        assert!(!arena.block_within(body, inner));
    }

    #[test]
    fn insertion_path_matches_future_statement_path() {
        let mut arena = SourceArena::new();
        let ctor = arena.add_method("public Test()", "Test");
        let body = arena.method(ctor).body;
        let a = arena.append(body, raw("a();"));

        let target = StatementTarget::after(a);
        let path = arena.insertion_path(&target);
        let inserted = arena.insert(&target, raw("x();"));
        assert_eq!(arena.flow_path(inserted), path);
    }
}
