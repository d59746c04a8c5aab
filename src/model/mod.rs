//! Form model
//!
//! A [`FormModel`] ties the component tree to the statement arena: every
//! component knows how it is created, how it is named and which statement
//! attaches it to its parent. The placement engine works purely against
//! this model; rendering turns it back into source text.

pub mod component;
mod render;

pub use component::{short_type, Association, ComponentData, ComponentId, Creation, Variable};

use crate::source::{BlockId, MethodId, SourceArena, StatementId, StatementKind, StatementTarget};

#[derive(Debug)]
pub struct FormModel {
    class_name: String,
    arena: SourceArena,
    components: Vec<ComponentData>,
    root: Option<ComponentId>,
    constructor: Option<MethodId>,
}

impl FormModel {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            arena: SourceArena::new(),
            components: Vec::new(),
            root: None,
            constructor: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn arena(&self) -> &SourceArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SourceArena {
        &mut self.arena
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    pub fn set_root(&mut self, id: ComponentId) {
        self.root = Some(id);
    }

    /// The form constructor, when the root is a `this` component.
    pub fn constructor(&self) -> Option<MethodId> {
        self.constructor
    }

    /// Make the form itself the root component and create its
    /// constructor method.
    pub fn set_root_this(&mut self, type_name: &str) -> ComponentId {
        let decl = format!("public {}()", self.class_name);
        let name = self.class_name.clone();
        let ctor = self.arena.add_method(&decl, &name);
        self.constructor = Some(ctor);
        let id = self.push(ComponentData {
            type_name: type_name.to_string(),
            parent: None,
            children: Vec::new(),
            creation: Creation::Root,
            variable: Variable::This,
            association: Association::None,
            creation_expr: String::new(),
        });
        self.root = Some(id);
        id
    }

    /// Add a component record. It starts without statements; creation
    /// stays [`Creation::Virtual`] until a creation statement appears.
    pub fn add_component(
        &mut self,
        type_name: &str,
        parent: Option<ComponentId>,
        variable: Variable,
        creation_expr: &str,
    ) -> ComponentId {
        let id = self.push(ComponentData {
            type_name: type_name.to_string(),
            parent,
            children: Vec::new(),
            creation: Creation::Virtual,
            variable,
            association: Association::None,
            creation_expr: creation_expr.to_string(),
        });
        if let Some(parent) = parent {
            self.components[parent.0].children.push(id);
        }
        id
    }

    fn push(&mut self, data: ComponentData) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components.push(data);
        id
    }

    pub fn component(&self, id: ComponentId) -> &ComponentData {
        &self.components[id.0]
    }

    pub fn components(&self) -> impl Iterator<Item = ComponentId> + '_ {
        (0..self.components.len()).map(ComponentId)
    }

    pub fn children_of(&self, id: ComponentId) -> &[ComponentId] {
        &self.components[id.0].children
    }

    /// The component and its ancestors, nearest first.
    pub fn self_and_ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.components[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    // ------------------------------------------------------------------
    // Statement builders
    // ------------------------------------------------------------------

    /// Append a creation statement and record it on the component.
    pub fn append_creation(&mut self, block: BlockId, component: ComponentId) -> StatementId {
        let stmt = self.arena.append(block, StatementKind::Creation { component });
        self.components[component.0].creation = Creation::Explicit { statement: stmt };
        stmt
    }

    /// Insert a creation statement at a target and record it.
    pub fn insert_creation(
        &mut self,
        target: &StatementTarget,
        component: ComponentId,
    ) -> StatementId {
        let stmt = self.arena.insert(target, StatementKind::Creation { component });
        self.components[component.0].creation = Creation::Explicit { statement: stmt };
        stmt
    }

    pub fn append_invocation(
        &mut self,
        block: BlockId,
        component: ComponentId,
        signature: &str,
        args: &str,
    ) -> StatementId {
        self.arena.append(
            block,
            StatementKind::Invocation {
                component,
                signature: signature.to_string(),
                args: args.to_string(),
            },
        )
    }

    pub fn insert_invocation(
        &mut self,
        target: &StatementTarget,
        component: ComponentId,
        signature: &str,
        args: &str,
    ) -> StatementId {
        self.arena.insert(
            target,
            StatementKind::Invocation {
                component,
                signature: signature.to_string(),
                args: args.to_string(),
            },
        )
    }

    /// Append an association statement; `call` uses `@` for the child
    /// expression, e.g. `add(@)`.
    pub fn append_association(
        &mut self,
        block: BlockId,
        child: ComponentId,
        call: &str,
        signature: Option<&str>,
    ) -> StatementId {
        let stmt = self.arena.append(
            block,
            StatementKind::Association {
                child,
                signature: signature.map(str::to_string),
                call: call.to_string(),
            },
        );
        self.components[child.0].association = Association::Statement(stmt);
        stmt
    }

    pub fn insert_association(
        &mut self,
        target: &StatementTarget,
        child: ComponentId,
        call: &str,
        signature: Option<&str>,
    ) -> StatementId {
        let stmt = self.arena.insert(
            target,
            StatementKind::Association {
                child,
                signature: signature.map(str::to_string),
                call: call.to_string(),
            },
        );
        self.components[child.0].association = Association::Statement(stmt);
        stmt
    }

    /// Append an association whose argument carries the creation itself,
    /// e.g. `add(new JButton());`. The child has no variable.
    pub fn append_inline_association(
        &mut self,
        block: BlockId,
        child: ComponentId,
        call: &str,
        signature: Option<&str>,
    ) -> StatementId {
        let stmt = self.append_association(block, child, call, signature);
        self.components[child.0].creation = Creation::Inline { statement: stmt };
        stmt
    }

    pub fn append_super(&mut self, block: BlockId, text: &str) -> StatementId {
        self.arena.append(
            block,
            StatementKind::SuperCall {
                text: text.to_string(),
            },
        )
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    pub fn set_creation(&mut self, id: ComponentId, creation: Creation) {
        self.components[id.0].creation = creation;
    }

    pub fn set_variable(&mut self, id: ComponentId, variable: Variable) {
        self.components[id.0].variable = variable;
    }

    pub fn set_association(&mut self, id: ComponentId, association: Association) {
        self.components[id.0].association = association;
    }

    /// Turn a local variable into a field, keeping the name. The creation
    /// statement renders as a bare assignment afterwards.
    pub fn promote_to_field(&mut self, id: ComponentId) {
        if let Variable::Local { name } = &self.components[id.0].variable {
            let name = name.clone();
            self.components[id.0].variable = Variable::Field { name };
        }
    }

    /// Move a component under a new parent, in front of `before` in the
    /// child list, or at the end.
    pub fn reparent(
        &mut self,
        child: ComponentId,
        new_parent: ComponentId,
        before: Option<ComponentId>,
    ) {
        if let Some(old_parent) = self.components[child.0].parent {
            self.components[old_parent.0].children.retain(|&c| c != child);
        }
        let children = &mut self.components[new_parent.0].children;
        let index = before
            .and_then(|b| children.iter().position(|&c| c == b))
            .unwrap_or(children.len());
        children.insert(index, child);
        self.components[child.0].parent = Some(new_parent);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn creation_statement(&self, id: ComponentId) -> Option<StatementId> {
        match self.components[id.0].creation {
            Creation::Explicit { statement } | Creation::Inline { statement } => Some(statement),
            Creation::Implicit | Creation::Root | Creation::Virtual => None,
        }
    }

    /// The statement carrying the association, the creation statement for
    /// constructor associations.
    pub fn association_statement(&self, id: ComponentId) -> Option<StatementId> {
        match self.components[id.0].association {
            Association::Statement(statement) => Some(statement),
            Association::Constructor => self.creation_statement(id),
            Association::None => None,
        }
    }

    /// `true` if the statement mentions the component itself: its
    /// creation, an invocation on it, or its attachment to either side of
    /// an association.
    pub fn is_directly_related(&self, stmt: StatementId, component: ComponentId) -> bool {
        match self.arena.kind(stmt) {
            StatementKind::Creation { component: c } => *c == component,
            StatementKind::Invocation { component: c, .. } => *c == component,
            StatementKind::Association { child, .. } => {
                *child == component || self.components[child.0].parent == Some(component)
            }
            StatementKind::SuperCall { .. }
            | StatementKind::Nested { .. }
            | StatementKind::Raw { .. } => false,
        }
    }

    /// `true` if the statement mentions the component or anything in its
    /// subtree.
    pub fn is_related_with_children(&self, stmt: StatementId, component: ComponentId) -> bool {
        if self.is_directly_related(stmt, component) {
            return true;
        }
        self.components[component.0]
            .children
            .iter()
            .any(|&child| self.is_related_with_children(stmt, child))
    }

    /// All invocation statements on the component, in flow order.
    pub fn invocations_of(&self, component: ComponentId) -> Vec<StatementId> {
        let mut out = Vec::new();
        for method in self.arena.methods() {
            for stmt in self.arena.statements_in_flow(method) {
                if let StatementKind::Invocation { component: c, .. } = self.arena.kind(stmt) {
                    if *c == component {
                        out.push(stmt);
                    }
                }
            }
        }
        out
    }

    /// The component a statement invokes a described method on, with the
    /// signature. Associations that are themselves described parent
    /// methods count as invocations on the parent.
    pub fn invocation_on(&self, stmt: StatementId) -> Option<(ComponentId, &str)> {
        match self.arena.kind(stmt) {
            StatementKind::Invocation {
                component,
                signature,
                ..
            } => Some((*component, signature.as_str())),
            StatementKind::Association {
                child,
                signature: Some(signature),
                ..
            } => self.components[child.0]
                .parent
                .map(|parent| (parent, signature.as_str())),
            _ => None,
        }
    }
}
