//! Form editing operations
//!
//! A [`FormEditor`] applies whole edits to a form model: it creates the
//! statements for a new component, inserts invocations at the slot their
//! method order picks, and moves component subtrees between containers.
//! Variables are materialized and promoted on demand so every statement
//! it writes can reference what it needs.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::model::{short_type, ComponentId, Creation, FormModel, Variable};
use crate::source::{BlockId, StatementId, StatementKind, StatementTarget, TargetAnchor};

use super::child;
use super::PlaceError;

/// Description of a component to add: the type, the expression creating
/// it, the call attaching it to its parent and invocations configuring
/// it right away.
#[derive(Debug, Clone)]
pub struct NewComponent {
    type_name: String,
    variable: Option<String>,
    creation_expr: Option<String>,
    association: String,
    association_signature: Option<String>,
    companions: Vec<(String, String)>,
}

impl NewComponent {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            variable: None,
            creation_expr: None,
            association: "add(@)".to_string(),
            association_signature: None,
            companions: Vec::new(),
        }
    }

    /// Variable name to use instead of one derived from the type.
    pub fn with_variable(mut self, name: &str) -> Self {
        self.variable = Some(name.to_string());
        self
    }

    pub fn with_creation(mut self, expr: &str) -> Self {
        self.creation_expr = Some(expr.to_string());
        self
    }

    /// Association call, `@` standing for the child expression.
    pub fn with_association(mut self, call: &str) -> Self {
        self.association = call.to_string();
        self
    }

    /// Signature when the association is itself a described method of
    /// the parent, e.g. `setViewportView(java.awt.Component)`.
    pub fn with_association_signature(mut self, signature: &str) -> Self {
        self.association_signature = Some(signature.to_string());
        self
    }

    /// Invocation added together with the component.
    pub fn with_invocation(mut self, signature: &str, args: &str) -> Self {
        self.companions.push((signature.to_string(), args.to_string()));
        self
    }
}

pub struct FormEditor<'a> {
    model: &'a mut FormModel,
    catalog: &'a Catalog,
}

impl<'a> FormEditor<'a> {
    pub fn new(model: &'a mut FormModel, catalog: &'a Catalog) -> Self {
        Self { model, catalog }
    }

    pub fn model(&self) -> &FormModel {
        self.model
    }

    /// Add a new component under `parent`. The creation statement lands
    /// at the child target, companion invocations at the slots their
    /// orders pick, the association behind the invocations that must
    /// precede it.
    pub fn add_component(
        &mut self,
        parent: ComponentId,
        desc: NewComponent,
    ) -> Result<ComponentId, PlaceError> {
        self.ensure_materialized(parent)?;
        let name = match &desc.variable {
            Some(name) => name.clone(),
            None => self.unique_name(&desc.type_name),
        };
        let creation_expr = desc
            .creation_expr
            .clone()
            .unwrap_or_else(|| format!("new {}()", short_type(&desc.type_name)));
        let child = self.model.add_component(
            &desc.type_name,
            Some(parent),
            Variable::local(&name),
            &creation_expr,
        );
        // the child list mirrors the statement order
        let next = child::next_child(self.model, self.catalog, parent, child);
        if next.is_some() {
            self.model.reparent(child, parent, next);
        }
        let target = child::child_target(self.model, self.catalog, parent, child)?;
        self.model.insert_creation(&target, child);
        for (signature, args) in &desc.companions {
            self.add_invocation(child, signature, args)?;
        }
        let target = child::association_target(self.model, self.catalog, child)?;
        self.model.insert_association(
            &target,
            child,
            &desc.association,
            desc.association_signature.as_deref(),
        );
        Ok(child)
    }

    /// Insert an invocation on the component at the slot its effective
    /// method order picks.
    pub fn add_invocation(
        &mut self,
        component: ComponentId,
        signature: &str,
        args: &str,
    ) -> Result<StatementId, PlaceError> {
        self.ensure_materialized(component)?;
        let type_name = self.model.component(component).type_name.clone();
        let order = self
            .catalog
            .effective_method_order(&type_name, signature)
            .clone();
        let target = order.target_for(self.model, self.catalog, component, signature)?;
        self.ensure_visible(component, &target);
        Ok(self
            .model
            .insert_invocation(&target, component, signature, args))
    }

    /// Move a component, with its whole statement span, into a new
    /// parent container.
    pub fn move_component(
        &mut self,
        component: ComponentId,
        new_parent: ComponentId,
    ) -> Result<(), PlaceError> {
        self.ensure_materialized(new_parent)?;
        let next = child::next_child(self.model, self.catalog, new_parent, component);
        let target = child::child_target(self.model, self.catalog, new_parent, component)?;
        let span = self.component_span(component);
        self.model.arena_mut().move_statements(&span, &target);
        self.model.reparent(component, new_parent, next);
        Ok(())
    }

    /// Give the component a variable and a creation statement it can be
    /// referenced through. Inline creations split into a declaration in
    /// front of the association; virtual creations get a creation
    /// statement at the child target.
    fn ensure_materialized(&mut self, component: ComponentId) -> Result<(), PlaceError> {
        if let Creation::Virtual = self.model.component(component).creation {
            let parent = self
                .model
                .component(component)
                .parent
                .ok_or(PlaceError::NoParent)?;
            let target = child::child_target(self.model, self.catalog, parent, component)?;
            self.model.insert_creation(&target, component);
        }
        if let Variable::Empty = self.model.component(component).variable {
            if let Creation::Inline { statement } = self.model.component(component).creation {
                let target = StatementTarget::before(statement);
                self.model.insert_creation(&target, component);
            }
            if self.model.creation_statement(component).is_none() {
                return Err(PlaceError::NoCreationStatement);
            }
            let type_name = self.model.component(component).type_name.clone();
            let name = self.unique_name(&type_name);
            self.model.set_variable(component, Variable::local(&name));
        }
        Ok(())
    }

    /// A local whose declaring block does not reach the target becomes a
    /// field.
    fn ensure_visible(&mut self, component: ComponentId, target: &StatementTarget) {
        if !matches!(self.model.component(component).variable, Variable::Local { .. }) {
            return;
        }
        if !self.target_visible(component, target) {
            self.model.promote_to_field(component);
        }
    }

    fn target_visible(&self, component: ComponentId, target: &StatementTarget) -> bool {
        let Ok(scope) = child::scope_block(self.model, self.catalog, component) else {
            return false;
        };
        let arena = self.model.arena();
        let block = match target.anchor() {
            TargetAnchor::Statement(statement) => arena.statement(statement).block,
            TargetAnchor::Block(block) => block,
        };
        arena.block_within(block, scope)
    }

    /// Statements carrying the component and its subtree, in flow order.
    /// A block holding nothing else collapses into its block statement
    /// so it moves as one unit.
    fn component_span(&self, component: ComponentId) -> Vec<StatementId> {
        let mut span = Vec::new();
        for method in self.model.arena().methods() {
            let body = self.model.arena().method(method).body;
            let (_, units) = self.block_span(component, body);
            span.extend(units);
        }
        span
    }

    fn block_span(&self, component: ComponentId, block: BlockId) -> (bool, Vec<StatementId>) {
        let arena = self.model.arena();
        let mut fully_related = !arena.block(block).statements.is_empty();
        let mut units = Vec::new();
        for &statement in &arena.block(block).statements {
            match arena.kind(statement) {
                StatementKind::Nested { body, .. } => {
                    let (sub_related, sub_units) = self.block_span(component, *body);
                    if sub_related {
                        units.push(statement);
                    } else {
                        units.extend(sub_units);
                        fully_related = false;
                    }
                }
                _ => {
                    if self.model.is_related_with_children(statement, component) {
                        units.push(statement);
                    } else {
                        fully_related = false;
                    }
                }
            }
        }
        (fully_related, units)
    }

    /// Variable name derived from the type, `button`, `button_1`, ...
    fn unique_name(&self, type_name: &str) -> String {
        let short = short_type(type_name);
        let mut base = String::new();
        let mut chars = short.chars();
        if let Some(first) = chars.next() {
            base.extend(first.to_lowercase());
            base.push_str(chars.as_str());
        }
        let taken: HashSet<&str> = self
            .model
            .components()
            .filter_map(|id| match &self.model.component(id).variable {
                Variable::Local { name }
                | Variable::Field { name }
                | Variable::Lazy { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        if !taken.contains(base.as_str()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken.contains(candidate.as_str()) {
                return candidate;
            }
            n += 1;
        }
    }
}
