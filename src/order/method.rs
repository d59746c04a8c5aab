//! Method placement policy
//!
//! Every order resolves a target through the same front door,
//! [`MethodOrder::target_for`]: first the inversion scan (an existing
//! invocation ordered `after` the new signature pulls the new statement
//! in front of itself), then the redirect for `this`-bound components
//! whose method record names a target method, then the variant-specific
//! position.

use crate::catalog::Catalog;
use crate::model::{ComponentId, Creation, FormModel, Variable};
use crate::place::{self, PlaceError};
use crate::source::{StatementId, StatementKind, StatementTarget};

/// Which child types an `afterChildren`/`afterParentChildren` order waits
/// for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildFilter {
    /// Every child counts.
    Any,
    /// Children whose type is one of these, subtypes included.
    Types(Vec<String>),
}

impl ChildFilter {
    pub fn matches(&self, catalog: &Catalog, type_name: &str) -> bool {
        match self {
            ChildFilter::Any => true,
            ChildFilter::Types(types) => types.iter().any(|t| catalog.is_subtype(type_name, t)),
        }
    }
}

/// Where invocations of a method go relative to the other statements of
/// the same component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOrder {
    /// No order of its own; the component's default method order is used.
    Default,
    /// Directly at the component's variable position, in front of every
    /// other invocation.
    First,
    /// At the very end of the component's statements. Nothing may anchor
    /// after such an invocation.
    Last,
    /// Directly after the creation, behind any `first` invocations.
    AfterCreation,
    /// After the last invocation of the given signature; where that
    /// signature itself would go when it is absent.
    After { signature: String },
    /// After the statements of the component's own matching children.
    AfterChildren { children: ChildFilter },
    /// After the statements of the parent's matching children.
    AfterParentChildren { children: ChildFilter },
    /// Directly before the association statement.
    BeforeAssociation,
    /// Directly after the association statement.
    AfterAssociation,
}

impl MethodOrder {
    /// `false` if statements placed by this order close the component's
    /// statement sequence: later statements may not anchor behind them.
    pub fn can_reference(&self) -> bool {
        !matches!(self, MethodOrder::Last)
    }

    /// Target for a new invocation of `signature` on `component`.
    pub fn target_for(
        &self,
        model: &FormModel,
        catalog: &Catalog,
        component: ComponentId,
        signature: &str,
    ) -> Result<StatementTarget, PlaceError> {
        if let Some(target) = inversion_target(model, catalog, component, signature) {
            return Ok(target);
        }
        // Some signatures on a this-bound form belong in a designated
        // method rather than wherever their order would put them.
        if matches!(model.component(component).variable, Variable::This) {
            let type_name = &model.component(component).type_name;
            if let Some(name) = catalog.method_this_target(type_name, signature) {
                return place::child::method_begin_target(model, name);
            }
        }
        self.specific_target(model, catalog, component, signature)
    }

    fn specific_target(
        &self,
        model: &FormModel,
        catalog: &Catalog,
        component: ComponentId,
        signature: &str,
    ) -> Result<StatementTarget, PlaceError> {
        match self {
            MethodOrder::Default => {
                let type_name = &model.component(component).type_name;
                catalog
                    .default_method_order(type_name)
                    .specific_target(model, catalog, component, signature)
            }
            MethodOrder::First => place::child::variable_target(model, catalog, component),
            MethodOrder::AfterCreation => {
                match last_invocation_matching(model, component, |sig| {
                    matches!(
                        effective_order(model, catalog, component, sig),
                        MethodOrder::First
                    )
                }) {
                    Some(stmt) => Ok(StatementTarget::after(stmt)),
                    None => place::child::variable_target(model, catalog, component),
                }
            }
            MethodOrder::After { signature: target } => {
                match last_invocation_matching(model, component, |sig| sig == target) {
                    Some(stmt) => Ok(StatementTarget::after(stmt)),
                    None => {
                        // The anchor signature is absent: place the new
                        // invocation wherever the anchor itself would go.
                        effective_order(model, catalog, component, target)
                            .clone()
                            .target_for(model, catalog, component, target)
                    }
                }
            }
            MethodOrder::Last => {
                // A wrapper's own span ends where the wrapped object's
                // statements do; its closing calls trail the parent.
                let data = model.component(component);
                if catalog.is_wrapper(&data.type_name) {
                    if let Some(parent) = data.parent {
                        return place::child::trailing_target(model, catalog, parent);
                    }
                }
                place::child::trailing_target(model, catalog, component)
            }
            MethodOrder::AfterChildren { children } => {
                let scope = place::child::scope_block(model, catalog, component)?;
                let end = last_child_span_end(
                    model,
                    catalog,
                    model.children_of(component),
                    children,
                    scope,
                );
                match end {
                    Some(stmt) => Ok(StatementTarget::after(stmt)),
                    None => place::child::variable_target(model, catalog, component),
                }
            }
            MethodOrder::AfterParentChildren { children } => {
                if let Some(parent) = model.component(component).parent {
                    let scope = place::child::scope_block(model, catalog, parent)?;
                    let end = last_child_span_end(
                        model,
                        catalog,
                        model.children_of(parent),
                        children,
                        scope,
                    );
                    if let Some(stmt) = end {
                        let target = StatementTarget::after(stmt);
                        // Usable only once the component exists there.
                        if let Some(creation) = model.creation_statement(component) {
                            if model.arena().insertion_path(&target)
                                > model.arena().flow_path(creation)
                            {
                                return Ok(target);
                            }
                        }
                    }
                }
                place::child::trailing_target(model, catalog, component)
            }
            MethodOrder::BeforeAssociation | MethodOrder::AfterAssociation => {
                let before = matches!(self, MethodOrder::BeforeAssociation);
                // Lazy components are configured inside their accessor;
                // the attachment site in the caller is not an anchor.
                if !matches!(model.component(component).variable, Variable::Lazy { .. }) {
                    let mut current = component;
                    loop {
                        if let Some(stmt) = model.association_statement(current) {
                            return Ok(if before {
                                StatementTarget::before(stmt)
                            } else {
                                StatementTarget::after(stmt)
                            });
                        }
                        // Walk up through parents that exist only as side
                        // effects and have no attachment of their own.
                        match (
                            &model.component(current).creation,
                            model.component(current).parent,
                        ) {
                            (Creation::Implicit, Some(parent)) => current = parent,
                            _ => break,
                        }
                    }
                }
                place::child::variable_target(model, catalog, component)
            }
        }
    }
}

/// Effective order of one of the component's invocations.
fn effective_order<'a>(
    model: &FormModel,
    catalog: &'a Catalog,
    component: ComponentId,
    signature: &str,
) -> &'a MethodOrder {
    catalog.effective_method_order(&model.component(component).type_name, signature)
}

/// An existing invocation ordered `after` the new signature: the new
/// statement must slot in front of the earliest one.
fn inversion_target(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
    signature: &str,
) -> Option<StatementTarget> {
    for stmt in model.invocations_of(component) {
        if let StatementKind::Invocation { signature: sig, .. } = model.arena().kind(stmt) {
            if let MethodOrder::After { signature: anchor } =
                effective_order(model, catalog, component, sig)
            {
                if anchor == signature {
                    return Some(StatementTarget::before(stmt));
                }
            }
        }
    }
    None
}

/// Flow-last invocation on the component whose signature satisfies the
/// predicate.
fn last_invocation_matching(
    model: &FormModel,
    component: ComponentId,
    mut matches: impl FnMut(&str) -> bool,
) -> Option<StatementId> {
    let mut last = None;
    for stmt in model.invocations_of(component) {
        if let StatementKind::Invocation { signature, .. } = model.arena().kind(stmt) {
            if matches(signature) {
                last = Some(stmt);
            }
        }
    }
    last
}

/// Flow-last end of the statement spans of filter-matching children,
/// hoisted to the container's scope block.
fn last_child_span_end(
    model: &FormModel,
    catalog: &Catalog,
    children: &[ComponentId],
    filter: &ChildFilter,
    scope: crate::source::BlockId,
) -> Option<StatementId> {
    let mut last: Option<StatementId> = None;
    for &child in children {
        if !filter.matches(catalog, &model.component(child).type_name) {
            continue;
        }
        let Some(end) = place::child::child_span_end(model, child, scope) else {
            continue;
        };
        let later = match last {
            Some(current) => model.arena().precedes(current, end),
            None => true,
        };
        if later {
            last = Some(end);
        }
    }
    last
}
