//! Child target calculation
//!
//! Computes where the statements of a component belong inside a
//! container. The resolution runs in stages: first the sibling the
//! component must precede, then a forced method for this-bound
//! containers, then a flow scan over the container's related statements
//! that honors reference rules and variable visibility, and finally the
//! container's own variable target.

use crate::catalog::Catalog;
use crate::model::{ComponentId, Creation, FormModel, Variable};
use crate::order::MethodOrder;
use crate::source::{BlockId, StatementId, StatementKind, StatementTarget};

use super::PlaceError;

/// Target directly behind the statement that makes the component's
/// variable usable: the declaration for locals, the assignment for
/// fields, the guarded creation for lazy accessors, the start of the
/// receiving method for `this`.
pub fn variable_target(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
) -> Result<StatementTarget, PlaceError> {
    match &model.component(component).variable {
        Variable::This => this_method_begin(model, catalog, component),
        Variable::Local { .. } | Variable::Field { .. } | Variable::Lazy { .. } => model
            .creation_statement(component)
            .map(StatementTarget::after)
            .ok_or(PlaceError::NoCreationStatement),
        Variable::Exposed { .. } => {
            let parent = parent_of(model, component)?;
            variable_target(model, catalog, parent)
        }
        Variable::Empty => Err(PlaceError::NotMaterialized),
    }
}

/// Block whose span bounds statements referencing the component: the
/// declaring block for locals, the creating method body for fields, the
/// guard block for lazy accessors.
pub fn scope_block(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
) -> Result<BlockId, PlaceError> {
    match &model.component(component).variable {
        Variable::This => this_scope_body(model, catalog, component),
        Variable::Local { .. } | Variable::Lazy { .. } => {
            let creation = model
                .creation_statement(component)
                .ok_or(PlaceError::NoCreationStatement)?;
            Ok(model.arena().statement(creation).block)
        }
        Variable::Field { .. } => {
            let creation = model
                .creation_statement(component)
                .ok_or(PlaceError::NoCreationStatement)?;
            let method = model.arena().method_of(creation);
            Ok(model.arena().method(method).body)
        }
        Variable::Exposed { .. } => {
            let parent = parent_of(model, component)?;
            scope_block(model, catalog, parent)
        }
        Variable::Empty => Err(PlaceError::NotMaterialized),
    }
}

/// Target for a component being added to or moved into `container`.
pub fn child_target(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    child: ComponentId,
) -> Result<StatementTarget, PlaceError> {
    calculate(model, catalog, container, Some(child))
}

/// Target closing the container's statement sequence: after the last
/// related statement that may still be referenced.
pub fn trailing_target(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
) -> Result<StatementTarget, PlaceError> {
    calculate(model, catalog, container, None)
}

/// Sibling that must stay behind the child, per the child's component
/// order rule.
pub fn next_child(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    child: ComponentId,
) -> Option<ComponentId> {
    let order = catalog.component_order(&model.component(child).type_name);
    order.next_component(model, catalog, child, container)
}

/// Flow-last statement related to `child`, lifted to a direct statement
/// of `scope`. `None` when the child has no related statement inside
/// that block.
pub fn child_span_end(
    model: &FormModel,
    child: ComponentId,
    scope: BlockId,
) -> Option<StatementId> {
    let arena = model.arena();
    let mut last: Option<StatementId> = None;
    for method in arena.methods() {
        for statement in arena.statements_in_flow(method) {
            if !model.is_related_with_children(statement, child) {
                continue;
            }
            let Some(lifted) = arena.lift_into(statement, scope) else {
                continue;
            };
            match last {
                Some(current) if !arena.precedes(current, lifted) => {}
                _ => last = Some(lifted),
            }
        }
    }
    last
}

/// Target behind the flow-last invocation whose effective order asks to
/// run before the association, falling back to the variable target.
/// This is where an association statement itself belongs.
pub fn association_target(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
) -> Result<StatementTarget, PlaceError> {
    let type_name = model.component(component).type_name.clone();
    let mut last = None;
    for statement in model.invocations_of(component) {
        if let StatementKind::Invocation { signature, .. } = model.arena().kind(statement) {
            let order = catalog.effective_method_order(&type_name, signature);
            if matches!(order, MethodOrder::BeforeAssociation) {
                last = Some(statement);
            }
        }
    }
    match last {
        Some(statement) => Ok(StatementTarget::after(statement)),
        None => variable_target(model, catalog, component),
    }
}

fn calculate(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    child: Option<ComponentId>,
) -> Result<StatementTarget, PlaceError> {
    if let Some(child) = child {
        if let Some(next) = next_child(model, catalog, container, child) {
            if let Some(target) = before_sibling_target(model, next) {
                return Ok(target);
            }
        }
    }
    if let Some(target) = forced_this_target(model, catalog, container)? {
        return Ok(target);
    }
    if let Some(statement) = last_target_statement(model, catalog, container, child) {
        let statement = track_down(model, catalog, container, statement);
        return Ok(StatementTarget::after(statement));
    }
    variable_target(model, catalog, container)
}

/// Target in front of a sibling's statement span. Walks backwards over
/// the statements related to the sibling, hoisting out of blocks that
/// open with them.
fn before_sibling_target(model: &FormModel, next: ComponentId) -> Option<StatementTarget> {
    if let Variable::Lazy { .. } = model.component(next).variable {
        // the accessor body belongs to the sibling; the attachment call
        // in the caller marks its place in the flow
        let association = model.association_statement(next)?;
        return Some(StatementTarget::before(association));
    }
    let start = model
        .association_statement(next)
        .or_else(|| model.creation_statement(next))?;
    Some(StatementTarget::before(track_related_up(model, next, start)))
}

fn track_related_up(model: &FormModel, next: ComponentId, start: StatementId) -> StatementId {
    let arena = model.arena();
    let mut target = start;
    loop {
        let block = arena.statement(target).block;
        let statements = &arena.block(block).statements;
        let mut index = statements
            .iter()
            .position(|&s| s == target)
            .expect("statement listed in its block");
        while index > 0 && model.is_related_with_children(statements[index - 1], next) {
            index -= 1;
        }
        target = statements[index];
        if index == 0 {
            // the whole block opens with the sibling's span; step out
            if let Some(owner) = arena.owner_statement(block) {
                target = owner;
                continue;
            }
        }
        return target;
    }
}

/// For a this-bound container with a designated target method, children
/// always append at the end of that method.
fn forced_this_target(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
) -> Result<Option<StatementTarget>, PlaceError> {
    let data = model.component(container);
    if !matches!(data.variable, Variable::This) {
        return Ok(None);
    }
    let Some(name) = catalog.this_target_method(&data.type_name) else {
        return Ok(None);
    };
    let method = model
        .arena()
        .method_by_name(name)
        .ok_or_else(|| PlaceError::MissingMethod(name.to_string()))?;
    let body = model.arena().method(method).body;
    Ok(Some(StatementTarget::block_end(body)))
}

/// Flow scan for the last related statement a new child may follow.
fn last_target_statement(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    child: Option<ComponentId>,
) -> Option<StatementId> {
    let arena = model.arena();
    let ancestors = model.self_and_ancestors(container);
    let mut last: Option<StatementId> = None;
    let mut any_interesting = false;
    for method in arena.methods() {
        let saved = last;
        let mut interesting = false;
        let mut terminal = false;
        for statement in arena.statements_in_flow(method) {
            if is_terminal(model, catalog, container, child, statement) {
                terminal = true;
                break;
            }
            if marks_interest(model, container, statement) {
                any_interesting = true;
                interesting = true;
            }
            if is_target_statement(model, catalog, container, statement, &ancestors) {
                last = Some(statement);
            }
        }
        // once the container's statements were seen somewhere, methods
        // that only mention children in passing do not move the target
        if any_interesting && !interesting {
            last = saved;
        }
        if terminal {
            // a closing invocation stops the whole scan
            break;
        }
    }
    last
}

/// A method is interesting when it holds the container's creation or an
/// association of one of its children. For `this` containers every
/// constructor statement counts as creation.
fn marks_interest(model: &FormModel, container: ComponentId, statement: StatementId) -> bool {
    if matches!(model.component(container).variable, Variable::This) {
        if model.constructor() == Some(model.arena().method_of(statement)) {
            return true;
        }
    }
    if model.creation_statement(container) == Some(statement) {
        return true;
    }
    is_child_association(model, container, statement)
}

fn is_child_association(
    model: &FormModel,
    container: ComponentId,
    statement: StatementId,
) -> bool {
    match model.arena().kind(statement) {
        StatementKind::Association { child, .. } => {
            model.component(*child).parent == Some(container)
                && !matches!(model.component(*child).creation, Creation::Implicit)
        }
        _ => false,
    }
}

fn is_target_statement(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    statement: StatementId,
    ancestors: &[ComponentId],
) -> bool {
    // invocations that refuse later references close the sequence
    if let Some((on, signature)) = model.invocation_on(statement) {
        if ancestors.contains(&on) {
            let order = catalog.effective_method_order(&model.component(on).type_name, signature);
            if !order.can_reference() {
                return false;
            }
        }
    }
    model.is_related_with_children(statement, container)
        && statement_valid_for(model, catalog, container, statement)
}

/// Closing invocations of a sibling stop the scan for a matching child:
/// the container's own after-children methods, and after-parent-children
/// methods of existing children.
fn is_terminal(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    child: Option<ComponentId>,
    statement: StatementId,
) -> bool {
    let Some(child) = child else {
        return false;
    };
    let Some((on, signature)) = model.invocation_on(statement) else {
        return false;
    };
    if on == child {
        return false;
    }
    let child_type = &model.component(child).type_name;
    let order = catalog.effective_method_order(&model.component(on).type_name, signature);
    if on == container {
        if let MethodOrder::AfterChildren { children } = order {
            return children.matches(catalog, child_type);
        }
    }
    if model.component(on).parent == Some(container) {
        if let MethodOrder::AfterParentChildren { children } = order {
            return children.matches(catalog, child_type);
        }
    }
    false
}

/// Whether a statement at this position may reference the component's
/// variable.
pub(crate) fn statement_valid_for(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
    statement: StatementId,
) -> bool {
    let arena = model.arena();
    match &model.component(component).variable {
        Variable::This => true,
        Variable::Local { .. } | Variable::Lazy { .. } => {
            let (Some(creation), Ok(scope)) = (
                model.creation_statement(component),
                scope_block(model, catalog, component),
            ) else {
                return false;
            };
            (statement == creation || arena.precedes(creation, statement))
                && arena.block_within(arena.statement(statement).block, scope)
        }
        Variable::Field { .. } => match model.creation_statement(component) {
            Some(creation) => statement == creation || arena.precedes(creation, statement),
            None => false,
        },
        Variable::Exposed { .. } => match model.component(component).parent {
            Some(parent) => statement_valid_for(model, catalog, parent, statement),
            None => false,
        },
        Variable::Empty => false,
    }
}

/// Hoists a trailing statement out of nested blocks while the
/// container's variable stays usable at the outer level.
fn track_down(
    model: &FormModel,
    catalog: &Catalog,
    container: ComponentId,
    mut statement: StatementId,
) -> StatementId {
    let arena = model.arena();
    loop {
        let block = arena.statement(statement).block;
        if arena.block(block).statements.last() != Some(&statement) {
            return statement;
        }
        let Some(owner) = arena.owner_statement(block) else {
            return statement;
        };
        if !statement_valid_for(model, catalog, container, owner) {
            return statement;
        }
        statement = owner;
    }
}

fn this_method_begin(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
) -> Result<StatementTarget, PlaceError> {
    let body = this_scope_body(model, catalog, component)?;
    Ok(begin_behind_super(model, body))
}

/// Target at the start of the named method's body, behind a super call
/// when one opens it.
pub(crate) fn method_begin_target(
    model: &FormModel,
    name: &str,
) -> Result<StatementTarget, PlaceError> {
    let method = model
        .arena()
        .method_by_name(name)
        .ok_or_else(|| PlaceError::MissingMethod(name.to_string()))?;
    let body = model.arena().method(method).body;
    Ok(begin_behind_super(model, body))
}

/// Only a super call in first position counts; deeper preambles keep
/// the begin-of-block target.
fn begin_behind_super(model: &FormModel, body: BlockId) -> StatementTarget {
    let first = model.arena().block(body).statements.first().copied();
    match first {
        Some(statement)
            if matches!(model.arena().kind(statement), StatementKind::SuperCall { .. }) =>
        {
            StatementTarget::after(statement)
        }
        _ => StatementTarget::block_begin(body),
    }
}

fn this_scope_body(
    model: &FormModel,
    catalog: &Catalog,
    component: ComponentId,
) -> Result<BlockId, PlaceError> {
    let type_name = &model.component(component).type_name;
    let method = match catalog.this_target_method(type_name) {
        Some(name) => model
            .arena()
            .method_by_name(name)
            .ok_or_else(|| PlaceError::MissingMethod(name.to_string()))?,
        None => model
            .constructor()
            .ok_or_else(|| PlaceError::MissingMethod("constructor".to_string()))?,
    };
    Ok(model.arena().method(method).body)
}

fn parent_of(model: &FormModel, component: ComponentId) -> Result<ComponentId, PlaceError> {
    model.component(component).parent.ok_or(PlaceError::NoParent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;
    use crate::source::TargetAnchor;

    fn catalog(content: &str) -> Catalog {
        Catalog::from_str(content).unwrap()
    }

    fn panel_with_two_buttons() -> (FormModel, ComponentId, ComponentId, ComponentId) {
        let mut model = FormModel::new("Test");
        let panel = model.set_root_this("javax.swing.JPanel");
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        let first = model.add_component(
            "javax.swing.JButton",
            Some(panel),
            Variable::local("button_1"),
            "new JButton()",
        );
        model.append_creation(body, first);
        model.append_association(body, first, "add(@)", None);
        let second = model.add_component(
            "javax.swing.JButton",
            Some(panel),
            Variable::local("button_2"),
            "new JButton()",
        );
        model.append_creation(body, second);
        model.append_association(body, second, "add(@)", None);
        (model, panel, first, second)
    }

    #[test]
    fn variable_target_of_local_follows_declaration() {
        let (model, _, first, _) = panel_with_two_buttons();
        let catalog = Catalog::default();
        let target = variable_target(&model, &catalog, first).unwrap();
        let creation = model.creation_statement(first).unwrap();
        assert_eq!(target.statement(), Some(creation));
        assert!(!target.is_before());
    }

    #[test]
    fn variable_target_of_this_skips_leading_super_call() {
        let mut model = FormModel::new("Test");
        let panel = model.set_root_this("javax.swing.JPanel");
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        let super_call = model.append_super(body, "super();");
        let catalog = Catalog::default();
        let target = variable_target(&model, &catalog, panel).unwrap();
        assert_eq!(target.statement(), Some(super_call));
        assert!(!target.is_before());
    }

    #[test]
    fn trailing_target_follows_last_child_statement() {
        let (model, panel, _, second) = panel_with_two_buttons();
        let catalog = Catalog::default();
        let target = trailing_target(&model, &catalog, panel).unwrap();
        let last = model.association_statement(second).unwrap();
        assert_eq!(target.statement(), Some(last));
        assert!(!target.is_before());
    }

    #[test]
    fn trailing_target_stays_before_refusing_invocation() {
        let (mut model, panel, _, second) = panel_with_two_buttons();
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        model.append_invocation(body, panel, "setEnabled(boolean)", "false");
        let catalog = catalog(
            r#"
            [[component]]
            type = "javax.swing.JPanel"

            [[component.method]]
            signature = "setEnabled(boolean)"
            order = "last"
            "#,
        );
        let target = trailing_target(&model, &catalog, panel).unwrap();
        let last = model.association_statement(second).unwrap();
        assert_eq!(target.statement(), Some(last));
    }

    #[test]
    fn child_target_lands_before_first_sibling_span() {
        let (mut model, panel, first, _) = panel_with_two_buttons();
        let catalog = catalog(
            r#"
            [[component]]
            type = "javax.swing.JLabel"
            order = "first"
            "#,
        );
        let label = model.add_component(
            "javax.swing.JLabel",
            Some(panel),
            Variable::local("label"),
            "new JLabel()",
        );
        let target = child_target(&model, &catalog, panel, label).unwrap();
        let creation = model.creation_statement(first).unwrap();
        assert_eq!(target.statement(), Some(creation));
        assert!(target.is_before());
    }

    #[test]
    fn sibling_span_hoists_out_of_wholly_related_block() {
        let mut model = FormModel::new("Test");
        let panel = model.set_root_this("javax.swing.JPanel");
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        let (wrapper, inner) = model.arena_mut().append_nested(body, None);
        let button = model.add_component(
            "javax.swing.JButton",
            Some(panel),
            Variable::local("button"),
            "new JButton()",
        );
        model.append_creation(inner, button);
        model.append_association(inner, button, "add(@)", None);
        let catalog = catalog(
            r#"
            [[component]]
            type = "javax.swing.JLabel"
            order = "first"
            "#,
        );
        let label = model.add_component(
            "javax.swing.JLabel",
            Some(panel),
            Variable::local("label"),
            "new JLabel()",
        );
        let target = child_target(&model, &catalog, panel, label).unwrap();
        assert_eq!(target.statement(), Some(wrapper));
        assert!(target.is_before());
    }

    #[test]
    fn matching_child_stops_before_closing_invocation() {
        let (mut model, panel, _, _) = panel_with_two_buttons();
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        let closing = model.append_invocation(body, panel, "pack()", "");
        let catalog = catalog(
            r#"
            [[component]]
            type = "javax.swing.JButton"

            [[component]]
            type = "javax.swing.JPanel"

            [[component.method]]
            signature = "pack()"
            order = "afterChildren javax.swing.JButton"
            "#,
        );
        let third = model.add_component(
            "javax.swing.JButton",
            Some(panel),
            Variable::local("button_3"),
            "new JButton()",
        );
        let target = child_target(&model, &catalog, panel, third).unwrap();
        // the last anchor seen before the scan stopped
        let before_closing = model.arena().block(body).statements
            [model.arena().block(body).statements.len() - 2];
        assert_eq!(target.statement(), Some(before_closing));
        assert!(!target.is_before());
        assert!(model.arena().precedes(target.statement().unwrap(), closing));
    }

    #[test]
    fn forced_method_receives_children_at_its_end() {
        let mut model = FormModel::new("Test");
        let shell = model.set_root_this("org.demo.WizardDialog");
        let create = model.arena_mut().add_method(
            "protected Control createContents(Composite parent)",
            "createContents",
        );
        let body = model.arena().method(create).body;
        model.arena_mut().append(
            body,
            crate::source::StatementKind::Raw {
                text: "int unrelated = 0;".to_string(),
            },
        );
        let catalog = catalog(
            r#"
            [[component]]
            type = "org.demo.WizardDialog"
            this-target-method = "createContents"
            "#,
        );
        let button = model.add_component(
            "javax.swing.JButton",
            Some(shell),
            Variable::local("button"),
            "new JButton()",
        );
        let target = child_target(&model, &catalog, shell, button).unwrap();
        match target.anchor() {
            TargetAnchor::Block(block) => assert_eq!(block, body),
            other => panic!("expected block anchor, got {other:?}"),
        }
        assert!(!target.is_before());
    }

    #[test]
    fn child_span_end_lifts_nested_statements_into_scope() {
        let mut model = FormModel::new("Test");
        let panel = model.set_root_this("javax.swing.JPanel");
        let ctor = model.constructor().unwrap();
        let body = model.arena().method(ctor).body;
        let (wrapper, inner) = model.arena_mut().append_nested(body, None);
        let button = model.add_component(
            "javax.swing.JButton",
            Some(panel),
            Variable::local("button"),
            "new JButton()",
        );
        model.append_creation(inner, button);
        model.append_association(inner, button, "add(@)", None);
        assert_eq!(child_span_end(&model, button, body), Some(wrapper));
        let assoc = model.association_statement(button).unwrap();
        assert_eq!(child_span_end(&model, button, inner), Some(assoc));
    }
}
