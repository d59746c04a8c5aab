//! Component placement policy

use crate::catalog::Catalog;
use crate::model::{ComponentId, Creation, FormModel};

/// Where a component's statements go relative to its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOrder {
    /// No preference of its own; appended, but never after a sibling
    /// that refuses successors.
    Default,
    /// In front of every existing sibling.
    First,
    /// At the very end, and no later sibling may be placed in front of
    /// its statements either.
    Last,
    /// In front of the first sibling of the given type.
    BeforeSibling { type_name: String },
}

impl ComponentOrder {
    /// `false` if new siblings must not be placed in front of a
    /// component with this order.
    pub fn can_be_before(&self) -> bool {
        !matches!(self, ComponentOrder::Last)
    }

    /// The existing sibling the component being added or moved must end
    /// up in front of, or `None` to go at the end of the container.
    pub fn next_component(
        &self,
        model: &FormModel,
        catalog: &Catalog,
        child: ComponentId,
        container: ComponentId,
    ) -> Option<ComponentId> {
        match self {
            ComponentOrder::Default => first_refusing_sibling(model, catalog, child, container),
            ComponentOrder::First => siblings(model, child, container).next(),
            ComponentOrder::Last => None,
            ComponentOrder::BeforeSibling { type_name } => siblings(model, child, container)
                .find(|&c| catalog.is_subtype(&model.component(c).type_name, type_name))
                .or_else(|| first_refusing_sibling(model, catalog, child, container)),
        }
    }
}

/// Existing siblings with statements of their own, in child order.
fn siblings<'a>(
    model: &'a FormModel,
    child: ComponentId,
    container: ComponentId,
) -> impl Iterator<Item = ComponentId> + 'a {
    model
        .children_of(container)
        .iter()
        .copied()
        .filter(move |&c| {
            c != child
                && !matches!(
                    model.component(c).creation,
                    Creation::Implicit | Creation::Virtual
                )
        })
}

/// The first sibling whose own order refuses components in front of it.
/// Anything appended without a preference must still stay ahead of such
/// siblings.
fn first_refusing_sibling(
    model: &FormModel,
    catalog: &Catalog,
    child: ComponentId,
    container: ComponentId,
) -> Option<ComponentId> {
    siblings(model, child, container).find(|&c| {
        !catalog
            .component_order(&model.component(c).type_name)
            .can_be_before()
    })
}
