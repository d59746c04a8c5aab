//! Component records

use crate::source::StatementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) usize);

/// How a component comes into existence in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// A dedicated creation statement, e.g. `JButton button = new JButton();`
    Explicit { statement: StatementId },
    /// Created inside its association statement, e.g. `add(new JButton());`
    Inline { statement: StatementId },
    /// Exists as a side effect of the parent, e.g. a frame's content pane.
    Implicit,
    /// The form instance itself.
    Root,
    /// Not present in the source until an edit forces materialization.
    Virtual,
}

/// How source statements refer to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    /// The form instance, referenced without a receiver.
    This,
    /// Local variable in some block.
    Local { name: String },
    /// Instance field assigned where the creation statement sits.
    Field { name: String },
    /// Field guarded by a lazy accessor, e.g. `getButton()`.
    Lazy { name: String, accessor: String },
    /// Reachable only through a parent accessor, e.g. `getContentPane()`.
    Exposed { accessor: String },
    /// No variable at all; the component is only an expression.
    Empty,
}

impl Variable {
    pub fn local(name: &str) -> Self {
        Variable::Local {
            name: name.to_string(),
        }
    }

    pub fn field(name: &str) -> Self {
        Variable::Field {
            name: name.to_string(),
        }
    }

    pub fn lazy(name: &str, accessor: &str) -> Self {
        Variable::Lazy {
            name: name.to_string(),
            accessor: accessor.to_string(),
        }
    }

    pub fn exposed(accessor: &str) -> Self {
        Variable::Exposed {
            accessor: accessor.to_string(),
        }
    }
}

/// The statement tying a component to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// Not attached through source, e.g. the root or an exposed child.
    None,
    /// A dedicated statement, e.g. `add(button);`
    Statement(StatementId),
    /// The creation expression itself carries the parent,
    /// e.g. `new ItemPanel(this);`
    Constructor,
}

#[derive(Debug)]
pub struct ComponentData {
    pub type_name: String,
    pub parent: Option<ComponentId>,
    pub children: Vec<ComponentId>,
    pub creation: Creation,
    pub variable: Variable,
    pub association: Association,
    /// Rendered creation expression, e.g. `new JButton("push")`.
    pub creation_expr: String,
}

/// Last segment of a qualified type name: `javax.swing.JButton` to
/// `JButton`, `org.demo.Outer$Inner` to `Inner`.
pub fn short_type(type_name: &str) -> &str {
    let tail = type_name.rsplit('.').next().unwrap_or(type_name);
    tail.rsplit('$').next().unwrap_or(tail)
}
