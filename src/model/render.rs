//! Source rendering
//!
//! Turns the model back into deterministic Java-style source text. The
//! output is what edits are asserted against: statement order is the
//! contract, formatting is fixed at two-space indents.

use super::{short_type, ComponentId, FormModel, Variable};
use crate::source::{BlockId, MethodId, StatementKind};

const INDENT: &str = "  ";

impl FormModel {
    /// Render the whole form as source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let extends = self.root().and_then(|root| {
            let data = self.component(root);
            match data.variable {
                Variable::This => Some(short_type(&data.type_name).to_string()),
                _ => None,
            }
        });
        match extends {
            Some(superclass) => out.push_str(&format!(
                "public class {} extends {} {{\n",
                self.class_name(),
                superclass
            )),
            None => out.push_str(&format!("public class {} {{\n", self.class_name())),
        }
        for id in self.components() {
            let data = self.component(id);
            match &data.variable {
                Variable::Field { name } | Variable::Lazy { name, .. } => {
                    out.push_str(&format!(
                        "{}private {} {};\n",
                        INDENT,
                        short_type(&data.type_name),
                        name
                    ));
                }
                _ => {}
            }
        }
        for method in self.arena().methods() {
            let data = self.arena().method(method);
            out.push_str(&format!("{}{} {{\n", INDENT, data.decl));
            self.render_block(data.body, method, 2, &mut out);
            out.push_str(&format!("{}}}\n", INDENT));
        }
        out.push_str("}\n");
        out
    }

    fn render_block(&self, block: BlockId, method: MethodId, depth: usize, out: &mut String) {
        let pad = INDENT.repeat(depth);
        for &stmt in &self.arena().block(block).statements {
            match self.arena().kind(stmt) {
                StatementKind::Creation { component } => {
                    out.push_str(&format!("{}{}\n", pad, self.render_creation(*component)));
                }
                StatementKind::Invocation {
                    component,
                    signature,
                    args,
                } => {
                    out.push_str(&format!(
                        "{}{}{}({});\n",
                        pad,
                        self.receiver(*component, method),
                        method_name(signature),
                        args
                    ));
                }
                StatementKind::Association { child, call, .. } => {
                    let text = call.replace('@', &self.child_expr(*child));
                    let receiver = match self.component(*child).parent {
                        Some(parent) => self.receiver(parent, method),
                        None => String::new(),
                    };
                    out.push_str(&format!("{}{}{};\n", pad, receiver, text));
                }
                StatementKind::SuperCall { text } | StatementKind::Raw { text } => {
                    out.push_str(&format!("{}{}\n", pad, text));
                }
                StatementKind::Nested { header, body } => {
                    match header {
                        Some(header) => out.push_str(&format!("{}{} {{\n", pad, header)),
                        None => out.push_str(&format!("{}{{\n", pad)),
                    }
                    self.render_block(*body, method, depth + 1, out);
                    out.push_str(&format!("{}}}\n", pad));
                }
            }
        }
    }

    fn render_creation(&self, component: ComponentId) -> String {
        let data = self.component(component);
        match &data.variable {
            Variable::Local { name } => format!(
                "{} {} = {};",
                short_type(&data.type_name),
                name,
                data.creation_expr
            ),
            Variable::Field { name } | Variable::Lazy { name, .. } => {
                format!("{} = {};", name, data.creation_expr)
            }
            Variable::This | Variable::Exposed { .. } | Variable::Empty => {
                format!("{};", data.creation_expr)
            }
        }
    }

    /// Receiver prefix for a call on the component; empty for `this`.
    /// Lazy components go by field name inside their own accessor and by
    /// accessor call everywhere else.
    fn receiver(&self, component: ComponentId, method: MethodId) -> String {
        let data = self.component(component);
        match &data.variable {
            Variable::This => String::new(),
            Variable::Local { name } | Variable::Field { name } => format!("{}.", name),
            Variable::Lazy { name, accessor } => {
                if self.arena().method(method).name == *accessor {
                    format!("{}.", name)
                } else {
                    format!("{}().", accessor)
                }
            }
            Variable::Exposed { accessor } => format!("{}().", accessor),
            Variable::Empty => format!("{}.", data.creation_expr),
        }
    }

    /// Expression standing for the component in argument position.
    fn child_expr(&self, component: ComponentId) -> String {
        let data = self.component(component);
        match &data.variable {
            Variable::This => "this".to_string(),
            Variable::Local { name } | Variable::Field { name } => name.clone(),
            Variable::Lazy { accessor, .. } | Variable::Exposed { accessor } => {
                format!("{}()", accessor)
            }
            Variable::Empty => data.creation_expr.clone(),
        }
    }
}

fn method_name(signature: &str) -> &str {
    signature.split('(').next().unwrap_or(signature)
}
