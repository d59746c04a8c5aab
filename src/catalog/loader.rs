//! Catalog loading from TOML
//!
//! ```toml
//! [[component]]
//! type = "org.demo.MyPanel"
//! extends = "javax.swing.JPanel"
//! order = "default"
//! default-method-order = "afterCreation"
//!
//! [[component.method]]
//! signature = "setText(java.lang.String)"
//! order = "beforeAssociation"
//!
//! [[component.method]]
//! signature = "setTitle(java.lang.String)"
//! this-target-method = "createContents"
//!
//! [[component.method-group]]
//! order = "last"
//! signatures = ["dispose()", "pack()"]
//! ```
//!
//! A method record without an `order` keeps the implicit default order;
//! such records exist to carry a `this-target-method` redirect.

use std::path::Path;

use serde::Deserialize;

use super::{Catalog, CatalogError, ComponentDescription, MethodDescription};
use crate::error::RuleError;
use crate::order::{ComponentOrder, MethodOrder};
use crate::rules::{parse_component_order, parse_method_order};

#[derive(Deserialize)]
struct TomlCatalog {
    #[serde(default, rename = "component")]
    components: Vec<TomlComponent>,
}

#[derive(Deserialize)]
struct TomlComponent {
    #[serde(rename = "type")]
    type_name: String,
    extends: Option<String>,
    order: Option<String>,
    #[serde(rename = "default-method-order")]
    default_method_order: Option<String>,
    #[serde(rename = "this-target-method")]
    this_target_method: Option<String>,
    #[serde(default)]
    wrapper: bool,
    #[serde(default, rename = "method")]
    methods: Vec<TomlMethod>,
    #[serde(default, rename = "method-group")]
    method_groups: Vec<TomlMethodGroup>,
}

#[derive(Deserialize)]
struct TomlMethod {
    signature: String,
    order: Option<String>,
    #[serde(rename = "this-target-method")]
    this_target_method: Option<String>,
}

/// Several signatures sharing one order rule.
#[derive(Deserialize)]
struct TomlMethodGroup {
    order: String,
    signatures: Vec<String>,
}

impl Catalog {
    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a catalog from TOML content
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlCatalog = toml::from_str(content)?;
        let mut components = Vec::new();
        for raw in parsed.components {
            components.push(build_component(raw)?);
        }
        Catalog::validate(components)
    }
}

fn build_component(raw: TomlComponent) -> Result<ComponentDescription, CatalogError> {
    let order = match &raw.order {
        Some(rule) => {
            parse_component_order(rule).map_err(|source| rule_error(&raw.type_name, rule, source))?
        }
        None => ComponentOrder::Default,
    };
    let default_method_order = match &raw.default_method_order {
        Some(rule) => Some(
            parse_method_order(rule).map_err(|source| rule_error(&raw.type_name, rule, source))?,
        ),
        None => None,
    };

    let mut methods = Vec::new();
    for method in &raw.methods {
        let order = match &method.order {
            Some(rule) => parse_method_order(rule)
                .map_err(|source| rule_error(&raw.type_name, rule, source))?,
            None => MethodOrder::Default,
        };
        methods.push(MethodDescription {
            signature: method.signature.clone(),
            order,
            this_target_method: method.this_target_method.clone(),
        });
    }
    for group in &raw.method_groups {
        let order = parse_method_order(&group.order)
            .map_err(|source| rule_error(&raw.type_name, &group.order, source))?;
        for signature in &group.signatures {
            methods.push(MethodDescription {
                signature: signature.clone(),
                order: order.clone(),
                this_target_method: None,
            });
        }
    }

    Ok(ComponentDescription {
        type_name: raw.type_name,
        extends: raw.extends,
        order,
        default_method_order,
        this_target_method: raw.this_target_method,
        wrapper: raw.wrapper,
        methods,
    })
}

fn rule_error(type_name: &str, rule: &str, source: RuleError) -> CatalogError {
    CatalogError::Rule {
        type_name: type_name.to_string(),
        rule: rule.to_string(),
        source,
    }
}
