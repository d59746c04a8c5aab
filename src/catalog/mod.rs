//! Component catalogs
//!
//! A catalog holds per-type placement policy: the component order, the
//! default method order, and per-signature method orders. Catalogs are
//! loaded from TOML and validated on load; a model edit never sees a
//! malformed rule.

mod loader;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::error::RuleError;
use crate::order::{ChildFilter, ComponentOrder, MethodOrder};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid order rule '{rule}' on {type_name}: {source}")]
    Rule {
        type_name: String,
        rule: String,
        source: RuleError,
    },
    #[error("Duplicate component type '{0}'")]
    DuplicateType(String),
    #[error("Duplicate method '{signature}' on {type_name}")]
    DuplicateMethod {
        type_name: String,
        signature: String,
    },
    #[error("Component type cycle through '{0}'")]
    ExtendsCycle(String),
    #[error("Unknown child type '{filter_type}' in children filter of {type_name}#{signature}")]
    UnknownFilterType {
        type_name: String,
        signature: String,
        filter_type: String,
    },
    #[error("Method order cycle on {type_name}: {}", chain.join(" -> "))]
    AfterCycle {
        type_name: String,
        chain: Vec<String>,
    },
}

#[derive(Debug)]
pub struct MethodDescription {
    pub signature: String,
    pub order: MethodOrder,
    /// Method that invocations of this signature on a `this`-bound
    /// component are redirected into.
    pub this_target_method: Option<String>,
}

#[derive(Debug)]
pub struct ComponentDescription {
    pub type_name: String,
    pub extends: Option<String>,
    pub order: ComponentOrder,
    pub default_method_order: Option<MethodOrder>,
    /// Method that receives statements of `this`-bound forms instead of
    /// the constructor.
    pub this_target_method: Option<String>,
    /// The type's presence in source is delegated to an object it wraps,
    /// e.g. a viewer wrapping its control.
    pub wrapper: bool,
    pub methods: Vec<MethodDescription>,
}

impl ComponentDescription {
    fn method(&self, signature: &str) -> Option<&MethodOrder> {
        self.methods
            .iter()
            .find(|m| m.signature == signature)
            .map(|m| &m.order)
    }
}

/// Validated set of component descriptions.
#[derive(Debug, Default)]
pub struct Catalog {
    components: Vec<ComponentDescription>,
}

const DEFAULT_COMPONENT_ORDER: ComponentOrder = ComponentOrder::Default;
const DEFAULT_METHOD_ORDER: MethodOrder = MethodOrder::AfterCreation;

impl Catalog {
    pub fn description(&self, type_name: &str) -> Option<&ComponentDescription> {
        self.components.iter().find(|c| c.type_name == type_name)
    }

    /// Component order of a type; the first explicit order up the extends
    /// chain wins.
    pub fn component_order(&self, type_name: &str) -> &ComponentOrder {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    if desc.order != ComponentOrder::Default {
                        return &desc.order;
                    }
                    current = desc.extends.as_deref();
                }
                None => break,
            }
        }
        &DEFAULT_COMPONENT_ORDER
    }

    /// Declared method order for a signature, walking the extends chain.
    /// Signatures without a record get [`MethodOrder::Default`].
    pub fn method_order(&self, type_name: &str, signature: &str) -> &MethodOrder {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    if let Some(order) = desc.method(signature) {
                        return order;
                    }
                    current = desc.extends.as_deref();
                }
                None => break,
            }
        }
        &MethodOrder::Default
    }

    /// The order used when a method has no declared order.
    pub fn default_method_order(&self, type_name: &str) -> &MethodOrder {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    if let Some(order) = &desc.default_method_order {
                        return order;
                    }
                    current = desc.extends.as_deref();
                }
                None => break,
            }
        }
        &DEFAULT_METHOD_ORDER
    }

    /// Declared order with `Default` resolved through the type's default
    /// method order.
    pub fn effective_method_order(&self, type_name: &str, signature: &str) -> &MethodOrder {
        match self.method_order(type_name, signature) {
            MethodOrder::Default => self.default_method_order(type_name),
            order => order,
        }
    }

    pub fn this_target_method(&self, type_name: &str) -> Option<&str> {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    if let Some(method) = &desc.this_target_method {
                        return Some(method);
                    }
                    current = desc.extends.as_deref();
                }
                None => return None,
            }
        }
        None
    }

    /// Method that `this`-bound invocations of `signature` are redirected
    /// into, when a record up the extends chain names one.
    pub fn method_this_target(&self, type_name: &str, signature: &str) -> Option<&str> {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    let method = desc.methods.iter().find(|m| m.signature == signature);
                    if let Some(target) = method.and_then(|m| m.this_target_method.as_deref()) {
                        return Some(target);
                    }
                    current = desc.extends.as_deref();
                }
                None => return None,
            }
        }
        None
    }

    /// `true` if the type delegates its source presence to a wrapped
    /// object, here or up the extends chain.
    pub fn is_wrapper(&self, type_name: &str) -> bool {
        let mut current = Some(type_name);
        while let Some(t) = current {
            match self.description(t) {
                Some(desc) => {
                    if desc.wrapper {
                        return true;
                    }
                    current = desc.extends.as_deref();
                }
                None => return false,
            }
        }
        false
    }

    /// `true` if `type_name` is `ancestor` or extends it, directly or
    /// transitively.
    pub fn is_subtype(&self, type_name: &str, ancestor: &str) -> bool {
        let mut current = Some(type_name);
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            current = self.description(t).and_then(|d| d.extends.as_deref());
        }
        false
    }

    // ------------------------------------------------------------------
    // Load-time validation
    // ------------------------------------------------------------------

    pub(crate) fn validate(components: Vec<ComponentDescription>) -> Result<Self, CatalogError> {
        let catalog = Catalog { components };
        catalog.check_duplicates()?;
        catalog.check_extends_cycles()?;
        catalog.check_filter_types()?;
        catalog.check_after_cycles()?;
        Ok(catalog)
    }

    fn check_duplicates(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for desc in &self.components {
            if !seen.insert(desc.type_name.as_str()) {
                return Err(CatalogError::DuplicateType(desc.type_name.clone()));
            }
            let mut methods = HashSet::new();
            for method in &desc.methods {
                if !methods.insert(method.signature.as_str()) {
                    return Err(CatalogError::DuplicateMethod {
                        type_name: desc.type_name.clone(),
                        signature: method.signature.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_extends_cycles(&self) -> Result<(), CatalogError> {
        for desc in &self.components {
            let mut visited = HashSet::new();
            let mut current = Some(desc.type_name.as_str());
            while let Some(t) = current {
                if !visited.insert(t) {
                    return Err(CatalogError::ExtendsCycle(desc.type_name.clone()));
                }
                current = self.description(t).and_then(|d| d.extends.as_deref());
            }
        }
        Ok(())
    }

    /// Children filters may only name catalog types; a typo would
    /// otherwise silently never match.
    fn check_filter_types(&self) -> Result<(), CatalogError> {
        for desc in &self.components {
            for method in &desc.methods {
                let filter = match &method.order {
                    MethodOrder::AfterChildren { children }
                    | MethodOrder::AfterParentChildren { children } => children,
                    _ => continue,
                };
                if let ChildFilter::Types(types) = filter {
                    for filter_type in types {
                        if self.description(filter_type).is_none() {
                            return Err(CatalogError::UnknownFilterType {
                                type_name: desc.type_name.clone(),
                                signature: method.signature.clone(),
                                filter_type: filter_type.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// `after` chains must terminate. A signature may target one without
    /// a record of its own, but following `after` edges, resolved through
    /// the type's default order for undeclared targets, must never come
    /// back around.
    fn check_after_cycles(&self) -> Result<(), CatalogError> {
        for desc in &self.components {
            let type_name = desc.type_name.as_str();
            // All signatures visible on this type, inherited included.
            let mut visible = Vec::new();
            let mut seen = HashSet::new();
            let mut current = Some(type_name);
            while let Some(t) = current {
                let Some(d) = self.description(t) else { break };
                for method in &d.methods {
                    if seen.insert(method.signature.as_str()) {
                        visible.push(method.signature.as_str());
                    }
                }
                current = d.extends.as_deref();
            }

            let mut state: HashMap<&str, Visit> = HashMap::new();
            // Undeclared signatures resolve through the default order, so
            // an `after` default participates in every chain.
            if let MethodOrder::After { signature } = self.default_method_order(type_name) {
                self.visit_after(type_name, signature, &mut state, &mut Vec::new())?;
            }
            for sig in visible {
                self.visit_after(type_name, sig, &mut state, &mut Vec::new())?;
            }
        }
        Ok(())
    }

    fn visit_after<'a>(
        &'a self,
        type_name: &str,
        signature: &'a str,
        state: &mut HashMap<&'a str, Visit>,
        stack: &mut Vec<String>,
    ) -> Result<(), CatalogError> {
        match state.get(signature) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                let from = stack
                    .iter()
                    .position(|s| s == signature)
                    .unwrap_or(0);
                let mut chain: Vec<String> = stack[from..].to_vec();
                chain.push(signature.to_string());
                return Err(CatalogError::AfterCycle {
                    type_name: type_name.to_string(),
                    chain,
                });
            }
            None => {}
        }
        state.insert(signature, Visit::InProgress);
        stack.push(signature.to_string());
        if let MethodOrder::After { signature: target } =
            self.effective_method_order(type_name, signature)
        {
            self.visit_after(type_name, target, state, stack)?;
        }
        stack.pop();
        state.insert(signature, Visit::Done);
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Visit {
    InProgress,
    Done,
}
