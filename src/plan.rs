//! Member Planner Module
//!
//! The conflict-resolution core. Walks a normalized class's ancestor
//! chain and interface set and decides, for each member, whether it is
//! emitted as-is, renamed to avoid collision, merged from an interface,
//! paired as an asynchronous operation, or excluded as unsupported.
//!
//! The planner is a pure function: it reads the normalized graph and
//! returns a `MemberPlan`; rename bookkeeping is part of the return
//! value, never a shared mutable map threaded through calls.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::GenOptions;
use crate::normalize::{EntityKind, NormalizedClass};
use crate::raw::{Method, Parameter, QualifiedName, TypeRef};
use crate::registry::GraphIndex;

// ═══════════════════════════════════════════════════════════════════════════════
// PLAN OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// The planned member surface of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPlan {
    /// Synchronous method list: own methods plus interface merges, minus
    /// async/finish pairs.
    pub methods: Vec<Method>,
    pub async_methods: Vec<Method>,
    pub finish_methods: Vec<Method>,
    /// Native identifier -> collision-avoiding alternate name. Renamed
    /// methods stay in the lists above; the rename keeps the shadowing
    /// method and the inherited one independently addressable.
    pub renames: BTreeMap<String, String>,
    pub main_constructor: Option<Method>,
    pub factories: Vec<Method>,
    pub static_functions: Vec<Method>,
    /// Set when no constructor qualifies but the class is concrete, has a
    /// parent, and carries a native type-registration identity. The
    /// registration path itself is emitted elsewhere.
    pub needs_base_construction: bool,
    pub generatable: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// snake_case or kebab-case to PascalCase. Segments that are already
/// capitalized keep their tail casing.
pub(crate) fn pascal_case(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUPPORTED PARAMETER SHAPES
// ═══════════════════════════════════════════════════════════════════════════════

fn type_supported(ty: &TypeRef, index: &GraphIndex) -> bool {
    if ty.is_array {
        return ty
            .element_type
            .as_deref()
            .map(|element| type_supported(element, index))
            .unwrap_or(true);
    }
    match QualifiedName::parse(&ty.name) {
        // A callback-typed parameter has no representable shape in the
        // generated constructor surface.
        Some(qn) => index.kind(&qn) != Some(EntityKind::Callback),
        None => true,
    }
}

fn param_supported(parameter: &Parameter, index: &GraphIndex) -> bool {
    type_supported(&parameter.ty, index)
}

// ═══════════════════════════════════════════════════════════════════════════════
// PLANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Plan the member surface of one class against the normalized graph.
pub fn plan_members(cls: &NormalizedClass, index: &GraphIndex, opts: &GenOptions) -> MemberPlan {
    let ancestors = index.ancestors(cls);

    // 1. Union of method names declared by every transitive ancestor.
    let mut parent_method_names: HashSet<&str> = HashSet::new();
    for ancestor in &ancestors {
        for method in &ancestor.methods {
            parent_method_names.insert(method.name.as_str());
        }
    }

    let mut renames: BTreeMap<String, String> = BTreeMap::new();

    // 2. Self-collision pass. "connect" always collides on a subclass:
    // every parented class inherits the universal connect operation.
    for method in &cls.methods {
        let shadows_parent = parent_method_names.contains(method.name.as_str());
        let shadows_connect = method.name == "connect" && cls.parent.is_some();
        if shadows_parent || shadows_connect {
            renames.insert(
                method.c_identifier.clone(),
                format!("{}{}", cls.name, pascal_case(&method.name)),
            );
        }
    }

    // 3. Interface merge, declaration order. An interface reference
    // without a resolvable interface declaration contributes nothing.
    let own_names: HashSet<&str> = cls.methods.iter().map(|m| m.name.as_str()).collect();
    let mut merged: Vec<Method> = Vec::new();
    let mut merged_names: HashSet<String> = HashSet::new();
    for iface_qn in &cls.implements {
        let iface = match index.interface(iface_qn) {
            Some(iface) => iface,
            None => continue,
        };
        for method in &iface.methods {
            if own_names.contains(method.name.as_str())
                || parent_method_names.contains(method.name.as_str())
            {
                continue;
            }
            if !merged_names.insert(method.name.clone()) {
                // A prior interface already claimed the bare name.
                renames.insert(
                    method.c_identifier.clone(),
                    format!("{}{}", iface_qn.name, pascal_case(&method.name)),
                );
            }
            merged.push(method.clone());
        }
    }

    // 4. Async/finish pairing over the combined method list.
    let rule = &opts.async_rule;
    let mut all: Vec<Method> = cls.methods.clone();
    all.append(&mut merged);

    let mut finish_candidates: HashMap<&str, usize> = HashMap::new();
    for (i, method) in all.iter().enumerate() {
        let takes_result = method.parameters.iter().any(|p| p.ty.name == rule.result_type);
        if takes_result {
            finish_candidates.insert(method.name.as_str(), i);
        }
    }

    let mut is_async = vec![false; all.len()];
    let mut is_finish = vec![false; all.len()];
    for (i, method) in all.iter().enumerate() {
        let takes_callback = method
            .parameters
            .last()
            .map(|p| p.ty.name == rule.callback_type)
            .unwrap_or(false);
        if !takes_callback {
            continue;
        }
        let base = method
            .name
            .strip_suffix(rule.async_suffix.as_str())
            .unwrap_or(&method.name);
        let expected = format!("{}{}", base, rule.finish_suffix);
        if let Some(&j) = finish_candidates.get(expected.as_str()) {
            is_async[i] = true;
            is_finish[j] = true;
        }
    }

    let mut methods = Vec::new();
    let mut async_methods = Vec::new();
    let mut finish_methods = Vec::new();
    for (i, method) in all.into_iter().enumerate() {
        if is_async[i] {
            async_methods.push(method);
        } else if is_finish[i] {
            finish_methods.push(method);
        } else {
            methods.push(method);
        }
    }

    // 5. Constructor/factory selection: first fully representable
    // constructor wins; the rest become static factories.
    let mut main_constructor: Option<Method> = None;
    let mut factories: Vec<Method> = Vec::new();
    for constructor in &cls.constructors {
        let supported = constructor
            .parameters
            .iter()
            .all(|p| param_supported(p, index));
        if main_constructor.is_none() && supported {
            main_constructor = Some(constructor.clone());
        } else {
            factories.push(constructor.clone());
        }
    }
    let generatable = cls.constructors.is_empty() || main_constructor.is_some();
    let needs_base_construction = main_constructor.is_none()
        && !cls.abstract_
        && cls.parent.is_some()
        && (cls.glib_type_name.is_some() || cls.glib_get_type.is_some());

    // 6. Static function filtering: an ancestor's static function of the
    // same name suppresses the subclass duplicate.
    let mut ancestor_static_names: HashSet<&str> = HashSet::new();
    for ancestor in &ancestors {
        for function in &ancestor.static_functions {
            ancestor_static_names.insert(function.name.as_str());
        }
    }
    let static_functions = cls
        .static_functions
        .iter()
        .filter(|f| !ancestor_static_names.contains(f.name.as_str()))
        .cloned()
        .collect();

    MemberPlan {
        methods,
        async_methods,
        finish_methods,
        renames,
        main_constructor,
        factories,
        static_functions,
        needs_base_construction,
        generatable,
    }
}
