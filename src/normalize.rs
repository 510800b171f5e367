//! Normalizer Module for the Codegen Core
//!
//! Converts raw per-namespace introspection data into a fully
//! cross-resolved, internally consistent type graph. Every type, parent,
//! and implements reference is rewritten to canonical `Namespace.Name`
//! form; a reference that cannot be found anywhere in the run's context
//! is fatal for the whole run, because downstream planning assumes
//! universal resolvability.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::is_intrinsic;
use crate::raw::{
    EnumMember, Field, Method, Parameter, Property, QualifiedName, RawNamespace, Signal, TypeRef,
};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_UNRESOLVED_REFERENCE: &str = "G-ERR-RESOLVE-001";
pub const ERR_UNKNOWN_NAMESPACE: &str = "G-ERR-RESOLVE-002";

/// Fatal normalization failure: a reference that does not resolve in any
/// namespace of the run. The graph is inconsistent at this point, so the
/// error aborts the run rather than being recovered per class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionError {
    pub code: String,
    pub reference: String,
    pub from_entity: String,
    pub message: String,
}

impl ResolutionError {
    fn unresolved(reference: &str, from_entity: &str) -> Self {
        ResolutionError {
            code: ERR_UNRESOLVED_REFERENCE.to_string(),
            reference: reference.to_string(),
            from_entity: from_entity.to_string(),
            message: format!(
                "reference '{}' (from {}) does not resolve in any namespace",
                reference, from_entity
            ),
        }
    }

    fn unknown_namespace(reference: &str, from_entity: &str) -> Self {
        ResolutionError {
            code: ERR_UNKNOWN_NAMESPACE.to_string(),
            reference: reference.to_string(),
            from_entity: from_entity.to_string(),
            message: format!(
                "reference '{}' (from {}) names a namespace that is not part of this run",
                reference, from_entity
            ),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ResolutionError {}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMALIZED ENTITIES
// ═══════════════════════════════════════════════════════════════════════════════

/// The closed set of entity kinds addressable in the normalized graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Class,
    Interface,
    Record,
    Enumeration,
    Bitfield,
    Callback,
    Function,
    Constant,
    Alias,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedClass {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub parent: Option<QualifiedName>,
    /// Deduplicated, declaration order preserved.
    pub implements: Vec<QualifiedName>,
    #[serde(rename = "abstract")]
    pub abstract_: bool,
    pub constructors: Vec<Method>,
    pub methods: Vec<Method>,
    pub static_functions: Vec<Method>,
    pub properties: Vec<Property>,
    pub signals: Vec<Signal>,
    pub glib_type_name: Option<String>,
    pub glib_get_type: Option<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInterface {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub prerequisites: Vec<QualifiedName>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub signals: Vec<Signal>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEnumeration {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub members: Vec<EnumMember>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCallback {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFunction {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub c_identifier: String,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub throws: bool,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedConstant {
    pub name: String,
    pub qualified_name: QualifiedName,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub value: String,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAlias {
    pub name: String,
    pub qualified_name: QualifiedName,
    pub target: TypeRef,
    pub doc: Option<String>,
}

/// One namespace after normalization: one map per entity kind, keyed by
/// simple name, values carrying the qualified identity. BTreeMap keeps
/// iteration order stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNamespace {
    pub name: String,
    pub version: String,
    pub shared_library: Option<String>,
    pub c_identifier_prefix: Option<String>,
    pub classes: BTreeMap<String, NormalizedClass>,
    pub interfaces: BTreeMap<String, NormalizedInterface>,
    pub records: BTreeMap<String, NormalizedRecord>,
    pub enumerations: BTreeMap<String, NormalizedEnumeration>,
    pub bitfields: BTreeMap<String, NormalizedEnumeration>,
    pub callbacks: BTreeMap<String, NormalizedCallback>,
    pub functions: BTreeMap<String, NormalizedFunction>,
    pub constants: BTreeMap<String, NormalizedConstant>,
    pub aliases: BTreeMap<String, NormalizedAlias>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW GRAPH CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only view over every raw namespace of the run, used for
/// cross-namespace reference resolution.
pub struct RawGraph<'a> {
    declared: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> RawGraph<'a> {
    pub fn new(namespaces: &'a [RawNamespace]) -> Self {
        let mut declared: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for ns in namespaces {
            let names = declared.entry(ns.name.as_str()).or_default();
            for c in &ns.classes {
                names.insert(c.name.as_str());
            }
            for i in &ns.interfaces {
                names.insert(i.name.as_str());
            }
            for r in &ns.records {
                names.insert(r.name.as_str());
            }
            for e in &ns.enumerations {
                names.insert(e.name.as_str());
            }
            for b in &ns.bitfields {
                names.insert(b.name.as_str());
            }
            for cb in &ns.callbacks {
                names.insert(cb.name.as_str());
            }
            for f in &ns.functions {
                names.insert(f.name.as_str());
            }
            for c in &ns.constants {
                names.insert(c.name.as_str());
            }
            for a in &ns.aliases {
                names.insert(a.name.as_str());
            }
        }
        RawGraph { declared }
    }

    fn contains_namespace(&self, namespace: &str) -> bool {
        self.declared.contains_key(namespace)
    }

    fn declares(&self, namespace: &str, name: &str) -> bool {
        self.declared
            .get(namespace)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    /// First namespace (in sorted order) declaring `name`. Sorted order
    /// keeps the fallback scan deterministic when a bare name exists in
    /// more than one foreign namespace.
    fn find_declaring_namespace(&self, name: &str) -> Option<&'a str> {
        self.declared
            .iter()
            .find(|(_, names)| names.contains(name))
            .map(|(ns, _)| *ns)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

struct Resolver<'a> {
    graph: &'a RawGraph<'a>,
    namespace: &'a str,
}

impl<'a> Resolver<'a> {
    /// Resolve a bare or pre-qualified entity reference to a qualified
    /// name. Bare names qualify against the current namespace by default,
    /// falling back to a scan of the other namespaces when the entity is
    /// not declared locally (base hierarchies rooted in an implicitly
    /// imported foundational namespace).
    fn resolve_reference(
        &self,
        reference: &str,
        from_entity: &str,
    ) -> Result<QualifiedName, ResolutionError> {
        if let Some(qn) = QualifiedName::parse(reference) {
            if !self.graph.contains_namespace(&qn.namespace) {
                return Err(ResolutionError::unknown_namespace(reference, from_entity));
            }
            if !self.graph.declares(&qn.namespace, &qn.name) {
                return Err(ResolutionError::unresolved(reference, from_entity));
            }
            return Ok(qn);
        }

        if self.graph.declares(self.namespace, reference) {
            return Ok(QualifiedName::new(self.namespace, reference));
        }
        if let Some(ns) = self.graph.find_declaring_namespace(reference) {
            return Ok(QualifiedName::new(ns, reference));
        }
        Err(ResolutionError::unresolved(reference, from_entity))
    }

    /// Resolve a type reference. Intrinsics pass through untouched;
    /// arrays resolve their element recursively and keep the container
    /// spelling as-is. Resolution is a name lookup, not a traversal, so
    /// self-referencing types terminate like any other.
    fn resolve_type(&self, ty: &TypeRef, from_entity: &str) -> Result<TypeRef, ResolutionError> {
        if ty.is_array {
            let element = match &ty.element_type {
                Some(element) => Some(Box::new(self.resolve_type(element, from_entity)?)),
                None => None,
            };
            return Ok(TypeRef {
                name: ty.name.clone(),
                c_type: ty.c_type.clone(),
                is_array: true,
                element_type: element,
            });
        }
        if ty.name.is_empty() || is_intrinsic(&ty.name) {
            return Ok(ty.clone());
        }
        let qn = self.resolve_reference(&ty.name, from_entity)?;
        Ok(TypeRef {
            name: qn.to_string(),
            c_type: ty.c_type.clone(),
            is_array: false,
            element_type: None,
        })
    }

    fn resolve_opt_type(
        &self,
        ty: &Option<TypeRef>,
        from_entity: &str,
    ) -> Result<Option<TypeRef>, ResolutionError> {
        match ty {
            Some(ty) => Ok(Some(self.resolve_type(ty, from_entity)?)),
            None => Ok(None),
        }
    }

    fn resolve_parameters(
        &self,
        parameters: &[Parameter],
        from_entity: &str,
    ) -> Result<Vec<Parameter>, ResolutionError> {
        parameters
            .iter()
            .map(|p| {
                Ok(Parameter {
                    name: p.name.clone(),
                    ty: self.resolve_type(&p.ty, from_entity)?,
                    doc: p.doc.clone(),
                })
            })
            .collect()
    }

    fn resolve_method(&self, method: &Method, owner: &str) -> Result<Method, ResolutionError> {
        let from = format!("{}.{}", owner, method.name);
        Ok(Method {
            name: method.name.clone(),
            c_identifier: method.c_identifier.clone(),
            return_type: self.resolve_opt_type(&method.return_type, &from)?,
            parameters: self.resolve_parameters(&method.parameters, &from)?,
            throws: method.throws,
            doc: method.doc.clone(),
        })
    }

    fn resolve_methods(&self, methods: &[Method], owner: &str) -> Result<Vec<Method>, ResolutionError> {
        methods.iter().map(|m| self.resolve_method(m, owner)).collect()
    }

    fn resolve_property(
        &self,
        property: &Property,
        owner: &str,
    ) -> Result<Property, ResolutionError> {
        let from = format!("{}.{}", owner, property.name);
        Ok(Property {
            ty: self.resolve_type(&property.ty, &from)?,
            ..property.clone()
        })
    }

    fn resolve_properties(
        &self,
        properties: &[Property],
        owner: &str,
    ) -> Result<Vec<Property>, ResolutionError> {
        properties
            .iter()
            .map(|p| self.resolve_property(p, owner))
            .collect()
    }

    fn resolve_signal(&self, signal: &Signal, owner: &str) -> Result<Signal, ResolutionError> {
        let from = format!("{}.{}", owner, signal.name);
        Ok(Signal {
            name: signal.name.clone(),
            when: signal.when,
            return_type: self.resolve_opt_type(&signal.return_type, &from)?,
            parameters: self.resolve_parameters(&signal.parameters, &from)?,
            doc: signal.doc.clone(),
        })
    }

    fn resolve_signals(&self, signals: &[Signal], owner: &str) -> Result<Vec<Signal>, ResolutionError> {
        signals.iter().map(|s| self.resolve_signal(s, owner)).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMESPACE NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalize a single namespace against the full raw graph.
pub fn normalize_namespace(
    raw: &RawNamespace,
    context: &RawGraph,
) -> Result<NormalizedNamespace, ResolutionError> {
    let resolver = Resolver {
        graph: context,
        namespace: &raw.name,
    };

    let mut classes = BTreeMap::new();
    for class in &raw.classes {
        let qualified = QualifiedName::new(&raw.name, &class.name);
        let owner = qualified.to_string();

        let parent = match &class.parent {
            Some(parent) => Some(resolver.resolve_reference(parent, &owner)?),
            None => None,
        };

        let mut implements = Vec::new();
        for reference in &class.implements {
            let qn = resolver.resolve_reference(reference, &owner)?;
            if !implements.contains(&qn) {
                implements.push(qn);
            }
        }

        classes.insert(
            class.name.clone(),
            NormalizedClass {
                name: class.name.clone(),
                qualified_name: qualified,
                parent,
                implements,
                abstract_: class.abstract_,
                constructors: resolver.resolve_methods(&class.constructors, &owner)?,
                methods: resolver.resolve_methods(&class.methods, &owner)?,
                static_functions: resolver.resolve_methods(&class.static_functions, &owner)?,
                properties: resolver.resolve_properties(&class.properties, &owner)?,
                signals: resolver.resolve_signals(&class.signals, &owner)?,
                glib_type_name: class.glib_type_name.clone(),
                glib_get_type: class.glib_get_type.clone(),
                doc: class.doc.clone(),
            },
        );
    }

    let mut interfaces = BTreeMap::new();
    for iface in &raw.interfaces {
        let qualified = QualifiedName::new(&raw.name, &iface.name);
        let owner = qualified.to_string();

        let mut prerequisites = Vec::new();
        for reference in &iface.prerequisites {
            let qn = resolver.resolve_reference(reference, &owner)?;
            if !prerequisites.contains(&qn) {
                prerequisites.push(qn);
            }
        }

        interfaces.insert(
            iface.name.clone(),
            NormalizedInterface {
                name: iface.name.clone(),
                qualified_name: qualified,
                prerequisites,
                methods: resolver.resolve_methods(&iface.methods, &owner)?,
                properties: resolver.resolve_properties(&iface.properties, &owner)?,
                signals: resolver.resolve_signals(&iface.signals, &owner)?,
                doc: iface.doc.clone(),
            },
        );
    }

    let mut records = BTreeMap::new();
    for record in &raw.records {
        let qualified = QualifiedName::new(&raw.name, &record.name);
        let owner = qualified.to_string();
        let fields = record
            .fields
            .iter()
            .map(|f| {
                Ok(Field {
                    ty: resolver.resolve_type(&f.ty, &format!("{}.{}", owner, f.name))?,
                    ..f.clone()
                })
            })
            .collect::<Result<Vec<_>, ResolutionError>>()?;
        records.insert(
            record.name.clone(),
            NormalizedRecord {
                name: record.name.clone(),
                qualified_name: qualified,
                fields,
                methods: resolver.resolve_methods(&record.methods, &owner)?,
                doc: record.doc.clone(),
            },
        );
    }

    let mut enumerations = BTreeMap::new();
    for e in &raw.enumerations {
        enumerations.insert(
            e.name.clone(),
            NormalizedEnumeration {
                name: e.name.clone(),
                qualified_name: QualifiedName::new(&raw.name, &e.name),
                members: e.members.clone(),
                doc: e.doc.clone(),
            },
        );
    }

    let mut bitfields = BTreeMap::new();
    for b in &raw.bitfields {
        bitfields.insert(
            b.name.clone(),
            NormalizedEnumeration {
                name: b.name.clone(),
                qualified_name: QualifiedName::new(&raw.name, &b.name),
                members: b.members.clone(),
                doc: b.doc.clone(),
            },
        );
    }

    let mut callbacks = BTreeMap::new();
    for cb in &raw.callbacks {
        let qualified = QualifiedName::new(&raw.name, &cb.name);
        let owner = qualified.to_string();
        callbacks.insert(
            cb.name.clone(),
            NormalizedCallback {
                name: cb.name.clone(),
                qualified_name: qualified,
                return_type: resolver.resolve_opt_type(&cb.return_type, &owner)?,
                parameters: resolver.resolve_parameters(&cb.parameters, &owner)?,
                doc: cb.doc.clone(),
            },
        );
    }

    let mut functions = BTreeMap::new();
    for f in &raw.functions {
        let qualified = QualifiedName::new(&raw.name, &f.name);
        let owner = qualified.to_string();
        functions.insert(
            f.name.clone(),
            NormalizedFunction {
                name: f.name.clone(),
                qualified_name: qualified,
                c_identifier: f.c_identifier.clone(),
                return_type: resolver.resolve_opt_type(&f.return_type, &owner)?,
                parameters: resolver.resolve_parameters(&f.parameters, &owner)?,
                throws: f.throws,
                doc: f.doc.clone(),
            },
        );
    }

    let mut constants = BTreeMap::new();
    for c in &raw.constants {
        let qualified = QualifiedName::new(&raw.name, &c.name);
        let owner = qualified.to_string();
        constants.insert(
            c.name.clone(),
            NormalizedConstant {
                name: c.name.clone(),
                qualified_name: qualified,
                ty: resolver.resolve_type(&c.ty, &owner)?,
                value: c.value.clone(),
                doc: c.doc.clone(),
            },
        );
    }

    let mut aliases = BTreeMap::new();
    for a in &raw.aliases {
        let qualified = QualifiedName::new(&raw.name, &a.name);
        let owner = qualified.to_string();
        aliases.insert(
            a.name.clone(),
            NormalizedAlias {
                name: a.name.clone(),
                qualified_name: qualified,
                target: resolver.resolve_type(&a.target, &owner)?,
                doc: a.doc.clone(),
            },
        );
    }

    Ok(NormalizedNamespace {
        name: raw.name.clone(),
        version: raw.version.clone(),
        shared_library: raw.shared_library.clone(),
        c_identifier_prefix: raw.c_identifier_prefix.clone(),
        classes,
        interfaces,
        records,
        enumerations,
        bitfields,
        callbacks,
        functions,
        constants,
        aliases,
    })
}

/// Normalize every namespace of a run. Must complete before any class is
/// classified or planned; cross-namespace ancestor walks require the full
/// resolved graph.
pub fn normalize_all(
    namespaces: &[RawNamespace],
) -> Result<BTreeMap<String, NormalizedNamespace>, ResolutionError> {
    let graph = RawGraph::new(namespaces);
    let mut normalized = BTreeMap::new();
    for raw in namespaces {
        normalized.insert(raw.name.clone(), normalize_namespace(raw, &graph)?);
    }
    Ok(normalized)
}
