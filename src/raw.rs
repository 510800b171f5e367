//! Raw Graph Module for the Codegen Core
//!
//! Data model for the unresolved introspection graph: one `RawNamespace`
//! per library namespace, exactly as handed over by the external
//! introspection parser. Entities reference each other by bare name
//! (same namespace) or `Namespace.Name` (cross namespace); nothing in
//! this module is resolved yet.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// QUALIFIED NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Canonical `Namespace.Name` identifier produced by normalization.
///
/// Equality is exact string match of both parts. Within a namespace a
/// bare name is sugar for `OwnNamespace.Name`; the normalizer expands
/// that sugar, so downstream stages only ever see qualified names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace: &str, name: &str) -> Self {
        QualifiedName {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Split an already qualified `Namespace.Name` string.
    /// Returns None unless the string has exactly one separator.
    pub fn parse(reference: &str) -> Option<Self> {
        let (namespace, name) = reference.split_once('.')?;
        if namespace.is_empty() || name.is_empty() || name.contains('.') {
            return None;
        }
        Some(QualifiedName::new(namespace, name))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

// Serialized as the plain "Namespace.Name" string, the same spelling the
// raw graph uses for pre-qualified references.
impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        QualifiedName::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("expected 'Namespace.Name', got '{}'", raw)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPE REFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// A reference to a type: an intrinsic primitive name, or an entity name
/// (bare or qualified). `c_type` is the native spelling and passes
/// through opaquely. Arrays carry their element type recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub c_type: Option<String>,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub element_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef {
            name: name.to_string(),
            c_type: None,
            is_array: false,
            element_type: None,
        }
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef {
            name: String::new(),
            c_type: None,
            is_array: true,
            element_type: Some(Box::new(element)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CALLABLE MEMBERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub doc: Option<String>,
}

/// A method, constructor, static function, or free function. The shape is
/// identical for all four; which list a callable sits in decides its role.
/// `c_identifier` is the stable native symbol used as the rename key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub c_identifier: String,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub throws: bool,
    #[serde(default)]
    pub doc: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES & SIGNALS
// ═══════════════════════════════════════════════════════════════════════════════

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub construct_only: bool,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub getter: Option<String>,
    #[serde(default)]
    pub setter: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Emission timing of a signal. "first" runs user hooks before the default
/// handler and lets them intercept it; "last" runs them after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalWhen {
    First,
    Last,
    Cleanup,
}

impl Default for SignalWhen {
    fn default() -> Self {
        SignalWhen::Last
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub name: String,
    #[serde(default)]
    pub when: SignalWhen,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub doc: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURAL MEMBERS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMember {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub c_identifier: String,
    #[serde(default)]
    pub doc: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW ENTITIES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_: bool,
    #[serde(default)]
    pub constructors: Vec<Method>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub static_functions: Vec<Method>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub glib_type_name: Option<String>,
    #[serde(default)]
    pub glib_get_type: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInterface {
    pub name: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnumeration {
    pub name: String,
    #[serde(default)]
    pub members: Vec<EnumMember>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCallback {
    pub name: String,
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstant {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlias {
    pub name: String,
    pub target: TypeRef,
    #[serde(default)]
    pub doc: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMESPACE
// ═══════════════════════════════════════════════════════════════════════════════

/// One library namespace as produced by the external parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNamespace {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub shared_library: Option<String>,
    #[serde(default)]
    pub c_identifier_prefix: Option<String>,
    #[serde(default)]
    pub classes: Vec<RawClass>,
    #[serde(default)]
    pub interfaces: Vec<RawInterface>,
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub enumerations: Vec<RawEnumeration>,
    #[serde(default)]
    pub bitfields: Vec<RawEnumeration>,
    #[serde(default)]
    pub callbacks: Vec<RawCallback>,
    #[serde(default)]
    pub functions: Vec<Method>,
    #[serde(default)]
    pub constants: Vec<RawConstant>,
    #[serde(default)]
    pub aliases: Vec<RawAlias>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_parse() {
        let qn = QualifiedName::parse("Gtk.Widget").unwrap();
        assert_eq!(qn.namespace, "Gtk");
        assert_eq!(qn.name, "Widget");
        assert_eq!(qn.to_string(), "Gtk.Widget");
    }

    #[test]
    fn test_qualified_name_rejects_bare_and_nested() {
        assert!(QualifiedName::parse("Widget").is_none());
        assert!(QualifiedName::parse("Gtk.Widget.Extra").is_none());
        assert!(QualifiedName::parse(".Widget").is_none());
        assert!(QualifiedName::parse("Gtk.").is_none());
    }

    #[test]
    fn test_qualified_name_serde_round_trip() {
        let qn = QualifiedName::new("GObject", "Object");
        let json = serde_json::to_string(&qn).unwrap();
        assert_eq!(json, "\"GObject.Object\"");
        let back: QualifiedName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, qn);
    }

    #[test]
    fn test_namespace_deserializes_with_defaults() {
        let ns: RawNamespace = serde_json::from_str(
            r#"{"name":"Gtk","classes":[{"name":"Button","parent":"Widget"}]}"#,
        )
        .unwrap();
        assert_eq!(ns.name, "Gtk");
        assert_eq!(ns.classes.len(), 1);
        assert_eq!(ns.classes[0].parent.as_deref(), Some("Widget"));
        assert!(ns.classes[0].implements.is_empty());
        assert!(!ns.classes[0].abstract_);
    }

    #[test]
    fn test_property_readable_defaults_true() {
        let prop: Property =
            serde_json::from_str(r#"{"name":"label","type":{"name":"utf8"}}"#).unwrap();
        assert!(prop.readable);
        assert!(!prop.writable);
    }
}
