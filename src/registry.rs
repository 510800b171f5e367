//! Graph Index Module
//!
//! Read-only map-of-maps over the normalized graph, addressed by
//! qualified name. Entities reference each other by value-comparable
//! name rather than by pointer, so the index carries no ownership
//! cycles; an ancestor walk is just repeated parent lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::normalize::{EntityKind, NormalizedClass, NormalizedInterface, NormalizedNamespace};
use crate::raw::QualifiedName;

pub struct GraphIndex<'a> {
    namespaces: &'a BTreeMap<String, NormalizedNamespace>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(namespaces: &'a BTreeMap<String, NormalizedNamespace>) -> Self {
        GraphIndex { namespaces }
    }

    pub fn namespaces(&self) -> &'a BTreeMap<String, NormalizedNamespace> {
        self.namespaces
    }

    pub fn namespace(&self, name: &str) -> Option<&'a NormalizedNamespace> {
        self.namespaces.get(name)
    }

    pub fn class(&self, qn: &QualifiedName) -> Option<&'a NormalizedClass> {
        self.namespaces.get(&qn.namespace)?.classes.get(&qn.name)
    }

    pub fn interface(&self, qn: &QualifiedName) -> Option<&'a NormalizedInterface> {
        self.namespaces.get(&qn.namespace)?.interfaces.get(&qn.name)
    }

    /// Kind of the entity a qualified name addresses, if any.
    pub fn kind(&self, qn: &QualifiedName) -> Option<EntityKind> {
        let ns = self.namespaces.get(&qn.namespace)?;
        if ns.classes.contains_key(&qn.name) {
            Some(EntityKind::Class)
        } else if ns.interfaces.contains_key(&qn.name) {
            Some(EntityKind::Interface)
        } else if ns.records.contains_key(&qn.name) {
            Some(EntityKind::Record)
        } else if ns.enumerations.contains_key(&qn.name) {
            Some(EntityKind::Enumeration)
        } else if ns.bitfields.contains_key(&qn.name) {
            Some(EntityKind::Bitfield)
        } else if ns.callbacks.contains_key(&qn.name) {
            Some(EntityKind::Callback)
        } else if ns.functions.contains_key(&qn.name) {
            Some(EntityKind::Function)
        } else if ns.constants.contains_key(&qn.name) {
            Some(EntityKind::Constant)
        } else if ns.aliases.contains_key(&qn.name) {
            Some(EntityKind::Alias)
        } else {
            None
        }
    }

    /// Transitive ancestor chain, nearest parent first. Stops at the root
    /// (no parent) or at a parent that is not a class in the graph.
    /// Guarded against malformed cyclic parent chains.
    pub fn ancestors(&self, cls: &NormalizedClass) -> Vec<&'a NormalizedClass> {
        let mut chain = Vec::new();
        let mut seen: HashSet<QualifiedName> = HashSet::new();
        let mut current = cls.parent.clone();
        while let Some(qn) = current {
            if !seen.insert(qn.clone()) {
                break;
            }
            match self.class(&qn) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent.parent.clone();
                }
                None => break,
            }
        }
        chain
    }

    /// Strict subclass test: the class itself does not count.
    pub fn is_subclass_of(&self, cls: &NormalizedClass, root: &QualifiedName) -> bool {
        self.ancestors(cls)
            .iter()
            .any(|ancestor| ancestor.qualified_name == *root)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIDGET TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-run table of widget-typed entities, computed once after
/// normalization and shared read-only across parallel per-class work.
/// Inclusive of the widget root itself: a slot property declared with the
/// root type still places a widget.
pub struct WidgetIndex {
    widgets: BTreeSet<String>,
}

impl WidgetIndex {
    pub fn build(index: &GraphIndex, widget_root: &QualifiedName) -> Self {
        let mut memo: HashMap<String, bool> = HashMap::new();

        for ns in index.namespaces().values() {
            for cls in ns.classes.values() {
                let mut path: Vec<String> = Vec::new();
                let mut verdict = false;
                let mut current = Some(cls);
                while let Some(c) = current {
                    let key = c.qualified_name.to_string();
                    if let Some(&known) = memo.get(&key) {
                        verdict = known;
                        break;
                    }
                    if c.qualified_name == *widget_root {
                        memo.insert(key, true);
                        verdict = true;
                        break;
                    }
                    if path.contains(&key) {
                        break;
                    }
                    path.push(key);
                    current = c.parent.as_ref().and_then(|p| index.class(p));
                }
                for key in path {
                    memo.insert(key, verdict);
                }
            }
        }

        let widgets = memo
            .into_iter()
            .filter(|(_, is_widget)| *is_widget)
            .map(|(name, _)| name)
            .collect();
        WidgetIndex { widgets }
    }

    /// Whether a resolved type name (`Namespace.Name`) places a widget.
    pub fn is_widget_type(&self, qualified: &str) -> bool {
        self.widgets.contains(qualified)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_all;
    use crate::raw::{RawClass, RawNamespace};

    fn class(name: &str, parent: Option<&str>) -> RawClass {
        RawClass {
            name: name.to_string(),
            parent: parent.map(|p| p.to_string()),
            implements: vec![],
            abstract_: false,
            constructors: vec![],
            methods: vec![],
            static_functions: vec![],
            properties: vec![],
            signals: vec![],
            glib_type_name: None,
            glib_get_type: None,
            doc: None,
        }
    }

    fn namespace(name: &str, classes: Vec<RawClass>) -> RawNamespace {
        RawNamespace {
            name: name.to_string(),
            version: "4.0".to_string(),
            shared_library: None,
            c_identifier_prefix: None,
            classes,
            interfaces: vec![],
            records: vec![],
            enumerations: vec![],
            bitfields: vec![],
            callbacks: vec![],
            functions: vec![],
            constants: vec![],
            aliases: vec![],
        }
    }

    #[test]
    fn test_ancestor_chain_crosses_namespaces() {
        let gobject = namespace("GObject", vec![class("Object", None)]);
        let gtk = namespace(
            "Gtk",
            vec![class("Widget", Some("Object")), class("Button", Some("Widget"))],
        );
        let normalized = normalize_all(&[gobject, gtk]).unwrap();
        let index = GraphIndex::new(&normalized);
        let button = &normalized["Gtk"].classes["Button"];
        let chain: Vec<String> = index
            .ancestors(button)
            .iter()
            .map(|c| c.qualified_name.to_string())
            .collect();
        assert_eq!(chain, vec!["Gtk.Widget", "GObject.Object"]);
        assert!(index.is_subclass_of(button, &QualifiedName::new("GObject", "Object")));
        assert!(!index.is_subclass_of(button, &QualifiedName::new("Gtk", "Button")));
    }

    #[test]
    fn test_widget_index_includes_root_and_descendants() {
        let gobject = namespace("GObject", vec![class("Object", None)]);
        let gtk = namespace(
            "Gtk",
            vec![
                class("Widget", Some("Object")),
                class("Button", Some("Widget")),
                class("ToggleButton", Some("Button")),
                class("Snapshot", Some("Object")),
            ],
        );
        let normalized = normalize_all(&[gobject, gtk]).unwrap();
        let index = GraphIndex::new(&normalized);
        let widgets = WidgetIndex::build(&index, &QualifiedName::new("Gtk", "Widget"));
        assert!(widgets.is_widget_type("Gtk.Widget"));
        assert!(widgets.is_widget_type("Gtk.Button"));
        assert!(widgets.is_widget_type("Gtk.ToggleButton"));
        assert!(!widgets.is_widget_type("Gtk.Snapshot"));
        assert!(!widgets.is_widget_type("GObject.Object"));
        assert_eq!(widgets.len(), 3);
    }

    #[test]
    fn test_kind_lookup() {
        let gtk = namespace("Gtk", vec![class("Widget", None)]);
        let normalized = normalize_all(&[gtk]).unwrap();
        let index = GraphIndex::new(&normalized);
        assert_eq!(
            index.kind(&QualifiedName::new("Gtk", "Widget")),
            Some(EntityKind::Class)
        );
        assert_eq!(index.kind(&QualifiedName::new("Gtk", "Missing")), None);
    }
}
