//! Widget/Controller Classifier Module
//!
//! Decides whether a normalized class is a UI-widget-like entity, an
//! event-controller-like entity, or neither, and computes slot metadata
//! (named child-placement properties) for widgets.

use serde::{Deserialize, Serialize};

use crate::config::GenOptions;
use crate::normalize::NormalizedClass;
use crate::plan::pascal_case;
use crate::raw::Parameter;
use crate::registry::{GraphIndex, WidgetIndex};

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMeta {
    pub class_name: String,
    pub namespace: String,
    /// Display identifier for the declarative element tree.
    pub jsx_name: String,
    /// Writable widget-typed child-placement properties, own declarations
    /// only. The generic singular "child" property is handled by the
    /// universal single-child mechanism and never appears here.
    pub slots: Vec<String>,
    pub prop_names: Vec<String>,
    pub signal_names: Vec<String>,
    pub parent_class_name: Option<String>,
    pub parent_namespace: Option<String>,
    pub constructor_params: Vec<Parameter>,
    pub hidden_prop_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerMeta {
    pub class_name: String,
    pub namespace: String,
    pub jsx_name: String,
    pub prop_names: Vec<String>,
    pub signal_names: Vec<String>,
    pub parent_class_name: Option<String>,
    pub parent_namespace: Option<String>,
    pub constructor_params: Vec<Parameter>,
    pub hidden_prop_names: Vec<String>,
}

/// Classifier verdict for one class. Never both widget and controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Widget(WidgetMeta),
    Controller(ControllerMeta),
    Plain,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn classify_class(
    cls: &NormalizedClass,
    index: &GraphIndex,
    widgets: &WidgetIndex,
    opts: &GenOptions,
) -> Classification {
    let denylisted = opts.controller_denylist.contains(&cls.name);
    let is_controller = !denylisted
        && (cls.qualified_name == opts.controller_root
            || index.is_subclass_of(cls, &opts.controller_root));
    if is_controller {
        return Classification::Controller(ControllerMeta {
            class_name: cls.name.clone(),
            namespace: cls.qualified_name.namespace.clone(),
            jsx_name: pascal_case(&cls.name),
            prop_names: cls.properties.iter().map(|p| p.name.clone()).collect(),
            signal_names: cls.signals.iter().map(|s| s.name.clone()).collect(),
            parent_class_name: cls.parent.as_ref().map(|p| p.name.clone()),
            parent_namespace: cls.parent.as_ref().map(|p| p.namespace.clone()),
            constructor_params: vec![],
            hidden_prop_names: vec![],
        });
    }

    if index.is_subclass_of(cls, &opts.widget_root) {
        return Classification::Widget(WidgetMeta {
            class_name: cls.name.clone(),
            namespace: cls.qualified_name.namespace.clone(),
            jsx_name: pascal_case(&cls.name),
            slots: detect_slots(cls, widgets),
            prop_names: cls.properties.iter().map(|p| p.name.clone()).collect(),
            signal_names: cls.signals.iter().map(|s| s.name.clone()).collect(),
            parent_class_name: cls.parent.as_ref().map(|p| p.name.clone()),
            parent_namespace: cls.parent.as_ref().map(|p| p.namespace.clone()),
            constructor_params: vec![],
            hidden_prop_names: vec![],
        });
    }

    Classification::Plain
}

/// Slot detection: own declared writable properties whose resolved type
/// places a widget, minus the generic singular "child".
fn detect_slots(cls: &NormalizedClass, widgets: &WidgetIndex) -> Vec<String> {
    cls.properties
        .iter()
        .filter(|p| p.writable)
        .filter(|p| p.name != "child")
        .filter(|p| !p.ty.is_array && widgets.is_widget_type(&p.ty.name))
        .map(|p| p.name.clone())
        .collect()
}
