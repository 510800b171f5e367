//! Generation Configuration
//!
//! External, read-only inputs for a run: the widget and event-controller
//! root types, the controller denylist, the hidden-property lookup, and
//! the async pairing rule. Defaults target the common platform stack but
//! everything here is plain data supplied by the host tool.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::raw::QualifiedName;

// ═══════════════════════════════════════════════════════════════════════════════
// INTRINSIC TYPES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    /// Intrinsic introspection type names. These never carry a namespace
    /// and are never looked up in the graph.
    static ref INTRINSIC_TYPES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("none");
        s.insert("gboolean");
        s.insert("gchar");
        s.insert("guchar");
        s.insert("gshort");
        s.insert("gushort");
        s.insert("gint");
        s.insert("guint");
        s.insert("glong");
        s.insert("gulong");
        s.insert("gint8");
        s.insert("guint8");
        s.insert("gint16");
        s.insert("guint16");
        s.insert("gint32");
        s.insert("guint32");
        s.insert("gint64");
        s.insert("guint64");
        s.insert("gfloat");
        s.insert("gdouble");
        s.insert("gsize");
        s.insert("gssize");
        s.insert("gintptr");
        s.insert("guintptr");
        s.insert("gpointer");
        s.insert("gconstpointer");
        s.insert("gunichar");
        s.insert("gunichar2");
        s.insert("utf8");
        s.insert("filename");
        s.insert("va_list");
        s
    };

    /// Class names that must never classify as event controllers, no
    /// matter what their ancestry says. Extension point; currently empty.
    static ref CONTROLLER_DENYLIST: HashSet<&'static str> = HashSet::new();
}

pub fn is_intrinsic(name: &str) -> bool {
    INTRINSIC_TYPES.contains(name)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASYNC PAIRING RULE
// ═══════════════════════════════════════════════════════════════════════════════

/// Matching rule for begin/finish async pairs. The begin method's final
/// parameter is typed as `callback_type`; the finish method accepts a
/// parameter typed as `result_type` and its name derives from the begin
/// name by swapping `async_suffix` for `finish_suffix`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncPairRule {
    pub callback_type: String,
    pub result_type: String,
    pub async_suffix: String,
    pub finish_suffix: String,
}

impl Default for AsyncPairRule {
    fn default() -> Self {
        AsyncPairRule {
            callback_type: "Gio.AsyncReadyCallback".to_string(),
            result_type: "Gio.AsyncResult".to_string(),
            async_suffix: "_async".to_string(),
            finish_suffix: "_finish".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenOptions {
    pub widget_root: QualifiedName,
    pub controller_root: QualifiedName,
    pub controller_denylist: HashSet<String>,
    /// Class name -> property names hidden from the generated surface.
    /// Applied verbatim by the assembler.
    pub hidden_props: HashMap<String, Vec<String>>,
    pub async_rule: AsyncPairRule,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            widget_root: QualifiedName::new("Gtk", "Widget"),
            controller_root: QualifiedName::new("Gtk", "EventController"),
            controller_denylist: CONTROLLER_DENYLIST.iter().map(|s| s.to_string()).collect(),
            hidden_props: HashMap::new(),
            async_rule: AsyncPairRule::default(),
        }
    }
}
