//! End-to-End Pipeline Tests
//!
//! These tests drive the whole pipeline — normalize, classify, plan,
//! assemble — over a miniature two-namespace library and verify the
//! cross-stage invariants:
//! - every qualified name has exactly one separator and a known namespace
//! - implements order decides interface merge winners
//! - rename bookkeeping is keyed by native identifier
//! - excluded classes stay visible in the generation report
//! - two identical runs produce identical output

#[cfg(test)]
mod tests {
    use crate::assemble::plan_library;
    use crate::config::GenOptions;
    use crate::raw::{
        Method, Parameter, Property, RawClass, RawInterface, RawNamespace, Signal, SignalWhen,
        TypeRef,
    };

    fn method(name: &str, c_identifier: &str) -> Method {
        Method {
            name: name.to_string(),
            c_identifier: c_identifier.to_string(),
            return_type: None,
            parameters: vec![],
            throws: false,
            doc: None,
        }
    }

    fn param(name: &str, ty: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            ty: TypeRef::named(ty),
            doc: None,
        }
    }

    fn property(name: &str, ty: &str, writable: bool) -> Property {
        Property {
            name: name.to_string(),
            ty: TypeRef::named(ty),
            readable: true,
            writable,
            construct_only: false,
            has_default: false,
            getter: None,
            setter: None,
            doc: None,
        }
    }

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

    fn interface(name: &str, methods: Vec<Method>) -> RawInterface {
        RawInterface {
            name: name.to_string(),
            prerequisites: vec![],
            methods,
            properties: vec![],
            signals: vec![],
            doc: None,
        }
    }

    fn namespace(name: &str) -> RawNamespace {
        RawNamespace {
            name: name.to_string(),
            version: "4.0".to_string(),
            shared_library: None,
            c_identifier_prefix: None,
            classes: vec![],
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

    /// A miniature GObject + Gtk library exercising every pipeline stage.
    fn mini_library() -> Vec<RawNamespace> {
        let mut gobject = namespace("GObject");
        gobject.version = "2.0".to_string();
        let mut object = class("Object", None);
        object.methods = vec![
            method("notify", "g_object_notify"),
            method("connect", "g_object_connect"),
        ];
        gobject.classes = vec![object];

        let mut gtk = namespace("Gtk");
        gtk.interfaces = vec![
            interface("Buildable", vec![method("get_name", "gtk_buildable_get_name")]),
            interface("Accessible", vec![method("get_name", "gtk_accessible_get_name")]),
        ];

        // Widget: bare "Object" parent only resolvable in GObject.
        let mut widget = class("Widget", Some("Object"));
        widget.methods = vec![
            method("show", "gtk_widget_show"),
            method("measure", "gtk_widget_measure"),
        ];
        widget.properties = vec![property("visible", "gboolean", true)];

        // Button: shadows an inherited method, declares connect, carries
        // signals and a main constructor plus a factory.
        let mut button = class("Button", Some("Widget"));
        button.implements = vec!["Buildable".to_string(), "Accessible".to_string()];
        button.methods = vec![
            method("show", "gtk_button_show"),
            method("connect", "gtk_button_connect"),
            method("get_label", "gtk_button_get_label"),
        ];
        button.constructors = vec![
            method("new", "gtk_button_new"),
            {
                let mut m = method("new_with_label", "gtk_button_new_with_label");
                m.parameters = vec![param("label", "utf8")];
                m
            },
        ];
        button.properties = vec![property("label", "utf8", true)];
        button.signals = vec![Signal {
            name: "clicked".to_string(),
            when: SignalWhen::Last,
            return_type: None,
            parameters: vec![],
            doc: None,
        }];

        let mut paned = class("Paned", Some("Widget"));
        paned.properties = vec![
            property("start-child", "Widget", true),
            property("end-child", "Widget", true),
            property("child", "Widget", true),
            property("position", "gint", true),
        ];

        let controller = class("EventController", Some("GObject.Object"));
        let key = class("EventControllerKey", Some("EventController"));

        gtk.classes = vec![widget, button, paned, controller, key];
        vec![gobject, gtk]
    }

    #[test]
    fn test_qualified_names_cover_known_namespaces() {
        let plan = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        for ns in plan.namespaces.values() {
            for cls in ns.classes.values() {
                let qualified = cls.qualified_name.to_string();
                assert_eq!(qualified.matches('.').count(), 1, "{}", qualified);
                assert!(plan.namespaces.contains_key(&cls.qualified_name.namespace));
                if let Some(parent) = &cls.parent {
                    assert!(plan.namespaces.contains_key(&parent.namespace));
                }
            }
        }
    }

    #[test]
    fn test_cross_namespace_parent_resolution() {
        let plan = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        let widget = &plan.namespaces["Gtk"].classes["Widget"];
        assert_eq!(widget.parent.as_ref().unwrap().to_string(), "GObject.Object");
        let button = &plan.namespaces["Gtk"].classes["Button"];
        assert_eq!(button.parent.as_ref().unwrap().to_string(), "Gtk.Widget");
    }

    #[test]
    fn test_implements_resolved_in_order() {
        let plan = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        let button = &plan.namespaces["Gtk"].classes["Button"];
        let implements: Vec<String> =
            button.implements.iter().map(|qn| qn.to_string()).collect();
        assert_eq!(implements, vec!["Gtk.Buildable", "Gtk.Accessible"]);
    }

    #[test]
    fn test_button_member_plan() {
        let plan = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        let button = plan
            .classes
            .iter()
            .find(|c| c.class_name == "Button")
            .unwrap();

        // show shadows Gtk.Widget.show, connect shadows the universal
        // connect operation; both renamed, keyed by native identifier.
        assert_eq!(
            button.plan.renames.get("gtk_button_show").map(String::as_str),
            Some("ButtonShow")
        );
        assert_eq!(
            button.plan.renames.get("gtk_button_connect").map(String::as_str),
            Some("ButtonConnect")
        );
        assert!(!button.plan.renames.contains_key("gtk_button_get_label"));

        // Buildable wins get_name; Accessible's merge is renamed.
        assert!(!button.plan.renames.contains_key("gtk_buildable_get_name"));
        assert_eq!(
            button
                .plan
                .renames
                .get("gtk_accessible_get_name")
                .map(String::as_str),
            Some("AccessibleGetName")
        );
        let merged_count = button
            .plan
            .methods
            .iter()
            .filter(|m| m.name == "get_name")
            .count();
        assert_eq!(merged_count, 2);

        assert_eq!(button.plan.main_constructor.as_ref().unwrap().name, "new");
        assert_eq!(button.plan.factories.len(), 1);
        assert_eq!(button.plan.factories[0].name, "new_with_label");
    }

    #[test]
    fn test_widget_and_controller_metadata() {
        let plan = plan_library(&mini_library(), &GenOptions::default()).unwrap();

        let paned = plan.classes.iter().find(|c| c.class_name == "Paned").unwrap();
        let meta = paned.widget.as_ref().unwrap();
        assert_eq!(meta.slots, vec!["start-child", "end-child"]);
        assert_eq!(meta.namespace, "Gtk");
        assert_eq!(meta.parent_class_name.as_deref(), Some("Widget"));

        let key = plan
            .classes
            .iter()
            .find(|c| c.class_name == "EventControllerKey")
            .unwrap();
        assert!(key.controller.is_some());
        assert!(key.widget.is_none());

        // The controller root itself classifies too.
        let root = plan
            .classes
            .iter()
            .find(|c| c.class_name == "EventController")
            .unwrap();
        assert!(root.controller.is_some());

        assert_eq!(plan.report.widgets, 2); // Button, Paned
        assert_eq!(plan.report.controllers, 2);
        assert_eq!(plan.report.excluded.len(), 0);
        assert_eq!(plan.report.generated, plan.report.total_classes);
    }

    #[test]
    fn test_run_is_deterministic() {
        let first = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        let second = plan_library(&mini_library(), &GenOptions::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_dump_json_round_trip_through_pipeline() {
        let dump = r#"{
            "name": "Gtk",
            "version": "4.0",
            "classes": [
                {"name": "Widget"},
                {
                    "name": "Button",
                    "parent": "Widget",
                    "methods": [
                        {"name": "get_label", "cIdentifier": "gtk_button_get_label",
                         "returnType": {"name": "utf8"}}
                    ],
                    "properties": [
                        {"name": "label", "type": {"name": "utf8"}, "writable": true}
                    ]
                }
            ]
        }"#;
        let ns: RawNamespace = serde_json::from_str(dump).unwrap();
        let plan = plan_library(&[ns], &GenOptions::default()).unwrap();
        let button = &plan.namespaces["Gtk"].classes["Button"];
        assert_eq!(button.parent.as_ref().unwrap().to_string(), "Gtk.Widget");
        assert_eq!(
            button.methods[0].return_type.as_ref().unwrap().name,
            "utf8"
        );
    }
}
