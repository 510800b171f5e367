//! Metadata Assembler Module
//!
//! Pure combination step plus the run driver: merges classifier output
//! with planner output into one descriptor per class, applies the
//! hidden-property lookup verbatim, and accounts for excluded classes in
//! the generation report. No new decisions are made here.
//!
//! Normalization must complete for every namespace before any class is
//! assembled; after that the per-class work is embarrassingly parallel
//! over read-only state.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classify::{classify_class, Classification, ControllerMeta, WidgetMeta};
use crate::config::GenOptions;
use crate::normalize::{normalize_all, NormalizedClass, NormalizedNamespace, ResolutionError};
use crate::plan::{plan_members, MemberPlan};
use crate::raw::RawNamespace;
use crate::registry::{GraphIndex, WidgetIndex};

// ═══════════════════════════════════════════════════════════════════════════════
// EXCLUSION REASONS
// ═══════════════════════════════════════════════════════════════════════════════

pub const EXCLUDED_UNSUPPORTED_CONSTRUCTORS: &str = "unsupported-constructor-callbacks";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// The complete per-class descriptor handed to downstream emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassMetadata {
    pub class_name: String,
    pub namespace: String,
    pub parent_class_name: Option<String>,
    pub parent_namespace: Option<String>,
    pub widget: Option<WidgetMeta>,
    pub controller: Option<ControllerMeta>,
    pub plan: MemberPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionRecord {
    pub class: String,
    pub reason: String,
}

/// Run-level accounting. Per-class exclusions are expected, frequent
/// conditions and never abort the run; this is where they stay visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub total_classes: usize,
    pub generated: usize,
    pub widgets: usize,
    pub controllers: usize,
    pub excluded: Vec<ExclusionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPlan {
    pub namespaces: BTreeMap<String, NormalizedNamespace>,
    pub classes: Vec<ClassMetadata>,
    pub report: GenerationReport,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSEMBLY
// ═══════════════════════════════════════════════════════════════════════════════

fn assemble_class(
    cls: &NormalizedClass,
    index: &GraphIndex,
    widgets: &WidgetIndex,
    opts: &GenOptions,
) -> Result<ClassMetadata, ExclusionRecord> {
    let plan = plan_members(cls, index, opts);
    if !plan.generatable {
        return Err(ExclusionRecord {
            class: cls.qualified_name.to_string(),
            reason: EXCLUDED_UNSUPPORTED_CONSTRUCTORS.to_string(),
        });
    }

    let hidden = opts.hidden_props.get(&cls.name).cloned().unwrap_or_default();
    let constructor_params = plan
        .main_constructor
        .as_ref()
        .map(|c| c.parameters.clone())
        .unwrap_or_default();

    let mut widget = None;
    let mut controller = None;
    match classify_class(cls, index, widgets, opts) {
        Classification::Widget(mut meta) => {
            meta.constructor_params = constructor_params;
            meta.hidden_prop_names = hidden;
            widget = Some(meta);
        }
        Classification::Controller(mut meta) => {
            meta.constructor_params = constructor_params;
            meta.hidden_prop_names = hidden;
            controller = Some(meta);
        }
        Classification::Plain => {}
    }

    Ok(ClassMetadata {
        class_name: cls.name.clone(),
        namespace: cls.qualified_name.namespace.clone(),
        parent_class_name: cls.parent.as_ref().map(|p| p.name.clone()),
        parent_namespace: cls.parent.as_ref().map(|p| p.namespace.clone()),
        widget,
        controller,
        plan,
    })
}

/// Assemble every class of an already normalized graph. Classes iterate
/// in namespace order then simple-name order, and the parallel map keeps
/// that order, so output is deterministic.
pub fn assemble_library(
    namespaces: &BTreeMap<String, NormalizedNamespace>,
    opts: &GenOptions,
) -> (Vec<ClassMetadata>, GenerationReport) {
    let index = GraphIndex::new(namespaces);
    let widget_index = WidgetIndex::build(&index, &opts.widget_root);

    let class_refs: Vec<&NormalizedClass> = namespaces
        .values()
        .flat_map(|ns| ns.classes.values())
        .collect();
    let total_classes = class_refs.len();

    let results: Vec<Result<ClassMetadata, ExclusionRecord>> = class_refs
        .par_iter()
        .map(|cls| assemble_class(cls, &index, &widget_index, opts))
        .collect();

    let mut classes = Vec::new();
    let mut excluded = Vec::new();
    let mut widgets = 0;
    let mut controllers = 0;
    for result in results {
        match result {
            Ok(meta) => {
                if meta.widget.is_some() {
                    widgets += 1;
                }
                if meta.controller.is_some() {
                    controllers += 1;
                }
                classes.push(meta);
            }
            Err(record) => excluded.push(record),
        }
    }

    let report = GenerationReport {
        total_classes,
        generated: classes.len(),
        widgets,
        controllers,
        excluded,
    };
    (classes, report)
}

/// Full pipeline: normalize every namespace, then classify, plan, and
/// assemble every class. A `ResolutionError` aborts the whole run — a
/// partially resolved graph cannot safely support any class's planning.
pub fn plan_library(raw: &[RawNamespace], opts: &GenOptions) -> Result<LibraryPlan, ResolutionError> {
    let namespaces = normalize_all(raw)?;
    let (classes, report) = assemble_library(&namespaces, opts);
    Ok(LibraryPlan {
        namespaces,
        classes,
        report,
    })
}
