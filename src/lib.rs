//! # Introspection Codegen Core
//!
//! Normalizes a raw introspection graph (one `RawNamespace` per library
//! namespace) into a fully cross-resolved type graph, then plans the
//! constructible surface of every class: constructors, methods, statics,
//! signals, and properties, with inherited/interface naming conflicts
//! pre-resolved and cross-namespace type references fully qualified.
//!
//! ## Pipeline Invariants
//!
//! 1. **Qualified Names**: every normalized entity is addressed as
//!    `Namespace.Name` with exactly one separator. Bare references are
//!    sugar for the declaring namespace and never survive normalization.
//!
//! 2. **Ordering**: normalization completes for ALL namespaces before any
//!    class is classified or planned. Cross-namespace ancestor walks
//!    require the full resolved graph.
//!
//! 3. **Immutability**: classifier and planner only read the normalized
//!    graph. Decisions are separate records; no entity is ever mutated or
//!    deleted. A run is a pure function from raw graph to metadata set.
//!
//! 4. **Rename Keys**: rename bookkeeping is keyed by the method's stable
//!    native `c_identifier`, never by its display name.
//!
//! 5. **Merge Order**: interfaces merge in declaration order; the first
//!    interface to contribute a method name wins the bare name, later
//!    ones are renamed `<InterfaceName><PascalCase(method)>`.
//!
//! 6. **Failure Split**: an unresolvable reference during normalization
//!    is fatal for the run. Per-class conditions (unsupported constructor
//!    shapes, unresolvable interfaces, name collisions) never abort: they
//!    exclude, skip, or rename, and stay visible in the generation report.

mod assemble;
mod cache;
mod classify;
mod config;
mod discovery;
mod normalize;
mod plan;
mod raw;
mod registry;

#[cfg(test)]
mod pipeline_tests;

pub use assemble::{
    assemble_library, plan_library, ClassMetadata, ExclusionRecord, GenerationReport, LibraryPlan,
    EXCLUDED_UNSUPPORTED_CONSTRUCTORS,
};
pub use cache::NormalizeCache;
pub use classify::{classify_class, Classification, ControllerMeta, WidgetMeta};
pub use config::{is_intrinsic, AsyncPairRule, GenOptions};
pub use discovery::discover_namespaces;
pub use normalize::{
    normalize_all, normalize_namespace, EntityKind, NormalizedAlias, NormalizedCallback,
    NormalizedClass, NormalizedConstant, NormalizedEnumeration, NormalizedFunction,
    NormalizedInterface, NormalizedNamespace, NormalizedRecord, RawGraph, ResolutionError,
    ERR_UNKNOWN_NAMESPACE, ERR_UNRESOLVED_REFERENCE,
};
pub use plan::{plan_members, MemberPlan};
pub use raw::{
    EnumMember, Field, Method, Parameter, Property, QualifiedName, RawAlias, RawCallback,
    RawClass, RawConstant, RawEnumeration, RawInterface, RawNamespace, RawRecord, Signal,
    SignalWhen, TypeRef,
};
pub use registry::{GraphIndex, WidgetIndex};
