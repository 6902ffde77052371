// WSO Records - Core Library
// Ingests regional weightlifting record sheets in their many layouts,
// normalizes them into one canonical schema, and reconciles the result
// against the persistent store.

pub mod config;
pub mod consolidate;
pub mod fetch;
pub mod grid;
pub mod normalize;
pub mod notify;
pub mod parsers;
pub mod reconcile;
pub mod record;
pub mod regions;
pub mod run;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use consolidate::consolidate;
pub use grid::{grid_from_csv, Grid};
pub use normalize::{
    normalize_flat_age_group, normalize_weight_class, parse_age_subdivision, parse_lift_value,
    BaseAge,
};
pub use parsers::{
    DocumentParser, FlatParser, HorizontalParser, Layout, LayoutParser, PairedParser,
    SideBySideParser, VerticalParser,
};
pub use reconcile::{
    classify, FieldChange, PlannedAction, ReconciliationEngine, ReconciliationPlan, RecordAction,
    RecordLookup, StoredRecord,
};
pub use record::{CanonicalRecord, Gender, Lift, RecordKey};
pub use run::{run, RunOptions};
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
