// Reconciliation engine: classify freshly parsed records against the store.
//
// Classification is pure — one fresh record plus the stored row (if any)
// yields exactly one action. Absent and present-with-value differ: a lift
// going from 120 to None is a change and must be written.

use anyhow::Result;
use serde::Serialize;

use crate::record::{CanonicalRecord, Lift, RecordKey};

// ============================================================================
// ACTIONS
// ============================================================================

/// One field-level difference between the stored and fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: Option<u32>,
    pub new: Option<u32>,
}

impl FieldChange {
    pub fn describe(&self) -> String {
        let fmt = |v: Option<u32>| match v {
            Some(kg) => format!("{}kg", kg),
            None => "None".to_string(),
        };
        format!("{}: {} -> {}", self.field, fmt(self.old), fmt(self.new))
    }
}

/// What to do with one fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecordAction {
    /// No stored row for this key.
    Insert,

    /// Stored row exists and at least one lift field differs.
    Update {
        id: String,
        changes: Vec<FieldChange>,
    },

    /// Stored row exists and every lift field matches.
    Unchanged,
}

impl RecordAction {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, RecordAction::Unchanged)
    }
}

/// A stored row: the canonical record plus its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub record: CanonicalRecord,
}

// ============================================================================
// LOOKUP SEAM
// ============================================================================

/// Store-side lookup by natural key. The engine only ever reads through
/// this trait, so classification is testable against an in-memory map.
pub trait RecordLookup {
    fn find(&self, key: &RecordKey) -> Result<Option<StoredRecord>>;
}

// ============================================================================
// ENGINE
// ============================================================================

/// Classify one fresh record against its stored counterpart.
pub fn classify(fresh: &CanonicalRecord, stored: Option<&StoredRecord>) -> RecordAction {
    let Some(stored) = stored else {
        return RecordAction::Insert;
    };

    let changes: Vec<FieldChange> = Lift::ALL
        .iter()
        .filter_map(|&lift| {
            let old = stored.record.lift(lift);
            let new = fresh.lift(lift);
            (old != new).then(|| FieldChange {
                field: lift.field_name(),
                old,
                new,
            })
        })
        .collect();

    if changes.is_empty() {
        RecordAction::Unchanged
    } else {
        RecordAction::Update {
            id: stored.id.clone(),
            changes,
        }
    }
}

/// One classified record, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub record: CanonicalRecord,
    pub action: RecordAction,
}

/// The full classification of one run, before anything is written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationPlan {
    pub actions: Vec<PlannedAction>,
}

impl ReconciliationPlan {
    pub fn inserts(&self) -> impl Iterator<Item = &PlannedAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a.action, RecordAction::Insert))
    }

    pub fn updates(&self) -> impl Iterator<Item = &PlannedAction> {
        self.actions
            .iter()
            .filter(|a| matches!(a.action, RecordAction::Update { .. }))
    }

    pub fn insert_count(&self) -> usize {
        self.inserts().count()
    }

    pub fn update_count(&self) -> usize {
        self.updates().count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| a.action.is_unchanged())
            .count()
    }

    pub fn has_changes(&self) -> bool {
        self.insert_count() > 0 || self.update_count() > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} to insert, {} to update, {} unchanged",
            self.insert_count(),
            self.update_count(),
            self.unchanged_count()
        )
    }
}

pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        ReconciliationEngine
    }

    /// Classify every fresh record against the store. Reads only; applying
    /// the plan is the caller's decision (dry runs stop here).
    pub fn plan(
        &self,
        records: &[CanonicalRecord],
        lookup: &impl RecordLookup,
    ) -> Result<ReconciliationPlan> {
        let mut actions = Vec::with_capacity(records.len());

        for record in records {
            let stored = lookup.find(&record.key())?;
            actions.push(PlannedAction {
                record: record.clone(),
                action: classify(record, stored.as_ref()),
            });
        }

        Ok(ReconciliationPlan { actions })
    }
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
