// Consolidation pass: merge records that share a natural key.
//
// Duplicate keys are legitimate — a sheet may list the same weight class in
// two sections, or two tabs may map onto one canonical category. Standing
// records only ever improve, so the merge keeps the maximum per lift field,
// with any value beating absence.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::info;

use crate::record::{CanonicalRecord, Lift, RecordKey};

/// Merge duplicate-key records by per-field maximum. Output is ordered by
/// natural key, so repeated runs produce identical sequences.
pub fn consolidate(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let input_len = records.len();
    let mut merged: BTreeMap<RecordKey, CanonicalRecord> = BTreeMap::new();

    for rec in records {
        match merged.entry(rec.key()) {
            Entry::Vacant(slot) => {
                slot.insert(rec);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                for lift in Lift::ALL {
                    // Option<u32> ordering: None loses to any value.
                    existing.set_lift(lift, existing.lift(lift).max(rec.lift(lift)));
                }
            }
        }
    }

    if merged.len() != input_len {
        info!(
            "consolidated {} records into {} (merged duplicates)",
            input_len,
            merged.len()
        );
    }

    merged.into_values().collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Gender;

    fn rec(
        age: &str,
        gender: Gender,
        class: &str,
        snatch: Option<u32>,
        cj: Option<u32>,
        total: Option<u32>,
    ) -> CanonicalRecord {
        let mut r = CanonicalRecord::new("New Jersey", age, gender, class);
        r.snatch_record = snatch;
        r.cj_record = cj;
        r.total_record = total;
        r
    }

    #[test]
    fn test_distinct_keys_pass_through() {
        let records = vec![
            rec("U13", Gender::Women, "36", Some(30), None, Some(65)),
            rec("U13", Gender::Men, "40", Some(35), Some(45), Some(80)),
        ];

        let out = consolidate(records);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_duplicates_merge_per_field_max() {
        let records = vec![
            rec("Senior", Gender::Men, "89", Some(120), Some(150), None),
            rec("Senior", Gender::Men, "89", Some(115), Some(155), Some(270)),
        ];

        let out = consolidate(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].snatch_record, Some(120));
        assert_eq!(out[0].cj_record, Some(155));
        assert_eq!(out[0].total_record, Some(270));
    }

    #[test]
    fn test_value_beats_absence() {
        let records = vec![
            rec("Masters 75", Gender::Women, "59", None, None, None),
            rec("Masters 75", Gender::Women, "59", Some(40), None, Some(90)),
        ];

        let out = consolidate(records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].snatch_record, Some(40));
        assert_eq!(out[0].cj_record, None);
        assert_eq!(out[0].total_record, Some(90));
    }

    #[test]
    fn test_output_ordered_by_key() {
        let records = vec![
            rec("U17", Gender::Men, "67", Some(90), None, None),
            rec("Junior", Gender::Women, "55", Some(60), None, None),
            rec("Junior", Gender::Men, "61", Some(95), None, None),
        ];

        let out = consolidate(records);
        let keys: Vec<String> = out.iter().map(|r| r.key().to_string()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
