// Flat family: one physical row per lift measurement, with explicit key
// columns resolved from a header row (ageGroup, gender, bodyWeightMin,
// bodyWeightMax, lift, record). Three rows share a (age, gender, class) key,
// so parsing is a group-by rather than a positional scan.

use std::collections::BTreeMap;

use log::warn;

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{is_adaptive, normalize_flat_age_group, parse_lift_value};
use crate::record::{CanonicalRecord, Gender, Lift};

pub struct FlatParser {
    pub wso: String,
}

impl FlatParser {
    pub fn new(wso: impl Into<String>) -> Self {
        FlatParser { wso: wso.into() }
    }
}

/// Header column positions, resolved by name so column reordering in the
/// source sheet stays harmless.
struct Columns {
    age_group: usize,
    gender: usize,
    weight_min: usize,
    weight_max: usize,
    lift: usize,
    record: usize,
}

impl Columns {
    fn resolve(header: &[String]) -> Option<Columns> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
        };
        Some(Columns {
            age_group: find("ageGroup")?,
            gender: find("gender")?,
            weight_min: find("bodyWeightMin")?,
            weight_max: find("bodyWeightMax")?,
            lift: find("lift")?,
            record: find("record")?,
        })
    }
}

/// Derive the canonical weight class from the min/max bound pair.
///
/// An empty max with a populated min means "heavier than min" (the open top
/// class); a max spelled ">N" means the same; otherwise max is the class.
fn derive_weight_class(min: &str, max: &str) -> Option<String> {
    if max.is_empty() {
        if min.is_empty() {
            return None;
        }
        return Some(format!("{}+", min));
    }
    if let Some(stripped) = max.strip_prefix('>') {
        return Some(format!("{}+", stripped.trim()));
    }
    Some(max.to_string())
}

impl LayoutParser for FlatParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let Some(header) = grid.first() else {
            return Vec::new();
        };
        let Some(cols) = Columns::resolve(header) else {
            warn!("flat: header row missing expected columns, skipping sheet");
            return Vec::new();
        };

        // BTreeMap keeps output ordered by key, so repeated runs over the
        // same sheet produce identical record sequences.
        let mut grouped: BTreeMap<(String, Gender, String), [Option<u32>; 3]> = BTreeMap::new();

        for row in grid.iter().skip(1) {
            let age_raw = cell(row, cols.age_group);
            let Some(gender) = Gender::from_code(cell(row, cols.gender)) else {
                continue;
            };
            if age_raw.is_empty() {
                continue;
            }

            // Shorthand expansion must run before the adaptive check so
            // "M40 ADAP" is recognized through its normalized form.
            let age_group = normalize_flat_age_group(age_raw);
            if is_adaptive(&age_group) {
                continue;
            }

            let Some(weight_class) =
                derive_weight_class(cell(row, cols.weight_min), cell(row, cols.weight_max))
            else {
                continue;
            };

            let Some(lift) = Lift::from_label(cell(row, cols.lift)) else {
                continue;
            };
            let value = parse_lift_value(cell(row, cols.record));

            let slot = grouped
                .entry((age_group, gender, weight_class))
                .or_default();
            slot[lift as usize] = value;
        }

        grouped
            .into_iter()
            .map(|((age_category, gender, weight_class), lifts)| {
                let mut rec =
                    CanonicalRecord::new(&self.wso, age_category, gender, weight_class);
                rec.snatch_record = lifts[Lift::Snatch as usize];
                rec.cj_record = lifts[Lift::CleanJerk as usize];
                rec.total_record = lifts[Lift::Total as usize];
                rec
            })
            .collect()
    }

    fn layout(&self) -> Layout {
        Layout::Flat
    }
}

// ============================================================================
// TESTS
// ============================================================================
