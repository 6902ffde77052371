// Paired family: both genders share each physical row and every weight class
// is a single row carrying all three lifts. Women occupy the left column
// group, men the right. "Vacant" classes are kept — the row still proves the
// weight class exists, its lifts just parse to None.

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{normalize_weight_class, open_class_from, parse_lift_value};
use crate::record::{CanonicalRecord, Gender};

// Offsets within a column group, relative to the weight-class column.
const SNATCH_COL: usize = 3;
const CJ_COL: usize = 4;
const TOTAL_COL: usize = 5;

/// One gender's column group: `col` is the weight-class column.
#[derive(Debug, Clone, Copy)]
pub struct Side {
    pub gender: Gender,
    pub col: usize,
}

pub struct PairedParser {
    pub wso: String,
    pub age_category: String,
    pub sides: Vec<Side>,
}

impl PairedParser {
    pub fn new(wso: impl Into<String>, age_category: impl Into<String>) -> Self {
        PairedParser {
            wso: wso.into(),
            age_category: age_category.into(),
            sides: vec![
                Side { gender: Gender::Women, col: 1 },
                Side { gender: Gender::Men, col: 8 },
            ],
        }
    }

    /// Single-gender variant for tabs where only one column group is
    /// populated (e.g. an 80+ masters tab with men's records on the left).
    pub fn single_side(
        wso: impl Into<String>,
        age_category: impl Into<String>,
        gender: Gender,
    ) -> Self {
        PairedParser {
            wso: wso.into(),
            age_category: age_category.into(),
            sides: vec![Side { gender, col: 1 }],
        }
    }

    fn parse_side(
        &self,
        row: &[String],
        side: Side,
        last_closed: Option<&str>,
    ) -> Option<CanonicalRecord> {
        // The group's total column must physically exist; shorter rows are
        // banners or trailing junk.
        if row.len() <= side.col + TOTAL_COL {
            return None;
        }

        let raw_weight = cell(row, side.col);
        let weight_class = if raw_weight.is_empty() {
            // Open top class: blank weight cell under the last closed class.
            open_class_from(last_closed?)
        } else {
            // Non-empty but unparseable means a section label, not a class.
            normalize_weight_class(raw_weight)?
        };

        let mut rec = CanonicalRecord::new(&self.wso, &self.age_category, side.gender, weight_class);
        rec.snatch_record = parse_lift_value(cell(row, side.col + SNATCH_COL));
        rec.cj_record = parse_lift_value(cell(row, side.col + CJ_COL));
        rec.total_record = parse_lift_value(cell(row, side.col + TOTAL_COL));
        Some(rec)
    }
}

impl LayoutParser for PairedParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();
        let mut last_closed: Vec<Option<String>> = vec![None; self.sides.len()];

        // Row 0 is always the header.
        for row in grid.iter().skip(1) {
            for (s, side) in self.sides.iter().enumerate() {
                if let Some(rec) = self.parse_side(row, *side, last_closed[s].as_deref()) {
                    if !rec.weight_class.ends_with('+') {
                        last_closed[s] = Some(rec.weight_class.clone());
                    }
                    records.push(rec);
                }
            }
        }

        records
    }

    fn layout(&self) -> Layout {
        Layout::Paired
    }
}

// ============================================================================
// TESTS
// ============================================================================
