// Side-by-side family: two genders share each physical row, men on the left
// column group and women on the right. Every weight class spans three rows
// (Snatch, C&J, Total) and only the Snatch row carries the weight class cell.
//
// Each tab is a single age category, so the category comes from parser
// config rather than from the grid.

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{normalize_weight_class, open_class_from, parse_lift_value};
use crate::record::{CanonicalRecord, Gender};

// Within a gender's column group: the weight class sits at the group offset,
// the lift label at offset+1, the value at offset+2.
const LABEL_COL: usize = 1;
const VALUE_COL: usize = 2;

pub struct SideBySideParser {
    pub wso: String,
    pub age_category: String,
    /// (gender, weight-class column) per column group.
    pub gender_offsets: Vec<(Gender, usize)>,
}

impl SideBySideParser {
    pub fn new(wso: impl Into<String>, age_category: impl Into<String>) -> Self {
        SideBySideParser {
            wso: wso.into(),
            age_category: age_category.into(),
            // Men's group starts at column 0, women's at column 6.
            gender_offsets: vec![(Gender::Men, 0), (Gender::Women, 6)],
        }
    }

    /// Parse one gender's column group for the block starting at row `i`.
    /// Returns None only when the weight class cannot be established.
    fn parse_block(
        &self,
        grid: &Grid,
        i: usize,
        offset: usize,
        gender: Gender,
        last_closed: Option<&str>,
    ) -> Option<CanonicalRecord> {
        let row = &grid[i];

        // The open top class leaves its weight cell blank; synthesize it
        // from the last closed class in this column group.
        let weight_class = match normalize_weight_class(cell(row, offset)) {
            Some(wc) => wc,
            None => open_class_from(last_closed?),
        };

        let mut rec = CanonicalRecord::new(
            &self.wso,
            &self.age_category,
            gender,
            weight_class,
        );
        rec.snatch_record = parse_lift_value(cell(row, offset + VALUE_COL));

        // C&J and Total occupy the next two rows, same value column.
        if let Some(cj_row) = grid.get(i + 1) {
            rec.cj_record = parse_lift_value(cell(cj_row, offset + VALUE_COL));
        }
        if let Some(total_row) = grid.get(i + 2) {
            rec.total_record = parse_lift_value(cell(total_row, offset + VALUE_COL));
        }

        Some(rec)
    }
}

impl LayoutParser for SideBySideParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();
        // Last closed (non-"+") class per column group, for "+" synthesis.
        let mut last_closed: Vec<Option<String>> = vec![None; self.gender_offsets.len()];

        for i in 0..grid.len() {
            for (g, (gender, offset)) in self.gender_offsets.iter().enumerate() {
                // A "Snatch" label in this group's label column starts a
                // three-row weight-class block.
                if !cell(&grid[i], offset + LABEL_COL).eq_ignore_ascii_case("snatch") {
                    continue;
                }

                if let Some(rec) =
                    self.parse_block(grid, i, *offset, *gender, last_closed[g].as_deref())
                {
                    if !rec.weight_class.ends_with('+') {
                        last_closed[g] = Some(rec.weight_class.clone());
                    }
                    records.push(rec);
                }
            }
        }

        records
    }

    fn layout(&self) -> Layout {
        Layout::SideBySide
    }
}

// ============================================================================
// TESTS
// ============================================================================
