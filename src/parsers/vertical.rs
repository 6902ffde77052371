// Vertical single-column family.
//
// One tab per (base age, gender). A linear scan down the rows tracks the
// current age subdivision, the current weight class, and the three pending
// lift values. "Total" commits the block; a new weight-class row flushes a
// block that never saw its Total; subdivision rows reset the weight class.
//
// The scan state is an explicit struct stepped row by row so the transition
// table is testable without any I/O.

use log::debug;

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{
    find_age_range, find_kg_number, normalize_weight_class, parse_age_subdivision,
    parse_lift_value, BaseAge,
};
use crate::record::{CanonicalRecord, Gender, Lift};

/// Parser for vertical-scan tabs (e.g. "Youth Women", "Masters Men").
pub struct VerticalParser {
    pub wso: String,
    pub gender: Gender,
    pub base_age: BaseAge,
    /// Column holding the kg value on Snatch/C&J/Total rows.
    pub value_col: usize,
}

impl VerticalParser {
    pub fn new(wso: impl Into<String>, gender: Gender, base_age: BaseAge) -> Self {
        VerticalParser {
            wso: wso.into(),
            gender,
            base_age,
            value_col: 3,
        }
    }

    pub fn with_value_col(mut self, col: usize) -> Self {
        self.value_col = col;
        self
    }
}

impl LayoutParser for VerticalParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();
        let mut state = ScanState::new(self.base_age, self.value_col);

        for (i, row) in grid.iter().enumerate() {
            let first = cell(row, 0);
            if first.is_empty() {
                continue;
            }

            // Some sheets open with a merged banner row ("... Lift 13 and
            // Under 36 kg") that carries the first subdivision and weight
            // class inline.
            if i == 0 && first.to_lowercase().contains("lift") {
                state.seed_from_banner(first);
                continue;
            }

            if let Some(done) = state.step(row) {
                records.push(done.into_record(&self.wso, self.gender));
            }
        }

        if let Some(done) = state.finish() {
            records.push(done.into_record(&self.wso, self.gender));
        }

        records
    }

    fn layout(&self) -> Layout {
        Layout::Vertical
    }
}

/// A committed weight-class block, ready to become a record.
#[derive(Debug, PartialEq, Eq)]
struct Block {
    age_category: String,
    weight_class: String,
    snatch: Option<u32>,
    cj: Option<u32>,
    total: Option<u32>,
}

impl Block {
    fn into_record(self, wso: &str, gender: Gender) -> CanonicalRecord {
        let mut rec = CanonicalRecord::new(wso, self.age_category, gender, self.weight_class);
        rec.snatch_record = self.snatch;
        rec.cj_record = self.cj;
        rec.total_record = self.total;
        rec
    }
}

/// Row-by-row scan state for the vertical family.
struct ScanState {
    base_age: BaseAge,
    value_col: usize,
    age_subdivision: Option<String>,
    weight_class: Option<String>,
    snatch: Option<u32>,
    cj: Option<u32>,
    total: Option<u32>,
}

impl ScanState {
    fn new(base_age: BaseAge, value_col: usize) -> Self {
        ScanState {
            base_age,
            value_col,
            // Junior/Senior tabs have no subdivision rows; the base category
            // is the final one.
            age_subdivision: base_age.fixed_category().map(String::from),
            weight_class: None,
            snatch: None,
            cj: None,
            total: None,
        }
    }

    /// Apply one row. Returns a completed block when this row commits or
    /// flushes one.
    ///
    /// Transition precedence: lift row, then weight-class row, then
    /// age-subdivision candidate, then noise.
    fn step(&mut self, row: &[String]) -> Option<Block> {
        let first = cell(row, 0);
        let second = cell(row, 1);

        // 1. Lift row: store the value; Total commits the block.
        if let Some(lift) = Lift::from_label(first) {
            let value = parse_lift_value(cell(row, self.value_col));
            match lift {
                Lift::Snatch => self.snatch = value,
                Lift::CleanJerk => self.cj = value,
                Lift::Total => {
                    self.total = value;
                    return self.take_block();
                }
            }
            return None;
        }

        // 2. Weight-class row: flush any block that never saw its Total,
        // then start the new class.
        if first.to_lowercase().contains("kg") {
            let flushed = self.take_block();
            self.weight_class = normalize_weight_class(first);
            if self.weight_class.is_none() {
                debug!("vertical: unparseable weight class cell {:?}", first);
            }
            return flushed;
        }

        // 3. Age-subdivision candidate: text in the first column with an
        // empty second column. Only commit when the parser transformed it —
        // raw junk comes back unchanged.
        if second.is_empty() {
            let parsed = parse_age_subdivision(first, self.base_age);
            if parsed != first && parsed != "Total" {
                self.age_subdivision = Some(parsed);
                self.weight_class = None;
                self.clear_lifts();
            }
            return None;
        }

        // 4. Header/noise row.
        None
    }

    /// Flush the trailing in-progress block at end of input.
    fn finish(mut self) -> Option<Block> {
        self.take_block()
    }

    /// Seed state from a merged first-row banner ("... Lift 13 and Under
    /// 36 kg", "... Lift 35 - 39 48 kg").
    fn seed_from_banner(&mut self, text: &str) {
        let lower = text.to_lowercase();

        if let Some(head) = lower.split("and under").next() {
            if lower.contains("and under") {
                if let Some(age) = head
                    .split_whitespace()
                    .rev()
                    .find(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_digit()))
                {
                    self.age_subdivision = Some(format!("U{}", age));
                }
            }
        }

        if let Some((low, high)) = find_age_range(text) {
            // Masters bands start at 35; anything lower is a youth range.
            self.age_subdivision = Some(if low >= 35 {
                format!("Masters {}", low)
            } else {
                format!("U{}", high)
            });
        }

        if let Some(weight) = find_kg_number(text) {
            self.weight_class = Some(weight);
        }
    }

    /// Emit the current block if both the weight class and the subdivision
    /// are known, then clear the per-class state. The subdivision persists —
    /// it only changes on an explicit subdivision row.
    fn take_block(&mut self) -> Option<Block> {
        let block = match (self.weight_class.take(), self.age_subdivision.as_ref()) {
            (Some(weight_class), Some(age)) => Some(Block {
                age_category: age.clone(),
                weight_class,
                snatch: self.snatch,
                cj: self.cj,
                total: self.total,
            }),
            _ => None,
        };
        self.clear_lifts();
        block
    }

    fn clear_lifts(&mut self) {
        self.snatch = None;
        self.cj = None;
        self.total = None;
    }
}

// ============================================================================
// TESTS
// ============================================================================
