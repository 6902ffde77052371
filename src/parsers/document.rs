// Document family: table-structured document extraction (one grid per
// extracted table). Rows carry Class, Lift, Name, Representing,
// Location/Meet, Weight, Date columns. A numeric first cell opens a new
// weight-class block; section header rows ("Open Men's Records") set the
// age/gender context for everything below them.
//
// A "Standard" name with a weight value is a qualifying standard and counts
// as the record; an "Open" name means the class is unclaimed.

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{find_age_range, find_number, normalize_weight_class, parse_lift_value};
use crate::record::{CanonicalRecord, Gender, Lift};

const LIFT_COL: usize = 1;
const NAME_COL: usize = 2;
const VALUE_COL: usize = 5;

pub struct DocumentParser {
    pub wso: String,
}

impl DocumentParser {
    pub fn new(wso: impl Into<String>) -> Self {
        DocumentParser { wso: wso.into() }
    }
}

/// Parse a section header like "Open Women's Records" or
/// "Masters 35-39 Men's Records" into (age category, gender).
fn parse_section_header(text: &str) -> Option<(String, Gender)> {
    let gender = Gender::from_label(text)?;
    // Some editions write youth ranges with a slash ("Youth 16/17").
    let text = text.replace('/', "-");

    let age = if text.contains("Open") {
        "Senior".to_string()
    } else if text.contains("Junior") {
        "Junior".to_string()
    } else if text.contains("Masters") {
        let (low, _) = find_age_range(&text)?;
        format!("Masters {}", low)
    } else if let Some((_, high)) = find_age_range(&text) {
        format!("U{}", high)
    } else if text.contains("Youth") {
        // "Youth 13U" style, no range
        format!("U{}", find_number(&text)?)
    } else {
        return None;
    };

    Some((age, gender))
}

/// Contains-based lift match; document cells sometimes carry extra text
/// ("Snatch *", "Clean & Jerk").
fn lift_from_cell(text: &str) -> Option<Lift> {
    let lower = text.to_lowercase();
    if lower.contains("snatch") {
        Some(Lift::Snatch)
    } else if lower.contains("c&j") || lower.contains("clean") {
        Some(Lift::CleanJerk)
    } else if lower.contains("total") {
        Some(Lift::Total)
    } else {
        None
    }
}

impl LayoutParser for DocumentParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();

        let mut section: Option<(String, Gender)> = None;
        let mut current: Option<CanonicalRecord> = None;

        for row in grid {
            let first = cell(row, 0);

            // Section header rows set context; they carry no lift data.
            if first.contains("Records") {
                if let Some(parsed) = parse_section_header(first) {
                    section = Some(parsed);
                }
                continue;
            }

            // Column header row.
            if first == "Class" || first == "Lift" {
                continue;
            }

            // Numeric first cell opens a new weight-class block; flush the
            // previous one. Blocks outside any section are dropped.
            if !first.is_empty() {
                if let Some(weight_class) = normalize_weight_class(first) {
                    if let Some(done) = current.take() {
                        records.push(done);
                    }
                    if let Some((age, gender)) = &section {
                        current = Some(CanonicalRecord::new(
                            &self.wso,
                            age.clone(),
                            *gender,
                            weight_class,
                        ));
                    }
                }
            }

            // The class-opening row also carries its first lift, so lift
            // parsing runs for every row.
            let Some(rec) = current.as_mut() else {
                continue;
            };
            let Some(lift) = lift_from_cell(cell(row, LIFT_COL)) else {
                continue;
            };

            // Truncated extraction rows have no value column; leave whatever
            // an earlier row set for this lift.
            if row.len() <= VALUE_COL {
                continue;
            }

            // An "Open" name means the class is unclaimed regardless of
            // what the value cell says.
            let value = if cell(row, NAME_COL).eq_ignore_ascii_case("open") {
                None
            } else {
                parse_lift_value(cell(row, VALUE_COL))
            };
            rec.set_lift(lift, value);
        }

        if let Some(done) = current.take() {
            records.push(done);
        }

        records
    }

    fn layout(&self) -> Layout {
        Layout::Document
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn g(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_section_header_variants() {
        assert_eq!(
            parse_section_header("Open Men's Records"),
            Some(("Senior".to_string(), Gender::Men))
        );
        assert_eq!(
            parse_section_header("Open Women's Records"),
            Some(("Senior".to_string(), Gender::Women))
        );
        assert_eq!(
            parse_section_header("Junior Women's Records"),
            Some(("Junior".to_string(), Gender::Women))
        );
        assert_eq!(
            parse_section_header("Youth 16-17 Men's Records"),
            Some(("U17".to_string(), Gender::Men))
        );
        assert_eq!(
            parse_section_header("Youth 14/15 Women's Records"),
            Some(("U15".to_string(), Gender::Women))
        );
        assert_eq!(
            parse_section_header("Masters 35-39 Men's Records"),
            Some(("Masters 35".to_string(), Gender::Men))
        );
        assert_eq!(parse_section_header("Meet Results"), None);
    }

    #[test]
    fn test_blocks_parsed_under_section() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Open Women's Records"],
            &["Class", "Lift", "Name", "Representing", "Location", "Weight", "Date"],
            &["49", "Snatch", "A. One", "Club", "Meet", "62", "2019"],
            &["", "C&J", "A. One", "Club", "Meet", "80", "2019"],
            &["", "Total", "A. One", "Club", "Meet", "142", "2019"],
            &["55", "Snatch", "B. Two", "Club", "Meet", "70", "2021"],
            &["", "C&J", "B. Two", "Club", "Meet", "88", "2021"],
            &["", "Total", "B. Two", "Club", "Meet", "158", "2021"],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.gender == Gender::Women));
        assert!(records.iter().all(|r| r.age_category == "Senior"));
        assert_eq!(records[0].weight_class, "49");
        assert_eq!(records[0].total_record, Some(142));
        assert_eq!(records[1].weight_class, "55");
        assert_eq!(records[1].snatch_record, Some(70));
    }

    #[test]
    fn test_open_name_means_unclaimed() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Junior Men's Records"],
            &["109", "Snatch", "OPEN", "", "", "", ""],
            &["", "C&J", "C. Three", "Club", "Meet", "170", "2020"],
            &["", "Total", "Open", "", "", "300", ""],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snatch_record, None);
        assert_eq!(records[0].cj_record, Some(170));
        assert_eq!(records[0].total_record, None);
    }

    #[test]
    fn test_standard_name_with_value_counts() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Youth 14-15 Women's Records"],
            &["40", "Snatch", "Standard", "", "", "30", ""],
            &["", "C&J", "Standard", "", "", "38", ""],
            &["", "Total", "Standard", "", "", "68", ""],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age_category, "U15");
        assert_eq!(records[0].snatch_record, Some(30));
        assert_eq!(records[0].total_record, Some(68));
    }

    #[test]
    fn test_truncated_lift_row_keeps_earlier_value() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Open Men's Records"],
            &["61", "Snatch", "A. One", "Club", "Meet", "110", "2020"],
            // Re-extraction artifact: same lift, row cut before the value
            &["", "Snatch"],
            &["", "Total", "A. One", "Club", "Meet", "250", "2020"],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snatch_record, Some(110));
        assert_eq!(records[0].total_record, Some(250));
    }

    #[test]
    fn test_rows_before_any_section_dropped() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["49", "Snatch", "A", "", "", "62", ""],
            &["Open Men's Records"],
            &["55", "Snatch", "B", "", "", "100", ""],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weight_class, "55");
        assert_eq!(records[0].gender, Gender::Men);
    }

    #[test]
    fn test_plus_class_normalized() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Open Men's Records"],
            &["+109", "Snatch", "D", "", "", "150", ""],
            &["", "Total", "D", "", "", "340", ""],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].weight_class, "109+");
        assert_eq!(records[0].total_record, Some(340));
    }

    #[test]
    fn test_section_switch_flushes_block() {
        let parser = DocumentParser::new("New England");
        let grid = g(&[
            &["Open Women's Records"],
            &["87", "Snatch", "A", "", "", "95", ""],
            &["Open Men's Records"],
            &["61", "Snatch", "B", "", "", "110", ""],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].gender, Gender::Women);
        assert_eq!(records[1].gender, Gender::Men);
    }
}
