// Horizontal family: weight classes run across columns. Each section opens
// with an age/gender header row, then a weight-class row, then nine data
// rows — three (value, name, date) triples for Snatch, C&J and Total.
//
// Section headers are messy: merged cells sometimes push the age text into
// the cells right of the first one, so header parsing retries on the first
// few cells joined together.

use super::{Layout, LayoutParser};
use crate::grid::{cell, Grid};
use crate::normalize::{find_age_range, find_number, normalize_weight_class, parse_lift_value};
use crate::record::{CanonicalRecord, Gender, Lift};

// Rows from the weight-class row to the end of the section: the weight row
// itself plus three (value, name, date) triples.
const SECTION_DATA_ROWS: usize = 10;
// How many leading cells to join when the header text spans merged cells.
const HEADER_SPAN: usize = 4;

pub struct HorizontalParser {
    pub wso: String,
}

impl HorizontalParser {
    pub fn new(wso: impl Into<String>) -> Self {
        HorizontalParser { wso: wso.into() }
    }
}

/// Parse a section header like "YOUTH: MEN 13 & Under" or
/// "MASTERS: WOMEN 45-49 years old" into (age category, gender).
fn parse_section_header(text: &str) -> Option<(String, Gender)> {
    let gender = Gender::from_label(text)?;
    let upper = text.to_uppercase();

    let age = if upper.contains("UNDER") {
        format!("U{}", find_number(&upper)?)
    } else if upper.contains("SENIOR") {
        "Senior".to_string()
    } else if upper.contains("JUNIOR") {
        "Junior".to_string()
    } else if upper.contains("MASTER") {
        let (low, _) = find_age_range(&upper)?;
        format!("Masters {}", low)
    } else if let Some((_, high)) = find_age_range(&upper) {
        // Bare youth range ("14-17 YO").
        format!("U{}", high)
    } else {
        return None;
    };

    Some((age, gender))
}

/// Extract per-column weight classes from a weight row. Columns whose cell
/// is not a clean "<n> KG" / "<n>+ KG" token stay None and are skipped
/// downstream; prose containing "KG" ("13 & Under 44 KG") does not count.
fn parse_weight_columns(row: &[String]) -> Vec<Option<String>> {
    row.iter()
        .skip(1)
        .map(|c| {
            if !c.to_uppercase().contains("KG") {
                return None;
            }
            normalize_weight_class(c)
        })
        .collect()
}

impl LayoutParser for HorizontalParser {
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();

        let mut i = 0;
        while i < grid.len() {
            let row = &grid[i];
            if cell(row, 0).is_empty() {
                i += 1;
                continue;
            }

            // First cell alone, then the merged-header recovery: the age
            // text may sit in the cells to the right of the title cell.
            let header = parse_section_header(cell(row, 0)).or_else(|| {
                let joined = row
                    .iter()
                    .take(HEADER_SPAN)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                parse_section_header(&joined)
            });

            let Some((age_category, gender)) = header else {
                i += 1;
                continue;
            };

            // The header row itself may carry the weight-class tokens;
            // otherwise they sit on the next row.
            let header_weights = parse_weight_columns(row);
            let (weight_row_idx, weight_classes) = if header_weights.iter().any(Option::is_some) {
                (i, header_weights)
            } else {
                let Some(weight_row) = grid.get(i + 1) else {
                    break;
                };
                (i + 1, parse_weight_columns(weight_row))
            };

            // Value rows sit at fixed offsets below the weight row; the
            // name/date rows between them are ignored.
            let value_row = |lift: Lift| {
                let offset = match lift {
                    Lift::Snatch => 1,
                    Lift::CleanJerk => 4,
                    Lift::Total => 7,
                };
                grid.get(weight_row_idx + offset)
            };

            for (col, weight_class) in weight_classes.iter().enumerate() {
                let Some(weight_class) = weight_class else {
                    continue;
                };

                let mut rec =
                    CanonicalRecord::new(&self.wso, &age_category, gender, weight_class.clone());
                for lift in Lift::ALL {
                    if let Some(vrow) = value_row(lift) {
                        rec.set_lift(lift, parse_lift_value(cell(vrow, col + 1)));
                    }
                }
                records.push(rec);
            }

            i = weight_row_idx + SECTION_DATA_ROWS;
        }

        records
    }

    fn layout(&self) -> Layout {
        Layout::Horizontal
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

    fn section(header: &str) -> Vec<Vec<String>> {
        g(&[
            &[header],
            &["", "40 KG", "44 KG", "49+ KG"],
            &["SNATCH", "30", "35", "41"],
            &["Name", "A", "B", "C"],
            &["Date", "2020", "2021", "2022"],
            &["C&J", "40", "45", "52"],
            &["Name", "A", "B", "C"],
            &["Date", "2020", "2021", "2022"],
            &["TOTAL", "70", "80", "93"],
            &["Name", "A", "B", "C"],
            &["Date", "2020", "2021", "2022"],
        ])
    }

    #[test]
    fn test_parse_section_header_shapes() {
        assert_eq!(
            parse_section_header("YOUTH: MEN 13 & Under"),
            Some(("U13".to_string(), Gender::Men))
        );
        assert_eq!(
            parse_section_header("YOUTH: WOMEN 14-17 YO"),
            Some(("U17".to_string(), Gender::Women))
        );
        assert_eq!(
            parse_section_header("SENIORS: MEN 15 years old <"),
            Some(("Senior".to_string(), Gender::Men))
        );
        assert_eq!(
            parse_section_header("JUNIORS: WOMEN 15-20 years old"),
            Some(("Junior".to_string(), Gender::Women))
        );
        assert_eq!(
            parse_section_header("MASTERS: MEN 45-49 years old"),
            Some(("Masters 45".to_string(), Gender::Men))
        );
        assert_eq!(parse_section_header("WSO RECORDS"), None);
        // Gender without recognizable age text
        assert_eq!(parse_section_header("MEN"), None);
    }

    #[test]
    fn test_parse_weight_columns() {
        let row: Vec<String> = ["", "40 KG", "notes", "49+ KG", ""]
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            parse_weight_columns(&row),
            vec![
                Some("40".to_string()),
                None,
                Some("49+".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_one_section_yields_column_records() {
        let parser = HorizontalParser::new("TN-KY");
        let records = parser.parse(&section("YOUTH: MEN 13 & Under"));

        assert_eq!(records.len(), 3);
        let rec = &records[0];
        assert_eq!(rec.age_category, "U13");
        assert_eq!(rec.gender, Gender::Men);
        assert_eq!(rec.weight_class, "40");
        assert_eq!(rec.snatch_record, Some(30));
        assert_eq!(rec.cj_record, Some(40));
        assert_eq!(rec.total_record, Some(70));

        assert_eq!(records[2].weight_class, "49+");
        assert_eq!(records[2].total_record, Some(93));
    }

    #[test]
    fn test_merged_header_recovered_from_adjacent_cells() {
        let parser = HorizontalParser::new("TN-KY");
        let mut grid = section("ignored");
        grid[0] = vec![
            "TN-KY WSO RECORDS YOUTH: MEN".to_string(),
            "13 & Under 44 KG".to_string(),
        ];

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].age_category, "U13");
        assert_eq!(records[0].gender, Gender::Men);
    }

    #[test]
    fn test_header_row_carrying_weight_columns() {
        let parser = HorizontalParser::new("TN-KY");
        // The weight-class tokens sit on the header row itself, so the
        // value triples start one row earlier.
        let grid = g(&[
            &["SENIORS: WOMEN", "45 KG", "49 KG"],
            &["SNATCH", "60", "65"],
            &["Name", "A", "B"],
            &["Date", "2020", "2021"],
            &["C&J", "75", "80"],
            &["Name", "A", "B"],
            &["Date", "2020", "2021"],
            &["TOTAL", "135", "145"],
            &["Name", "A", "B"],
            &["Date", "2020", "2021"],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].age_category, "Senior");
        assert_eq!(records[0].weight_class, "45");
        assert_eq!(records[0].snatch_record, Some(60));
        assert_eq!(records[0].cj_record, Some(75));
        assert_eq!(records[0].total_record, Some(135));
        assert_eq!(records[1].weight_class, "49");
        assert_eq!(records[1].total_record, Some(145));
    }

    #[test]
    fn test_multiple_sections() {
        let parser = HorizontalParser::new("TN-KY");
        let mut grid = section("SENIORS: WOMEN");
        grid.extend(section("MASTERS: MEN 35-39 years old"));

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 6);
        assert!(records[..3]
            .iter()
            .all(|r| r.age_category == "Senior" && r.gender == Gender::Women));
        assert!(records[3..]
            .iter()
            .all(|r| r.age_category == "Masters 35" && r.gender == Gender::Men));
    }

    #[test]
    fn test_noise_rows_between_sections_ignored() {
        let parser = HorizontalParser::new("TN-KY");
        let mut grid = g(&[&["Updated January 2025"], &[""]]);
        grid.extend(section("JUNIORS: MEN"));

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].age_category, "Junior");
    }

    #[test]
    fn test_truncated_section_keeps_parsed_lifts() {
        let parser = HorizontalParser::new("TN-KY");
        // Sheet ends after the snatch triple.
        let grid = g(&[
            &["SENIORS: MEN"],
            &["", "61 KG", "67 KG"],
            &["SNATCH", "105", "115"],
            &["Name", "A", "B"],
        ]);

        let records = parser.parse(&grid);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].snatch_record, Some(105));
        assert_eq!(records[0].cj_record, None);
        assert_eq!(records[0].total_record, None);
    }
}
