// Canonical record model
// Every layout parser converges on this shape; the natural key
// (wso, age_category, gender, weight_class) identifies one standing record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender as it appears in the canonical schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
        }
    }

    /// Parse the single-letter code used by flat-format sheets ("M"/"F").
    pub fn from_code(code: &str) -> Option<Gender> {
        match code.trim() {
            "M" => Some(Gender::Men),
            "F" => Some(Gender::Women),
            _ => None,
        }
    }

    /// Parse the spelled-out form used in tab names and section headers.
    /// Checks "Women" before "Men" since the former contains the latter.
    pub fn from_label(text: &str) -> Option<Gender> {
        let upper = text.to_uppercase();
        if upper.contains("WOMEN") {
            Some(Gender::Women)
        } else if upper.contains("MEN") {
            Some(Gender::Men)
        } else {
            None
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three competition lift measurements tracked per weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lift {
    Snatch,
    CleanJerk,
    Total,
}

impl Lift {
    /// Database/notification field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Lift::Snatch => "snatch_record",
            Lift::CleanJerk => "cj_record",
            Lift::Total => "total_record",
        }
    }

    /// Match the lift labels that show up in source sheets, case-insensitively.
    /// "C&J" alone has four spellings across regions.
    pub fn from_label(label: &str) -> Option<Lift> {
        match label.trim().to_lowercase().as_str() {
            "snatch" => Some(Lift::Snatch),
            "clean & jerk" | "clean and jerk" | "c&j" | "cleanjerk" => Some(Lift::CleanJerk),
            "total" => Some(Lift::Total),
            _ => None,
        }
    }

    pub const ALL: [Lift; 3] = [Lift::Snatch, Lift::CleanJerk, Lift::Total];
}

/// Natural key of a standing record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub wso: String,
    pub age_category: String,
    pub gender: Gender,
    pub weight_class: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.wso, self.age_category, self.gender, self.weight_class
        )
    }
}

/// One standing record as parsed from a source sheet.
///
/// The three lift fields are independently nullable: a record may carry a
/// snatch value but no total. A parsed zero never reaches this struct —
/// value parsing maps it to `None` (sheets use 0 for "no record set").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub wso: String,
    pub age_category: String,
    pub gender: Gender,
    pub weight_class: String,
    pub snatch_record: Option<u32>,
    pub cj_record: Option<u32>,
    pub total_record: Option<u32>,
}

impl CanonicalRecord {
    pub fn new(
        wso: impl Into<String>,
        age_category: impl Into<String>,
        gender: Gender,
        weight_class: impl Into<String>,
    ) -> Self {
        CanonicalRecord {
            wso: wso.into(),
            age_category: age_category.into(),
            gender,
            weight_class: weight_class.into(),
            snatch_record: None,
            cj_record: None,
            total_record: None,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            wso: self.wso.clone(),
            age_category: self.age_category.clone(),
            gender: self.gender,
            weight_class: self.weight_class.clone(),
        }
    }

    pub fn lift(&self, lift: Lift) -> Option<u32> {
        match lift {
            Lift::Snatch => self.snatch_record,
            Lift::CleanJerk => self.cj_record,
            Lift::Total => self.total_record,
        }
    }

    pub fn set_lift(&mut self, lift: Lift, value: Option<u32>) {
        match lift {
            Lift::Snatch => self.snatch_record = value,
            Lift::CleanJerk => self.cj_record = value,
            Lift::Total => self.total_record = value,
        }
    }

    /// True when no lift field carries a value.
    pub fn is_empty(&self) -> bool {
        self.snatch_record.is_none() && self.cj_record.is_none() && self.total_record.is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
