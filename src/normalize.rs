// Normalization rules shared by every layout parser.
//
// Source sheets are manually curated: these functions map free-text age and
// weight tokens into the canonical vocabulary and never fail — unrecognized
// input is returned unchanged (age) or dropped (weight/value), so callers
// degrade by omission instead of erroring on noise.

/// Base age category a tab or section declares before subdivision.
///
/// Masters bands are named by their floor ("35-39" is "Masters 35"); youth
/// bands by their ceiling ("14-15" is "U15"). Junior and Senior have no
/// subdivisions at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseAge {
    Youth,
    Junior,
    Senior,
    Masters,
}

impl BaseAge {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseAge::Youth => "Youth",
            BaseAge::Junior => "Junior",
            BaseAge::Senior => "Senior",
            BaseAge::Masters => "Masters",
        }
    }

    /// Recognize the base category embedded in a tab name like "Youth Women"
    /// or "Masters Men". "Open" is the on-sheet spelling of Senior.
    pub fn from_label(text: &str) -> Option<BaseAge> {
        if text.contains("Youth") {
            Some(BaseAge::Youth)
        } else if text.contains("Junior") {
            Some(BaseAge::Junior)
        } else if text.contains("Senior") || text.contains("Open") {
            Some(BaseAge::Senior)
        } else if text.contains("Masters") {
            Some(BaseAge::Masters)
        } else {
            None
        }
    }

    /// Junior/Senior tabs carry no subdivision rows; the base name is the
    /// final age category.
    pub fn fixed_category(&self) -> Option<&'static str> {
        match self {
            BaseAge::Junior => Some("Junior"),
            BaseAge::Senior => Some("Senior"),
            _ => None,
        }
    }
}

/// Convert age subdivision text to the canonical token.
///
/// Rules, in order:
/// - "under" preceded by a number (any case) -> "U<N>". Covers both the bare
///   "13 and Under" cell and prose headers like "Men's 13 Under Age Group".
/// - "A-B" as the whole cell, or embedded in an age-group header
///   ("Men's 14-15 Age Group", "Women's Masters (35-39)"): Masters context
///   -> "Masters <A>" (bands named by floor), otherwise "U<B>" (bands named
///   by ceiling). The embedded form requires an "Age Group"/"Masters" marker
///   so stray ranges in noise rows ("2020-2021 season") don't transform.
/// - "total" (any case) -> "Total" (end-of-block marker, never persisted)
/// - anything else is returned unchanged; callers treat an unchanged value
///   as "not an age subdivision" and must not commit it.
pub fn parse_age_subdivision(text: &str, base: BaseAge) -> String {
    let text = text.trim();
    let lower = text.to_lowercase();

    // "13 and Under" / "Men's 13 Under Age Group" -> U13
    if lower.contains("under") {
        if let Some(head) = lower.split("under").next() {
            if let Some(age) = find_number(head) {
                return format!("U{}", age);
            }
        }
    }

    // "35-39" / "35 - 39", or a range inside a section header.
    let range = split_age_range(text)
        .and_then(|(a, b)| a.parse::<u32>().ok().zip(b.parse::<u32>().ok()))
        .or_else(|| {
            (lower.contains("age group") || lower.contains("masters"))
                .then(|| find_age_range(text))
                .flatten()
        });
    if let Some((lower_age, upper_age)) = range {
        return if base == BaseAge::Masters {
            format!("Masters {}", lower_age)
        } else {
            format!("U{}", upper_age)
        };
    }

    if lower == "total" {
        return "Total".to_string();
    }

    text.to_string()
}

/// Split "A-B" (with or without surrounding spaces) into numeric bounds.
fn split_age_range(text: &str) -> Option<(&str, &str)> {
    let (a, b) = text.split_once('-')?;
    let a = a.trim();
    let b = b.trim();
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if numeric(a) && numeric(b) {
        Some((a, b))
    } else {
        None
    }
}

/// Normalize a weight class cell to the canonical "<n>" / "<n>+" form.
///
/// Handles "40kg", "40 kg", "+65kg", "65+", "110+". Returns None when no
/// numeric token is present (the caller may then synthesize the open top
/// class from row order — see the per-parser last-closed-class tracking).
pub fn normalize_weight_class(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let open_class = raw.contains('+');
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    // Guard against cells that are mostly prose ("13 & Under 44 KG" is not a
    // weight class cell on its own): require the text minus the number, any
    // "+", and a kg suffix to be empty.
    let stripped = raw
        .to_lowercase()
        .replace("kg", "")
        .replace('+', "")
        .replace(' ', "");
    if stripped != digits {
        return None;
    }

    if open_class {
        Some(format!("{}+", digits))
    } else {
        Some(digits)
    }
}

/// Synthesize the open-ended top class from the last closed class seen.
pub fn open_class_from(last_closed: &str) -> String {
    format!("{}+", last_closed)
}

/// Find the first "A-B" / "A - B" numeric range embedded in free text
/// (merged banner rows, section headers).
pub fn find_age_range(text: &str) -> Option<(u32, u32)> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let low: String = chars[start..i].iter().collect();

            let mut j = i;
            while j < chars.len() && chars[j] == ' ' {
                j += 1;
            }
            if j < chars.len() && chars[j] == '-' {
                j += 1;
                while j < chars.len() && chars[j] == ' ' {
                    j += 1;
                }
                let hstart = j;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    j += 1;
                }
                if j > hstart {
                    let high: String = chars[hstart..j].iter().collect();
                    if let (Ok(low), Ok(high)) = (low.parse(), high.parse()) {
                        return Some((low, high));
                    }
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Find the number immediately preceding a "kg" marker in free text.
pub fn find_kg_number(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();

    for idx in 0..chars.len().saturating_sub(1) {
        if chars[idx] == 'k' && chars[idx + 1] == 'g' {
            let mut i = idx;
            while i > 0 && chars[i - 1] == ' ' {
                i -= 1;
            }
            let end = i;
            while i > 0 && chars[i - 1].is_ascii_digit() {
                i -= 1;
            }
            if i < end {
                return Some(chars[i..end].iter().collect());
            }
        }
    }
    None
}

/// Find the first run of digits in free text.
pub fn find_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Normalize the age-group shorthand used by flat-format sheets.
///
/// - "JR", "jr" -> "Junior" (suffix preserved)
/// - "Open", "OPEN" -> "Senior" (suffix preserved, e.g. "Open ADAP")
/// - "M35" / "W40" -> "Masters 35" / "Masters 40" (the leading gender letter
///   is redundant — gender is a separate column)
/// - "U11" / "U13" / ... pass through unchanged.
///
/// Must run BEFORE any adaptive-category check so "M40 ADAP" is recognized
/// as adaptive via its normalized form.
pub fn normalize_flat_age_group(raw: &str) -> String {
    let raw = raw.trim();
    let upper = raw.to_uppercase();

    // Prefixes are ASCII, so byte offsets into the original are safe.
    if upper.starts_with("JR") {
        return format!("Junior{}", &raw[2..]);
    }

    if upper.starts_with("OPEN") {
        return format!("Senior{}", &raw[4..]);
    }

    // M35, W35, m40 ADAP, ...
    let mut chars = raw.chars();
    if let Some(first) = chars.next() {
        if matches!(first.to_ascii_uppercase(), 'M' | 'W') {
            let rest = chars.as_str();
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                let suffix = &rest[digits.len()..];
                return format!("Masters {}{}", digits, suffix);
            }
        }
    }

    raw.to_string()
}

/// Adaptive/para categories use a distinct vocabulary and are out of scope.
pub fn is_adaptive(age_group: &str) -> bool {
    age_group.to_uppercase().contains("ADAP")
}

/// Parse a lift value cell into integer kilograms.
///
/// Empty cells, non-numeric text, the "STANDARD" placeholder, and literal
/// zero all mean "no record set" and map to None. Decimal values are
/// truncated to whole kilograms.
pub fn parse_lift_value(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("standard") {
        return None;
    }

    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    Some(value.trunc() as u32)
}

// ============================================================================
// TESTS
// ============================================================================
