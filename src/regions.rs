// Per-region source configuration.
//
// Every region is a declarative table: which URL family its sheet uses, which
// tabs to fetch, and which parser (with which layout knobs) each tab gets.
// Quirks like single-gender tabs live here, not in parser conditionals.

use crate::fetch::TabRef;
use crate::normalize::BaseAge;
use crate::parsers::{
    DocumentParser, FlatParser, HorizontalParser, LayoutParser, PairedParser, SideBySideParser,
    VerticalParser,
};
use crate::record::Gender;

/// Which parser to run on a tab, with its layout-specific configuration.
#[derive(Debug, Clone)]
pub enum ParserSpec {
    Vertical {
        gender: Gender,
        base_age: BaseAge,
    },
    SideBySide {
        age_category: &'static str,
    },
    Paired {
        age_category: &'static str,
        /// Set when only one column group is populated; that group's data
        /// sits in the left columns regardless of gender.
        only: Option<Gender>,
    },
    Flat,
    Horizontal,
    Document,
}

impl ParserSpec {
    pub fn build(&self, wso: &str) -> Box<dyn LayoutParser> {
        match self {
            ParserSpec::Vertical { gender, base_age } => {
                Box::new(VerticalParser::new(wso, *gender, *base_age))
            }
            ParserSpec::SideBySide { age_category } => {
                Box::new(SideBySideParser::new(wso, *age_category))
            }
            ParserSpec::Paired { age_category, only } => Box::new(match only {
                Some(gender) => PairedParser::single_side(wso, *age_category, *gender),
                None => PairedParser::new(wso, *age_category),
            }),
            ParserSpec::Flat => Box::new(FlatParser::new(wso)),
            ParserSpec::Horizontal => Box::new(HorizontalParser::new(wso)),
            ParserSpec::Document => Box::new(DocumentParser::new(wso)),
        }
    }
}

/// One fetchable tab.
#[derive(Debug, Clone)]
pub struct TabSpec {
    pub label: &'static str,
    pub tab: TabRef,
    pub parser: ParserSpec,
}

/// Which URL family the region's source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Regular spreadsheet, CSV-exported per tab.
    Sheet,
    /// Published-to-web spreadsheet with its own id namespace.
    PublishedSheet,
    /// Table-structured document extraction (single input, no tabs).
    Document,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub wso: &'static str,
    pub source: SourceKind,
    pub tabs: Vec<TabSpec>,
}

fn gid(label: &'static str, gid: &str, parser: ParserSpec) -> TabSpec {
    TabSpec {
        label,
        tab: TabRef::Gid(gid.to_string()),
        parser,
    }
}

fn named(label: &'static str, parser: ParserSpec) -> TabSpec {
    TabSpec {
        label,
        tab: TabRef::Name(label.to_string()),
        parser,
    }
}

fn vertical(gender: Gender, base_age: BaseAge) -> ParserSpec {
    ParserSpec::Vertical { gender, base_age }
}

fn paired(age_category: &'static str) -> ParserSpec {
    ParserSpec::Paired {
        age_category,
        only: None,
    }
}

fn side_by_side(age_category: &'static str) -> ParserSpec {
    ParserSpec::SideBySide { age_category }
}

/// Look up the built-in configuration for a region by its WSO name.
pub fn builtin(wso: &str) -> Option<Region> {
    let region = match wso {
        "Ohio" => Region {
            wso: "Ohio",
            source: SourceKind::Sheet,
            tabs: vec![
                named("Youth Women", vertical(Gender::Women, BaseAge::Youth)),
                named("Youth Men", vertical(Gender::Men, BaseAge::Youth)),
                named("Junior Women", vertical(Gender::Women, BaseAge::Junior)),
                named("Junior Men", vertical(Gender::Men, BaseAge::Junior)),
                named("Senior Women", vertical(Gender::Women, BaseAge::Senior)),
                named("Senior Men", vertical(Gender::Men, BaseAge::Senior)),
                named("Masters Women", vertical(Gender::Women, BaseAge::Masters)),
                named("Masters Men", vertical(Gender::Men, BaseAge::Masters)),
            ],
        },
        "Pennsylvania-West Virginia" => Region {
            wso: "Pennsylvania-West Virginia",
            source: SourceKind::PublishedSheet,
            tabs: vec![
                gid("Youth Men", "908123897", vertical(Gender::Men, BaseAge::Youth)),
                gid("Youth Women", "1470799505", vertical(Gender::Women, BaseAge::Youth)),
                gid("Junior Men", "1650165633", vertical(Gender::Men, BaseAge::Junior)),
                gid("Junior Women", "80509707", vertical(Gender::Women, BaseAge::Junior)),
                gid("Open Men", "1381991871", vertical(Gender::Men, BaseAge::Senior)),
                gid("Open Women", "1545069771", vertical(Gender::Women, BaseAge::Senior)),
                gid("Masters Men", "14757518", vertical(Gender::Men, BaseAge::Masters)),
                gid("Masters Women", "846901037", vertical(Gender::Women, BaseAge::Masters)),
            ],
        },
        "Florida" => Region {
            wso: "Florida",
            source: SourceKind::Sheet,
            tabs: vec![
                gid("U13", "490899077", side_by_side("U13")),
                gid("U15", "1300164988", side_by_side("U15")),
                gid("U17", "1950298087", side_by_side("U17")),
                gid("Junior", "660284224", side_by_side("Junior")),
                gid("Senior", "662417948", side_by_side("Senior")),
                gid("Masters 35", "1222085467", side_by_side("Masters 35")),
                gid("Masters 40", "1267986954", side_by_side("Masters 40")),
                gid("Masters 45", "411054882", side_by_side("Masters 45")),
                gid("Masters 50", "1758139651", side_by_side("Masters 50")),
                gid("Masters 55", "1041309770", side_by_side("Masters 55")),
                gid("Masters 60", "1879007867", side_by_side("Masters 60")),
                gid("Masters 65", "1005330611", side_by_side("Masters 65")),
                gid("Masters 70", "1193133330", side_by_side("Masters 70")),
                gid("Masters 75", "373452428", side_by_side("Masters 75")),
                gid("Masters 80", "851164639", side_by_side("Masters 80")),
                gid("Masters 85", "1894058438", side_by_side("Masters 85")),
                gid("Masters 90", "575067900", side_by_side("Masters 90")),
            ],
        },
        "New Jersey" => Region {
            wso: "New Jersey",
            source: SourceKind::Sheet,
            tabs: vec![
                gid("Senior", "0", paired("Senior")),
                gid("Junior", "336358523", paired("Junior")),
                gid("U17", "2116279815", paired("U17")),
                gid("U15", "1466042495", paired("U15")),
                gid("U13", "1569406083", paired("U13")),
                gid("Masters 35", "575793496", paired("Masters 35")),
                gid("Masters 40", "2006037821", paired("Masters 40")),
                gid("Masters 45", "1977742090", paired("Masters 45")),
                gid("Masters 50", "1673511438", paired("Masters 50")),
                gid("Masters 55", "1894823432", paired("Masters 55")),
                gid("Masters 60", "1933132040", paired("Masters 60")),
                gid("Masters 65", "127836685", paired("Masters 65")),
                gid("Masters 70", "239397826", paired("Masters 70")),
                gid("Masters 75", "2047529058", paired("Masters 75")),
                // The 80+ tab carries men's records only, in the left columns.
                gid(
                    "Masters 80",
                    "389932308",
                    ParserSpec::Paired {
                        age_category: "Masters 80",
                        only: Some(Gender::Men),
                    },
                ),
            ],
        },
        "Georgia" => flat_region("Georgia"),
        "Pacific Northwest" => flat_region("Pacific Northwest"),
        "TN-KY" => Region {
            wso: "TN-KY",
            source: SourceKind::Sheet,
            tabs: vec![gid("Records", "0", ParserSpec::Horizontal)],
        },
        "New England" => Region {
            wso: "New England",
            source: SourceKind::Document,
            tabs: vec![TabSpec {
                label: "Records",
                tab: TabRef::Gid("0".to_string()),
                parser: ParserSpec::Document,
            }],
        },
        _ => return None,
    };
    Some(region)
}

fn flat_region(wso: &'static str) -> Region {
    Region {
        wso,
        source: SourceKind::Sheet,
        tabs: vec![named("Current Records", ParserSpec::Flat)],
    }
}

/// Region names the registry knows, for error messages.
pub fn known_regions() -> Vec<&'static str> {
    vec![
        "Ohio",
        "Pennsylvania-West Virginia",
        "Florida",
        "New Jersey",
        "Georgia",
        "Pacific Northwest",
        "TN-KY",
        "New England",
    ]
}

// ============================================================================
// TESTS
// ============================================================================
