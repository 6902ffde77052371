// Layout parser framework
//
// One parser per region-layout family. All parsers share the same contract:
// consume a cell grid plus whatever side-channel metadata their layout needs
// (declared gender, base age category — carried in the parser struct), and
// produce zero or more canonical records. Malformed rows are skipped, never
// raised: the sources are hand-maintained sheets and noise is expected.
//
// Adding a layout family = new struct implementing `LayoutParser`; nothing
// existing changes. Layout-specific knobs (column offsets, single-gender
// tabs) live in the parser's own config, not in shared conditionals.

pub mod document;
pub mod flat;
pub mod horizontal;
pub mod paired;
pub mod side_by_side;
pub mod vertical;

pub use document::DocumentParser;
pub use flat::FlatParser;
pub use horizontal::HorizontalParser;
pub use paired::{PairedParser, Side};
pub use side_by_side::SideBySideParser;
pub use vertical::VerticalParser;

use crate::grid::Grid;
use crate::record::CanonicalRecord;

/// Which layout family a parser implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Single-column vertical scan: subdivision rows, weight-class rows,
    /// then Snatch/C&J/Total rows (Total commits the block).
    Vertical,
    /// Two genders side by side, three rows (one per lift) per weight class.
    SideBySide,
    /// Two genders side by side, one row per weight class with all lifts.
    Paired,
    /// One physical row per lift measurement with explicit key columns.
    Flat,
    /// Weight classes as columns, value/name/date row triples per lift.
    Horizontal,
    /// Table-structured document extraction (paginated).
    Document,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Vertical => "vertical",
            Layout::SideBySide => "side-by-side",
            Layout::Paired => "paired",
            Layout::Flat => "flat",
            Layout::Horizontal => "horizontal",
            Layout::Document => "document",
        }
    }
}

/// Core trait every layout family implements.
pub trait LayoutParser {
    /// Parse one grid (one sheet tab or one extracted table) into canonical
    /// records. Infallible by design: unparseable rows are skipped.
    fn parse(&self, grid: &Grid) -> Vec<CanonicalRecord>;

    /// The layout family this parser handles.
    fn layout(&self) -> Layout;
}
