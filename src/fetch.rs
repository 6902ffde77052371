// Sheet CSV fetcher.
//
// Sources are public spreadsheets exported as CSV. Two URL families exist:
// the regular export (addressed by sheet id plus tab gid or tab name) and
// the published-to-web variant some regions use (addressed by a separate
// published id).

use anyhow::{bail, Context, Result};

use crate::grid::{grid_from_csv, Grid};

/// How a tab is addressed within a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabRef {
    /// Numeric gid from the tab's URL fragment.
    Gid(String),
    /// Tab name as shown in the sheet UI.
    Name(String),
}

/// Pull the spreadsheet id out of a full sheet URL.
pub fn extract_sheet_id(url: &str) -> Result<String> {
    let marker = "/spreadsheets/d/";
    let Some(start) = url.find(marker) else {
        bail!("Not a spreadsheet URL: {}", url);
    };

    let id: String = url[start + marker.len()..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        bail!("Spreadsheet URL has an empty id: {}", url);
    }
    Ok(id)
}

/// Pull the published-sheet id out of a `/spreadsheets/d/e/<id>/pub...` URL.
/// A bare id (no slashes) is accepted as-is.
pub fn extract_published_id(source: &str) -> Result<String> {
    let marker = "/spreadsheets/d/e/";
    if let Some(start) = source.find(marker) {
        let id: String = source[start + marker.len()..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if id.is_empty() {
            bail!("Published sheet URL has an empty id: {}", source);
        }
        return Ok(id);
    }
    if !source.is_empty() && !source.contains('/') {
        return Ok(source.to_string());
    }
    bail!("Not a published sheet URL or id: {}", source);
}

/// CSV export URL for one tab of a regular spreadsheet.
pub fn csv_export_url(sheet_id: &str, tab: &TabRef) -> String {
    let base = format!(
        "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv",
        sheet_id
    );
    match tab {
        TabRef::Gid(gid) => format!("{}&gid={}", base, gid),
        TabRef::Name(name) => format!("{}&sheet={}", base, name.replace(' ', "%20")),
    }
}

/// CSV export URL for a published-to-web sheet, which uses a distinct id
/// namespace and path shape.
pub fn published_csv_url(published_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/e/{}/pub?gid={}&single=true&output=csv",
        published_id, gid
    )
}

pub struct SheetClient {
    http: reqwest::blocking::Client,
}

impl SheetClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("wso-records/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(SheetClient { http })
    }

    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Fetch failed with status {} for {}", status, url);
        }

        response
            .text()
            .with_context(|| format!("Failed to read body from {}", url))
    }

    /// Fetch one tab and decode it into a cell grid.
    pub fn fetch_grid(&self, url: &str) -> Result<Grid> {
        let text = self.fetch_text(url)?;
        grid_from_csv(&text)
    }
}

// ============================================================================
// TESTS
// ============================================================================
