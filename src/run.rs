// Orchestration: fetch, parse, consolidate, reconcile, then apply or report.
//
// Tab fetches are isolated — one bad tab prints a ✗ line and the rest of the
// region still syncs. Everything before `apply` is read-only, so a dry run
// is the same pipeline stopped after planning.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{Config, WEBHOOK_ENV};
use crate::consolidate::consolidate;
use crate::fetch::{
    csv_export_url, extract_published_id, extract_sheet_id, published_csv_url, SheetClient, TabRef,
};
use crate::grid::grid_from_csv;
use crate::notify::Notifier;
use crate::reconcile::{RecordAction, ReconciliationEngine, ReconciliationPlan};
use crate::record::CanonicalRecord;
use crate::regions::{self, Region, SourceKind};
use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub wso: String,
    pub source: String,
    pub dry_run: bool,
}

pub fn run(opts: &RunOptions, config: &Config) -> Result<()> {
    let Some(region) = regions::builtin(&opts.wso) else {
        bail!(
            "Unknown WSO {:?}. Known regions: {}",
            opts.wso,
            regions::known_regions().join(", ")
        );
    };

    // Fail before any fetching if a live run can't notify.
    if !opts.dry_run && config.webhook_url.is_none() {
        bail!("{} must be set for a live run (or pass --dry-run)", WEBHOOK_ENV);
    }

    println!("Starting sync for {}", region.wso);
    println!("Source: {}", opts.source);

    let records = scrape(&region, &opts.source)?;
    println!("Found {} total records", records.len());
    let records = consolidate(records);

    let store = RecordStore::open(&config.db_path)?;
    let plan = ReconciliationEngine::new().plan(&records, &store)?;

    if opts.dry_run {
        print_dry_run(&plan);
        return Ok(());
    }

    println!("Applying changes: {}", plan.summary());
    apply(&plan, &store)?;

    if let Some(webhook) = &config.webhook_url {
        // Delivery failure shouldn't undo a completed sync.
        match Notifier::new(webhook).and_then(|n| n.send(region.wso, &plan)) {
            Ok(()) => println!("✓ Notification sent"),
            Err(e) => eprintln!("✗ Failed to send notification: {:#}", e),
        }
    }

    println!("Done!");
    Ok(())
}

/// Fetch and parse every tab of a region's source.
fn scrape(region: &Region, source: &str) -> Result<Vec<CanonicalRecord>> {
    match region.source {
        SourceKind::Sheet | SourceKind::PublishedSheet => scrape_sheet(region, source),
        SourceKind::Document => scrape_document(region, source),
    }
}

fn scrape_sheet(region: &Region, source: &str) -> Result<Vec<CanonicalRecord>> {
    let client = SheetClient::new()?;
    let mut all_records = Vec::new();

    for tab in &region.tabs {
        let url = match region.source {
            SourceKind::Sheet => {
                let sheet_id = extract_sheet_id(source)?;
                csv_export_url(&sheet_id, &tab.tab)
            }
            SourceKind::PublishedSheet => {
                let published_id = extract_published_id(source)?;
                let TabRef::Gid(gid) = &tab.tab else {
                    bail!("Published sheets are addressed by gid (tab {})", tab.label);
                };
                published_csv_url(&published_id, gid)
            }
            SourceKind::Document => unreachable!("document sources have no tabs"),
        };

        println!("Scraping {} tab...", tab.label);
        match client.fetch_grid(&url) {
            Ok(grid) => {
                let records = tab.parser.build(region.wso).parse(&grid);
                println!("✓ Found {} records in {}", records.len(), tab.label);
                all_records.extend(records);
            }
            // One bad tab must not sink the region.
            Err(e) => eprintln!("✗ Error scraping {}: {:#}", tab.label, e),
        }
    }

    Ok(all_records)
}

/// Document sources arrive as one table-extraction CSV: either a URL or a
/// local file path.
fn scrape_document(region: &Region, source: &str) -> Result<Vec<CanonicalRecord>> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        SheetClient::new()?.fetch_text(source)?
    } else {
        fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read {}", source))?
    };

    let grid = grid_from_csv(&text)?;
    let tab = region
        .tabs
        .first()
        .context("Document region has no parser configured")?;
    let records = tab.parser.build(region.wso).parse(&grid);
    println!("✓ Found {} records in document", records.len());
    Ok(records)
}

/// Write the plan to the store, one call per record.
pub fn apply(plan: &ReconciliationPlan, store: &RecordStore) -> Result<()> {
    for planned in &plan.actions {
        let record = &planned.record;
        match &planned.action {
            RecordAction::Insert => {
                store.insert(record)?;
                println!(
                    "  ✓ Inserted: {} {} {}",
                    record.age_category, record.gender, record.weight_class
                );
            }
            RecordAction::Update { id, changes } => {
                store.update(id, record)?;
                let detail: Vec<String> = changes.iter().map(|c| c.describe()).collect();
                println!(
                    "  ✓ Updated: {} {} {} ({})",
                    record.age_category,
                    record.gender,
                    record.weight_class,
                    detail.join(", ")
                );
            }
            RecordAction::Unchanged => {}
        }
    }
    Ok(())
}

/// Comparison report for dry runs: counts, then a sample of each bucket.
fn print_dry_run(plan: &ReconciliationPlan) {
    const SHOWN: usize = 5;

    println!("\nDry run results:");
    println!("  Records to INSERT: {}", plan.insert_count());
    println!("  Records to UPDATE: {}", plan.update_count());
    println!("  Records unchanged: {}", plan.unchanged_count());

    if plan.insert_count() > 0 {
        println!("\nNew records:");
        for planned in plan.inserts().take(SHOWN) {
            let r = &planned.record;
            println!("  - {} {} {}", r.age_category, r.gender, r.weight_class);
        }
        if plan.insert_count() > SHOWN {
            println!("  ... and {} more", plan.insert_count() - SHOWN);
        }
    }

    if plan.update_count() > 0 {
        println!("\nChanged records:");
        for planned in plan.updates().take(SHOWN) {
            let r = &planned.record;
            println!("  - {} {} {}", r.age_category, r.gender, r.weight_class);
            if let RecordAction::Update { changes, .. } = &planned.action {
                for change in changes {
                    println!("    {}", change.describe());
                }
            }
        }
        if plan.update_count() > SHOWN {
            println!("  ... and {} more", plan.update_count() - SHOWN);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::RecordLookup;
    use crate::record::Gender;

    fn rec(class: &str, snatch: Option<u32>) -> CanonicalRecord {
        let mut r = CanonicalRecord::new("Ohio", "U15", Gender::Women, class);
        r.snatch_record = snatch;
        r
    }

    #[test]
    fn test_apply_then_replan_is_unchanged() {
        let store = RecordStore::open_in_memory().unwrap();
        let records = vec![rec("49", Some(50)), rec("55", Some(48))];
        let engine = ReconciliationEngine::new();

        let plan = engine.plan(&records, &store).unwrap();
        assert_eq!(plan.insert_count(), 2);
        apply(&plan, &store).unwrap();

        let replan = engine.plan(&records, &store).unwrap();
        assert!(!replan.has_changes());
        assert_eq!(replan.unchanged_count(), 2);
    }

    #[test]
    fn test_apply_update_path() {
        let store = RecordStore::open_in_memory().unwrap();
        let engine = ReconciliationEngine::new();

        let initial = vec![rec("49", Some(50))];
        apply(&engine.plan(&initial, &store).unwrap(), &store).unwrap();

        let improved = vec![rec("49", Some(53))];
        let plan = engine.plan(&improved, &store).unwrap();
        assert_eq!(plan.update_count(), 1);
        apply(&plan, &store).unwrap();

        let stored = store.find(&rec("49", None).key()).unwrap().unwrap();
        assert_eq!(stored.record.snatch_record, Some(53));
    }

    #[test]
    fn test_empty_batch_plans_nothing() {
        let store = RecordStore::open_in_memory().unwrap();
        let plan = ReconciliationEngine::new().plan(&[], &store).unwrap();
        assert!(plan.actions.is_empty());
        assert!(!plan.has_changes());
    }

    #[test]
    fn test_scrape_document_from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract.csv");
        fs::write(
            &path,
            "Open Men's Records,,,,,,\n61,Snatch,A. One,Club,Meet,110,2020\n,Total,A. One,Club,Meet,250,2020\n",
        )
        .unwrap();

        let region = regions::builtin("New England").unwrap();
        let records = scrape_document(&region, path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].wso, "New England");
        assert_eq!(records[0].age_category, "Senior");
        assert_eq!(records[0].snatch_record, Some(110));
        assert_eq!(records[0].total_record, Some(250));
    }
}
