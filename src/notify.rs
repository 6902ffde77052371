// Webhook notifications.
//
// One embed per run summarizing the reconciliation outcome. The payload
// builder is pure so the embed shape is testable without a webhook; only
// `Notifier::send` touches the network.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde_json::{json, Value};

use crate::reconcile::{RecordAction, ReconciliationPlan};
use crate::record::CanonicalRecord;

/// How many records to list per embed field before truncating.
const MAX_LISTED: usize = 10;

const COLOR_NO_CHANGES: u32 = 3447003;
const COLOR_CHANGES: u32 = 3066993;

pub struct Notifier {
    webhook_url: String,
    http: reqwest::blocking::Client,
}

impl Notifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("wso-records/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Notifier {
            webhook_url: webhook_url.into(),
            http,
        })
    }

    pub fn send(&self, wso: &str, plan: &ReconciliationPlan) -> Result<()> {
        let payload = build_payload(wso, plan);
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .context("Failed to send webhook notification")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Webhook rejected notification with status {}", status);
        }
        Ok(())
    }
}

/// Build the embed payload for one run.
pub fn build_payload(wso: &str, plan: &ReconciliationPlan) -> Value {
    let embed = if !plan.has_changes() {
        json!({
            "title": format!("📊 {} WSO Records - No Changes", wso),
            "description": "Sync ran successfully. No new records or updates.",
            "color": COLOR_NO_CHANGES,
            "timestamp": Utc::now().to_rfc3339(),
            "footer": {"text": "WSO Records Sync"},
        })
    } else {
        let description = format!(
            "**Summary:**\n• {} new record(s) inserted\n• {} record(s) updated",
            plan.insert_count(),
            plan.update_count()
        );

        let mut fields = Vec::new();
        if plan.insert_count() > 0 {
            fields.push(json!({
                "name": "🆕 New Records",
                "value": inserted_field(plan),
                "inline": false,
            }));
        }
        if plan.update_count() > 0 {
            fields.push(json!({
                "name": "📝 Updated Records",
                "value": updated_field(plan),
                "inline": false,
            }));
        }

        json!({
            "title": format!("📊 {} WSO Records Update", wso),
            "description": description,
            "color": COLOR_CHANGES,
            "fields": fields,
            "timestamp": Utc::now().to_rfc3339(),
            "footer": {"text": "WSO Records Sync"},
        })
    };

    json!({ "embeds": [embed] })
}

fn record_heading(record: &CanonicalRecord) -> String {
    format!(
        "• **{}** | {} | {}",
        record.age_category, record.gender, record.weight_class
    )
}

fn inserted_field(plan: &ReconciliationPlan) -> String {
    let mut lines: Vec<String> = plan
        .inserts()
        .take(MAX_LISTED)
        .map(|action| {
            let record = &action.record;
            let mut lifts = Vec::new();
            if let Some(v) = record.snatch_record {
                lifts.push(format!("Snatch: {}kg", v));
            }
            if let Some(v) = record.cj_record {
                lifts.push(format!("C&J: {}kg", v));
            }
            if let Some(v) = record.total_record {
                lifts.push(format!("Total: {}kg", v));
            }
            let lifts = if lifts.is_empty() {
                "No records".to_string()
            } else {
                lifts.join(", ")
            };
            format!("{}\n  {}", record_heading(record), lifts)
        })
        .collect();

    if plan.insert_count() > MAX_LISTED {
        lines.push(format!("_...and {} more_", plan.insert_count() - MAX_LISTED));
    }
    lines.join("\n")
}

fn updated_field(plan: &ReconciliationPlan) -> String {
    let mut lines: Vec<String> = plan
        .updates()
        .take(MAX_LISTED)
        .map(|action| {
            let RecordAction::Update { changes, .. } = &action.action else {
                unreachable!("updates() only yields Update actions");
            };
            let fmt = |v: Option<u32>| match v {
                Some(kg) => format!("{}kg", kg),
                None => "None".to_string(),
            };
            let changes: Vec<String> = changes
                .iter()
                .map(|c| format!("{}: {} → {}", field_label(c.field), fmt(c.old), fmt(c.new)))
                .collect();
            format!("{}\n  {}", record_heading(&action.record), changes.join(", "))
        })
        .collect();

    if plan.update_count() > MAX_LISTED {
        lines.push(format!("_...and {} more_", plan.update_count() - MAX_LISTED));
    }
    lines.join("\n")
}

fn field_label(field: &str) -> &'static str {
    match field {
        "snatch_record" => "Snatch",
        "cj_record" => "C&J",
        "total_record" => "Total",
        _ => "Record",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{FieldChange, PlannedAction};
    use crate::record::Gender;

    fn rec(class: &str) -> CanonicalRecord {
        let mut r = CanonicalRecord::new("Ohio", "U15", Gender::Women, class);
        r.snatch_record = Some(50);
        r.total_record = Some(112);
        r
    }

    fn plan_with(actions: Vec<PlannedAction>) -> ReconciliationPlan {
        ReconciliationPlan { actions }
    }

    #[test]
    fn test_no_changes_embed() {
        let plan = plan_with(vec![PlannedAction {
            record: rec("49"),
            action: RecordAction::Unchanged,
        }]);

        let payload = build_payload("Ohio", &plan);
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "📊 Ohio WSO Records - No Changes");
        assert_eq!(embed["color"], COLOR_NO_CHANGES);
        assert!(embed["fields"].is_null());
    }

    #[test]
    fn test_changes_embed_lists_inserts_and_updates() {
        let plan = plan_with(vec![
            PlannedAction {
                record: rec("49"),
                action: RecordAction::Insert,
            },
            PlannedAction {
                record: rec("55"),
                action: RecordAction::Update {
                    id: "row-1".to_string(),
                    changes: vec![FieldChange {
                        field: "snatch_record",
                        old: Some(48),
                        new: Some(50),
                    }],
                },
            },
        ]);

        let payload = build_payload("Ohio", &plan);
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "📊 Ohio WSO Records Update");
        assert_eq!(embed["color"], COLOR_CHANGES);

        let description = embed["description"].as_str().unwrap();
        assert!(description.contains("1 new record(s) inserted"));
        assert!(description.contains("1 record(s) updated"));

        let fields = embed["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        let inserts = fields[0]["value"].as_str().unwrap();
        assert!(inserts.contains("**U15** | Women | 49"));
        assert!(inserts.contains("Snatch: 50kg"));
        let updates = fields[1]["value"].as_str().unwrap();
        assert!(updates.contains("Snatch: 48kg → 50kg"));
    }

    #[test]
    fn test_insert_with_no_lifts() {
        let mut record = rec("59");
        record.snatch_record = None;
        record.total_record = None;

        let plan = plan_with(vec![PlannedAction {
            record,
            action: RecordAction::Insert,
        }]);

        let payload = build_payload("New Jersey", &plan);
        let inserts = payload["embeds"][0]["fields"][0]["value"].as_str().unwrap();
        assert!(inserts.contains("No records"));
    }

    #[test]
    fn test_long_insert_list_truncated() {
        let actions = (40..55)
            .map(|w| PlannedAction {
                record: rec(&w.to_string()),
                action: RecordAction::Insert,
            })
            .collect();

        let payload = build_payload("Ohio", &plan_with(actions));
        let inserts = payload["embeds"][0]["fields"][0]["value"].as_str().unwrap();
        assert!(inserts.contains("_...and 5 more_"));
    }
}
