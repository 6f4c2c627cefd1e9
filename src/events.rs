use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedEvent;

pub const PULL_REQUEST_EVENT: &str = "PullRequestEvent";

pub type ActionCounts = BTreeMap<String, u64>;
pub type RepoCounts = BTreeMap<String, TypeCount>;
/// repo name -> event type -> count (pull requests are split out per action).
pub type EventCountMap = BTreeMap<String, RepoCounts>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeCount {
    Total(u64),
    ByAction(ActionCounts),
}

pub struct Aggregation {
    pub counts: EventCountMap,
    pub skipped: Vec<MalformedEvent>,
}

/// Folds the raw feed into per-repo/per-type counts. Records missing a
/// required field are collected in `skipped` instead of aborting; a repo
/// entry is still created whenever `repo.name` itself was readable.
pub fn aggregate(events: &[Value]) -> Aggregation {
    let mut counts = EventCountMap::new();
    let mut skipped = Vec::new();

    for event in events {
        let id = event.get("id").and_then(Value::as_str).map(String::from);

        let Some(repo) = event.pointer("/repo/name").and_then(Value::as_str) else {
            skipped.push(MalformedEvent {
                id,
                field: "repo.name",
            });
            continue;
        };
        let repo_counts = counts.entry(repo.to_string()).or_default();

        let Some(kind) = event.get("type").and_then(Value::as_str) else {
            skipped.push(MalformedEvent { id, field: "type" });
            continue;
        };

        if kind == PULL_REQUEST_EVENT {
            let Some(action) = event.pointer("/payload/action").and_then(Value::as_str) else {
                skipped.push(MalformedEvent {
                    id,
                    field: "payload.action",
                });
                continue;
            };
            let entry = repo_counts
                .entry(kind.to_string())
                .or_insert_with(|| TypeCount::ByAction(ActionCounts::new()));
            if let TypeCount::ByAction(actions) = entry {
                *actions.entry(action.to_string()).or_insert(0) += 1;
            }
        } else {
            let entry = repo_counts
                .entry(kind.to_string())
                .or_insert(TypeCount::Total(0));
            if let TypeCount::Total(count) = entry {
                *count += 1;
            }
        }
    }

    Aggregation { counts, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_events() -> Vec<Value> {
        vec![
            json!({"id": "1", "type": "PushEvent", "repo": {"name": "r1"}}),
            json!({"id": "2", "type": "PushEvent", "repo": {"name": "r1"}}),
            json!({
                "id": "3",
                "type": "PullRequestEvent",
                "repo": {"name": "r1"},
                "payload": {"action": "opened"}
            }),
        ]
    }

    #[test]
    fn counts_per_repo_and_type() {
        let aggregation = aggregate(&sample_events());
        assert!(aggregation.skipped.is_empty());

        let r1 = &aggregation.counts["r1"];
        assert_eq!(r1["PushEvent"], TypeCount::Total(2));
        assert_eq!(
            r1[PULL_REQUEST_EVENT],
            TypeCount::ByAction(ActionCounts::from([("opened".to_string(), 1)]))
        );
    }

    #[test]
    fn repo_set_matches_input() {
        let events = vec![
            json!({"id": "1", "type": "CreateEvent", "repo": {"name": "a"}}),
            json!({"id": "2", "type": "PushEvent", "repo": {"name": "b"}}),
            json!({"id": "3", "type": "WatchEvent", "repo": {"name": "a"}}),
        ];
        let aggregation = aggregate(&events);
        let repos: Vec<&str> = aggregation.counts.keys().map(String::as_str).collect();
        assert_eq!(repos, vec!["a", "b"]);
    }

    #[test]
    fn pull_request_actions_counted_separately() {
        let events = vec![
            json!({"id": "1", "type": "PullRequestEvent", "repo": {"name": "r"}, "payload": {"action": "opened"}}),
            json!({"id": "2", "type": "PullRequestEvent", "repo": {"name": "r"}, "payload": {"action": "closed"}}),
            json!({"id": "3", "type": "PullRequestEvent", "repo": {"name": "r"}, "payload": {"action": "opened"}}),
        ];
        let aggregation = aggregate(&events);
        assert_eq!(
            aggregation.counts["r"][PULL_REQUEST_EVENT],
            TypeCount::ByAction(ActionCounts::from([
                ("closed".to_string(), 1),
                ("opened".to_string(), 2),
            ]))
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let events = sample_events();
        assert_eq!(aggregate(&events).counts, aggregate(&events).counts);
    }

    #[test]
    fn malformed_records_are_skipped_and_reported() {
        let events = vec![
            json!({"id": "1", "repo": {"name": "r1"}}),
            json!({"id": "2", "type": "PushEvent"}),
            json!({"id": "3", "type": "PullRequestEvent", "repo": {"name": "r2"}, "payload": {}}),
            json!({"id": "4", "type": "PushEvent", "repo": {"name": "r2"}}),
        ];
        let aggregation = aggregate(&events);

        assert_eq!(
            aggregation.skipped,
            vec![
                MalformedEvent {
                    id: Some("1".to_string()),
                    field: "type"
                },
                MalformedEvent {
                    id: Some("2".to_string()),
                    field: "repo.name"
                },
                MalformedEvent {
                    id: Some("3".to_string()),
                    field: "payload.action"
                },
            ]
        );
        // r1 was seen, so it still gets an (empty) entry
        assert!(aggregation.counts["r1"].is_empty());
        assert_eq!(aggregation.counts["r2"]["PushEvent"], TypeCount::Total(1));
    }

    #[test]
    fn empty_feed_yields_empty_map() {
        let aggregation = aggregate(&[]);
        assert!(aggregation.counts.is_empty());
        assert!(aggregation.skipped.is_empty());
    }

    #[test]
    fn count_map_serializes_as_nested_json() {
        let aggregation = aggregate(&sample_events());
        let json = serde_json::to_value(&aggregation.counts).unwrap();
        assert_eq!(
            json,
            json!({"r1": {"PushEvent": 2, "PullRequestEvent": {"opened": 1}}})
        );
    }
}
