//! Minimal-delta reconciliation of desired vs. current records.
//!
//! Before writing to the portal, drover compares the desired record against
//! what the portal already holds and only issues an update when at least one
//! field actually differs. Callers branch on [`Reconciliation::changed`]
//! to distinguish "nothing to write" from a real delta.

use serde_json::Value;
use tracing::info;

use crate::models::JsonMap;

/// Old values are truncated to this many characters in change logs.
const LOG_VALUE_LIMIT: usize = 500;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The current record with every differing desired field applied.
    pub merged: JsonMap,
    /// Whether this invocation changed anything.
    pub changed: bool,
    /// Number of fields changed by this invocation.
    pub edits: usize,
}

/// Field-level reconciler with a cumulative edit counter.
///
/// The counter accumulates across calls on the same instance, which lets a
/// caller drive several reconciliation passes and inspect the total number
/// of edits at the end.
///
/// # Examples
///
/// ```
/// use drover_core::Reconciler;
/// use serde_json::json;
///
/// let current = json!({"notes": "old"}).as_object().cloned().unwrap();
/// let desired = json!({"notes": "new"}).as_object().cloned().unwrap();
///
/// let mut reconciler = Reconciler::new();
/// let outcome = reconciler.reconcile(&current, Some(&desired));
/// assert!(outcome.changed);
/// assert_eq!(outcome.merged["notes"], "new");
/// assert_eq!(reconciler.edit_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Reconciler {
    edit_count: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `desired` into `current`, counting changed fields.
    ///
    /// A field counts as changed when it is absent from `current` or holds
    /// a different value. Fields of `current` not named in `desired` are
    /// preserved verbatim. When `desired` is `None` the current record is
    /// returned unchanged and nothing is counted.
    pub fn reconcile(&mut self, current: &JsonMap, desired: Option<&JsonMap>) -> Reconciliation {
        let mut merged = current.clone();
        let mut edits = 0;

        if let Some(desired) = desired {
            for (key, new_value) in desired {
                if current.get(key) != Some(new_value) {
                    let old_value = current
                        .get(key)
                        .map(Value::to_string)
                        .unwrap_or_default();
                    let old_shown: String = old_value.chars().take(LOG_VALUE_LIMIT).collect();
                    info!("Modify \"{}\": {} -> {}", key, old_shown, new_value);
                    merged.insert(key.clone(), new_value.clone());
                    edits += 1;
                }
            }
        }

        self.edit_count += edits;
        if edits > 0 {
            info!("{} edits made", self.edit_count);
        }

        Reconciliation {
            merged,
            changed: edits > 0,
            edits,
        }
    }

    /// Total number of edits made across all calls on this instance.
    pub fn edit_count(&self) -> usize {
        self.edit_count
    }

    /// Overwrites the cumulative counter.
    pub fn set_edit_count(&mut self, count: usize) {
        self.edit_count = count;
    }
}

/// One-shot reconciliation without tracking a cumulative counter.
pub fn reconcile(current: &JsonMap, desired: Option<&JsonMap>) -> Reconciliation {
    Reconciler::new().reconcile(current, desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_changed_value_counts() {
        let mut reconciler = Reconciler::new();
        let outcome = reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"a": 2}))));
        assert_eq!(outcome.merged, map(json!({"a": 2})));
        assert!(outcome.changed);
        assert_eq!(reconciler.edit_count(), 1);
    }

    #[test]
    fn test_new_key_counts() {
        let mut reconciler = Reconciler::new();
        let outcome = reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"b": 2}))));
        assert_eq!(outcome.merged, map(json!({"a": 1, "b": 2})));
        assert_eq!(reconciler.edit_count(), 1);
    }

    #[test]
    fn test_multiple_changes_counted() {
        let mut reconciler = Reconciler::new();
        let outcome =
            reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"a": 2, "b": 2}))));
        assert_eq!(outcome.merged, map(json!({"a": 2, "b": 2})));
        assert_eq!(outcome.edits, 2);
        assert_eq!(reconciler.edit_count(), 2);
    }

    #[test]
    fn test_no_change() {
        let mut reconciler = Reconciler::new();
        let outcome = reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"a": 1}))));
        assert_eq!(outcome.merged, map(json!({"a": 1})));
        assert!(!outcome.changed);
        assert_eq!(reconciler.edit_count(), 0);
    }

    #[test]
    fn test_absent_desired_is_noop() {
        let mut reconciler = Reconciler::new();
        let outcome = reconciler.reconcile(&map(json!({"a": 1})), None);
        assert_eq!(outcome.merged, map(json!({"a": 1})));
        assert!(!outcome.changed);
        assert_eq!(reconciler.edit_count(), 0);
    }

    #[test]
    fn test_counter_accumulates_across_calls() {
        let mut reconciler = Reconciler::new();
        let first = reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"b": 2}))));
        assert_eq!(first.merged, map(json!({"a": 1, "b": 2})));
        let second = reconciler.reconcile(&map(json!({"a": 1})), Some(&map(json!({"c": 3}))));
        assert_eq!(second.merged, map(json!({"a": 1, "c": 3})));
        assert_eq!(second.edits, 1);
        assert_eq!(reconciler.edit_count(), 2);
    }

    #[test]
    fn test_set_edit_count() {
        let mut reconciler = Reconciler::new();
        reconciler.set_edit_count(2);
        assert_eq!(reconciler.edit_count(), 2);
    }

    #[test]
    fn test_unlisted_keys_preserved() {
        let mut reconciler = Reconciler::new();
        let current = map(json!({"a": 1, "kept": "yes"}));
        let outcome = reconciler.reconcile(&current, Some(&map(json!({"a": 2}))));
        assert_eq!(outcome.merged["kept"], "yes");
    }

    #[test]
    fn test_one_shot_reconcile() {
        let outcome = reconcile(&map(json!({"a": 1})), Some(&map(json!({"a": 2}))));
        assert!(outcome.changed);
        assert_eq!(outcome.edits, 1);
    }
}
