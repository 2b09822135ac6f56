//! Process-wide cache of enumerated field options.
//!
//! # Design
//! - Owned object created at startup and shared through `Arc`; no globals.
//! - A refresh clears the cache before fetching, so a failed fetch leaves it
//!   empty and callers fall back to free text.
//! - Refreshes are not serialized against lookups. A lookup racing a refresh
//!   may see stale or empty data, which degrades to the free-text branch.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use intake_telemetry::Metrics;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{FieldDefinition, FieldOption};
use crate::tracker::TaskTracker;

/// Cached options of one enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedField {
    /// Field display name.
    pub name: String,
    /// The field takes a list of option ids.
    pub multi_select: bool,
    /// Options in tracker order.
    pub options: Vec<FieldOption>,
}

/// Cache of option sets keyed by field id.
pub struct OptionCache {
    entries: RwLock<HashMap<String, CachedField>>,
    metrics: Metrics,
}

impl OptionCache {
    /// Construct an empty cache.
    #[must_use]
    pub fn new(metrics: Metrics) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Rebuild the whole cache from a single field listing.
    ///
    /// Fetch failures are logged and leave the cache empty.
    pub async fn refresh(&self, tracker: &dyn TaskTracker) {
        self.write().clear();
        let Some(fields) = self.fetch(tracker).await else {
            self.metrics.set_option_cache_fields(0);
            return;
        };

        let fresh: HashMap<String, CachedField> = fields
            .into_iter()
            .filter(FieldDefinition::is_enumerated)
            .map(|field| {
                (
                    field.id.clone(),
                    CachedField {
                        multi_select: field.is_multi_select(),
                        name: field.name,
                        options: field.options,
                    },
                )
            })
            .collect();
        let count = fresh.len();
        *self.write() = fresh;
        self.metrics.set_option_cache_fields(count);
        debug!(fields = count, "option cache refreshed");
    }

    /// Re-fetch the field listing and replace only `field_id`'s entry.
    pub async fn refresh_field(&self, tracker: &dyn TaskTracker, field_id: &str) {
        self.write().remove(field_id);
        let Some(fields) = self.fetch(tracker).await else {
            return;
        };

        let mut guard = self.write();
        if let Some(field) = fields
            .into_iter()
            .find(|field| field.id == field_id && field.is_enumerated())
        {
            guard.insert(
                field.id.clone(),
                CachedField {
                    multi_select: field.is_multi_select(),
                    name: field.name,
                    options: field.options,
                },
            );
        }
        let count = guard.len();
        drop(guard);
        self.metrics.set_option_cache_fields(count);
    }

    /// Cached options for `field_id`, or an empty list when unknown.
    #[must_use]
    pub fn lookup(&self, field_id: &str) -> Vec<FieldOption> {
        self.read()
            .get(field_id)
            .map(|field| field.options.clone())
            .unwrap_or_default()
    }

    /// Whether `field_id` is a cached multi-select field.
    #[must_use]
    pub fn is_multi_select(&self, field_id: &str) -> bool {
        self.read()
            .get(field_id)
            .is_some_and(|field| field.multi_select)
    }

    /// Whether `field_id` currently has cached options.
    #[must_use]
    pub fn is_enumerated(&self, field_id: &str) -> bool {
        self.read().contains_key(field_id)
    }

    /// Copy of the full cache, ordered by field id.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, CachedField> {
        self.read()
            .iter()
            .map(|(id, field)| (id.clone(), field.clone()))
            .collect()
    }

    /// Number of cached enumerated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    async fn fetch(&self, tracker: &dyn TaskTracker) -> Option<Vec<FieldDefinition>> {
        match tracker.list_fields().await {
            Ok(fields) => {
                self.metrics.inc_option_cache_refresh("ok");
                Some(fields)
            }
            Err(err) => {
                self.metrics.inc_option_cache_refresh("failed");
                warn!(error = %err, detail = %err.detail(), "option cache refresh failed; continuing with empty cache");
                None
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CachedField>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CachedField>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubTracker, dropdown, text_field};

    fn metrics() -> anyhow::Result<Metrics> {
        Metrics::new()
    }

    #[tokio::test]
    async fn refresh_keeps_only_enumerated_fields() -> anyhow::Result<()> {
        let tracker = StubTracker::with_fields(vec![
            dropdown("cf-edu", "Education", &[("o1", "High school"), ("o2", "Bachelor")]),
            text_field("cf-email", "Email"),
        ]);
        let cache = OptionCache::new(metrics()?);
        cache.refresh(&tracker).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.is_enumerated("cf-edu"));
        assert!(!cache.is_enumerated("cf-email"));
        let names: Vec<String> = cache
            .lookup("cf-edu")
            .into_iter()
            .map(|option| option.name)
            .collect();
        assert_eq!(names, vec!["High school", "Bachelor"]);
        assert!(cache.lookup("cf-unknown").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn failed_refresh_leaves_cache_empty() -> anyhow::Result<()> {
        let tracker = StubTracker::with_fields(vec![dropdown("cf-edu", "Education", &[("o1", "PhD")])]);
        let metrics = metrics()?;
        let cache = OptionCache::new(metrics.clone());
        cache.refresh(&tracker).await;
        assert!(!cache.is_empty());

        tracker.fail_listing(502);
        cache.refresh(&tracker).await;
        assert!(cache.is_empty());
        assert_eq!(metrics.snapshot().option_cache_refreshes_failed, 1);
        assert_eq!(metrics.snapshot().option_cache_fields, 0);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_replaces_previous_contents_wholesale() -> anyhow::Result<()> {
        let tracker = StubTracker::with_fields(vec![
            dropdown("cf-a", "A", &[("a1", "One")]),
            dropdown("cf-b", "B", &[("b1", "Two")]),
        ]);
        let cache = OptionCache::new(metrics()?);
        cache.refresh(&tracker).await;
        assert_eq!(cache.len(), 2);

        tracker.set_fields(vec![dropdown("cf-b", "B", &[("b2", "Three")])]);
        cache.refresh(&tracker).await;
        assert!(!cache.is_enumerated("cf-a"));
        assert_eq!(cache.lookup("cf-b")[0].id, "b2");
        Ok(())
    }

    #[tokio::test]
    async fn refresh_field_touches_a_single_entry() -> anyhow::Result<()> {
        let tracker = StubTracker::with_fields(vec![
            dropdown("cf-a", "A", &[("a1", "One")]),
            dropdown("cf-b", "B", &[("b1", "Two")]),
        ]);
        let cache = OptionCache::new(metrics()?);
        cache.refresh(&tracker).await;

        tracker.set_fields(vec![
            dropdown("cf-a", "A", &[("a9", "Nine")]),
            dropdown("cf-b", "B", &[("b9", "Nine")]),
        ]);
        cache.refresh_field(&tracker, "cf-a").await;
        assert_eq!(cache.lookup("cf-a")[0].id, "a9");
        assert_eq!(cache.lookup("cf-b")[0].id, "b1");

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["cf-a", "cf-b"]);
        Ok(())
    }
}
