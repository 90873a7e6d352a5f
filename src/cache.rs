//! Per-tab report cache
//!
//! Panels opened after an inspection show the last report for their tab.
//! A report describes one page load, so it is dropped as soon as the tab
//! finishes loading something new.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::InspectConfig;
use crate::report::PageReport;

/// Browser tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab {}", self.0)
    }
}

/// Load status reported by tab-update events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Shared LRU of the most recent report per tab
#[derive(Clone)]
pub struct ReportCache {
    reports: Arc<Mutex<LruCache<TabId, Arc<PageReport>>>>,
}

impl ReportCache {
    #[must_use]
    pub fn new(config: &InspectConfig) -> Self {
        Self {
            reports: Arc::new(Mutex::new(LruCache::new(config.report_cache_capacity()))),
        }
    }

    #[must_use]
    pub fn get(&self, tab: TabId) -> Option<Arc<PageReport>> {
        // LruCache::get needs mutable access to update LRU order
        self.reports.lock().get(&tab).cloned()
    }

    /// Store the report for `tab`, replacing any earlier one
    pub fn insert(&self, tab: TabId, report: PageReport) -> Arc<PageReport> {
        let report = Arc::new(report);
        if let Some((evicted, _)) = self.reports.lock().push(tab, Arc::clone(&report))
            && evicted != tab
        {
            log::trace!("Report cache at capacity, evicted report for {evicted}");
        }
        report
    }

    /// React to a tab-update event
    ///
    /// A completed load invalidates the tab's report. Returns whether a
    /// report was dropped.
    pub fn on_tab_updated(&self, tab: TabId, status: TabStatus) -> bool {
        if status != TabStatus::Complete {
            return false;
        }
        let dropped = self.reports.lock().pop(&tab).is_some();
        if dropped {
            log::debug!("Dropped cached report for {tab} after navigation");
        }
        dropped
    }

    /// Forget a closed tab
    pub fn remove(&self, tab: TabId) {
        self.reports.lock().pop(&tab);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_report;
    use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals};

    fn report() -> PageReport {
        assemble_report(
            &DocumentSnapshot::default(),
            &PerformanceTimeline::default(),
            &ServiceSignals::default(),
            &InspectConfig::default(),
        )
    }

    #[test]
    fn test_complete_invalidates() {
        let cache = ReportCache::new(&InspectConfig::default());
        cache.insert(TabId(7), report());

        assert!(!cache.on_tab_updated(TabId(7), TabStatus::Loading));
        assert!(cache.get(TabId(7)).is_some());

        assert!(cache.on_tab_updated(TabId(7), TabStatus::Complete));
        assert!(cache.get(TabId(7)).is_none());
        assert!(!cache.on_tab_updated(TabId(7), TabStatus::Complete));
    }

    #[test]
    fn test_capacity_evicts_least_recent() {
        let config = InspectConfig::builder()
            .report_cache_capacity(2)
            .build()
            .unwrap();
        let cache = ReportCache::new(&config);
        cache.insert(TabId(1), report());
        cache.insert(TabId(2), report());
        let _ = cache.get(TabId(1));
        cache.insert(TabId(3), report());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(TabId(1)).is_some());
        assert!(cache.get(TabId(2)).is_none());
    }
}
