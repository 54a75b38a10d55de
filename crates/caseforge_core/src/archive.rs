//! crates/caseforge_core/src/archive.rs
//!
//! Incremental pagination for the archive view: one page on mount, one more
//! each time the sentinel at the bottom of the list becomes visible.

use crate::domain::ArchiveItem;

pub const PAGE_SIZE: usize = 10;

pub struct ArchivePager {
    source: Vec<ArchiveItem>,
    displayed: Vec<ArchiveItem>,
    next_page: usize,
    // Set only while `load_more` runs. Loads complete synchronously, so callers never observe it.
    loading: bool,
}

impl ArchivePager {
    /// Creates the pager and loads the first page.
    pub fn new(source: Vec<ArchiveItem>) -> Self {
        let mut pager = Self {
            source,
            displayed: Vec::new(),
            next_page: 0,
            loading: false,
        };
        pager.load_more();
        pager
    }

    /// Called when the sentinel's visibility changes. Returns how many items were appended.
    pub fn on_sentinel_visible(&mut self, visible: bool) -> usize {
        if !visible || self.loading {
            return 0;
        }
        self.load_more()
    }

    fn load_more(&mut self) -> usize {
        if self.is_exhausted() {
            return 0;
        }
        self.loading = true;
        let start = self.next_page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.source.len());
        self.displayed.extend_from_slice(&self.source[start..end]);
        self.next_page += 1;
        self.loading = false;
        end - start
    }

    pub fn displayed(&self) -> &[ArchiveItem] {
        &self.displayed
    }

    /// True once every source item is on screen.
    pub fn is_exhausted(&self) -> bool {
        self.next_page * PAGE_SIZE >= self.source.len()
    }
}

/// Placeholder archive content until stored case studies feed the view.
pub fn sample_items() -> Vec<ArchiveItem> {
    const TOPICS: &[(&str, &str)] = &[
        ("Apple Health Steps", "Sizing the daily steps tracking feature"),
        ("Quick Commerce Churn", "Diagnosing a drop in repeat grocery orders"),
        ("Neobank Onboarding", "Reducing KYC drop-off for a FinTech app"),
        ("EdTech Pricing", "Choosing between freemium and trial models"),
        ("Ride Surge Complaints", "Balancing driver supply against rider trust"),
        ("Hotel Direct Booking", "Winning bookings back from aggregators"),
        ("Telecom Plan Redesign", "Simplifying a sprawling prepaid catalogue"),
        ("Warehouse Throughput", "Finding the bottleneck in same-day dispatch"),
        ("Streaming Retention", "Cutting cancellations after a price rise"),
        ("Clinic Scheduling", "Reducing no-shows at outpatient clinics"),
        ("Solar Lead Funnel", "Qualifying residential rooftop leads"),
        ("Public Grievance Portal", "Triage for a city complaints system"),
    ];
    TOPICS
        .iter()
        .cycle()
        .take(25)
        .enumerate()
        .map(|(i, (name, description))| ArchiveItem {
            name: format!("{} #{}", name, i + 1),
            description: description.to_string(),
        })
        .collect()
}
