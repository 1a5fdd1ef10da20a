use serde::{Deserialize, Serialize};

use super::domain::{ApprovalStatus, ReportId, ReportSummaryView, ServiceReport};
use crate::workflows::travel::domain::OriginChannel;

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Reviewer-side narrowing of the merged queue. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueFilter {
    #[serde(default)]
    pub status: Option<ApprovalStatus>,
    #[serde(default)]
    pub origin_channel: Option<OriginChannel>,
    #[serde(default)]
    pub search: Option<String>,
}

impl QueueFilter {
    pub fn matches(&self, report: &ServiceReport) -> bool {
        if self.status.is_some_and(|status| status != report.status()) {
            return false;
        }
        if self
            .origin_channel
            .is_some_and(|channel| channel != report.origin_channel)
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    report.id.0.as_str(),
                    report.submitter_name.as_str(),
                    report.kind().label(),
                ]
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Snapshot of both channel queues as last returned by the report service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewQueue {
    reports: Vec<ServiceReport>,
}

impl ReviewQueue {
    /// Merge per-channel listings into one queue, newest submission first.
    pub fn merge<I>(channels: I) -> Self
    where
        I: IntoIterator<Item = Vec<ServiceReport>>,
    {
        let mut reports: Vec<ServiceReport> = channels.into_iter().flatten().collect();
        reports.sort_by(|a, b| {
            b.date_submitted
                .cmp(&a.date_submitted)
                .then_with(|| a.origin_channel.cmp(&b.origin_channel))
                .then_with(|| b.id.sequence_cmp(&a.id))
        });
        Self { reports }
    }

    pub fn reports(&self) -> &[ServiceReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn find(&self, id: &ReportId, channel: OriginChannel) -> Option<&ServiceReport> {
        self.reports
            .iter()
            .find(|report| &report.id == id && report.origin_channel == channel)
    }

    pub fn filtered<'a>(
        &'a self,
        filter: &'a QueueFilter,
    ) -> impl Iterator<Item = &'a ServiceReport> + 'a {
        self.reports.iter().filter(move |report| filter.matches(report))
    }

    pub fn pending_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| report.status() == ApprovalStatus::Pending)
            .count()
    }

    /// One page of the filtered queue. Pages are 1-based; page 0 is read as page 1 and pages past
    /// the end come back empty.
    pub fn page(&self, filter: &QueueFilter, page: usize, page_size: usize) -> QueuePage {
        let page_size = page_size.max(1);
        let page = page.max(1);
        let matching: Vec<&ServiceReport> = self.filtered(filter).collect();
        let total_items = matching.len();
        let total_pages = total_items.div_ceil(page_size).max(1);

        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .map(ServiceReport::summary_view)
            .collect();

        QueuePage {
            page,
            page_size,
            total_items,
            total_pages,
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuePage {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub items: Vec<ReportSummaryView>,
}
