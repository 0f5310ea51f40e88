//! Sliding-window no-result-request tracking (was `RequestQueue`).

use std::collections::VecDeque;

use search_index::{Hit, Index, IndexError, Status};

const MINUTES_PER_DAY: usize = 1440;

/// Wraps an [`Index`] and records, over the trailing `MINUTES_PER_DAY`
/// requests, how many returned no hits.
///
/// The original C++ `RequestQueue` tracked this with two running counters
/// (`total_requests`, `no_result_requests`) nudged up or down on each call,
/// which drifts once more than `min_in_day_` requests have been made (the
/// counter only ever decrements by one per request regardless of how many
/// requests just aged out of the window). This keeps an explicit
/// `VecDeque<bool>` of the window instead, so the count is always exact.
pub struct RequestTracker<'a> {
    index: &'a Index,
    window: VecDeque<bool>,
    no_result_requests: usize,
}

impl<'a> RequestTracker<'a> {
    pub fn new(index: &'a Index) -> Self {
        Self { index, window: VecDeque::with_capacity(MINUTES_PER_DAY), no_result_requests: 0 }
    }

    /// Run `predicate`-filtered `find_top` through the tracker, recording
    /// whether it returned zero hits.
    pub fn add_find_request<F>(
        &mut self,
        raw_query: &str,
        predicate: F,
    ) -> Result<Vec<Hit>, IndexError>
    where
        F: Fn(i64, Status, i64) -> bool,
    {
        let hits = self.index.find_top(raw_query, predicate)?;
        self.record(hits.is_empty());
        Ok(hits)
    }

    /// `add_find_request` filtered to the given status.
    pub fn add_find_request_status(
        &mut self,
        raw_query: &str,
        status: Status,
    ) -> Result<Vec<Hit>, IndexError> {
        self.add_find_request(raw_query, |_, doc_status, _| doc_status == status)
    }

    /// `add_find_request` filtered to `Status::Actual` (the default).
    pub fn add_find_request_default(&mut self, raw_query: &str) -> Result<Vec<Hit>, IndexError> {
        self.add_find_request_status(raw_query, Status::Actual)
    }

    fn record(&mut self, was_no_result: bool) {
        if self.window.len() == MINUTES_PER_DAY {
            if self.window.pop_front() == Some(true) {
                self.no_result_requests -= 1;
            }
        }
        if was_no_result {
            self.no_result_requests += 1;
        }
        self.window.push_back(was_no_result);
        tracing::trace!(
            window_len = self.window.len(),
            no_result_requests = self.no_result_requests,
            "request tracked"
        );
    }

    /// Count of no-result requests within the trailing window.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }
}
