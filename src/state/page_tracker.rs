//! Per-page state tracking
//!
//! A `PageTracker` follows one listing page through the walk and refuses any
//! step that `PageState::can_transition_to` does not allow.

use crate::state::PageState;
use crate::CrawlError;

/// Tracks the state of the page currently being walked
#[derive(Debug, Clone)]
pub struct PageTracker {
    page_number: u32,
    state: PageState,
    history: Vec<PageState>,
}

impl PageTracker {
    /// Starts tracking a page in the `Fetching` state
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            state: PageState::Fetching,
            history: vec![PageState::Fetching],
        }
    }

    /// Moves the page to `next`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The step was legal and has been recorded
    /// * `Err(CrawlError::InvalidTransition)` - The step is not allowed
    pub fn advance(&mut self, next: PageState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(next) {
            return Err(CrawlError::InvalidTransition {
                page: self.page_number,
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("Page {}: {} -> {}", self.page_number, self.state, next);
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Returns the page number being tracked
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Returns the current state
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Returns every state the page has been in, oldest first
    pub fn history(&self) -> &[PageState] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_fetching() {
        let tracker = PageTracker::new(4);
        assert_eq!(tracker.page_number(), 4);
        assert_eq!(tracker.state(), PageState::Fetching);
        assert_eq!(tracker.history(), &[PageState::Fetching]);
    }

    #[test]
    fn test_records_full_fallback_history() {
        let mut tracker = PageTracker::new(1);
        tracker.advance(PageState::Fetching).unwrap();
        tracker.advance(PageState::Extracting).unwrap();
        tracker.advance(PageState::NeedsFallback).unwrap();
        tracker.advance(PageState::FallbackRendering).unwrap();
        tracker.advance(PageState::Emitting).unwrap();
        tracker.advance(PageState::Emitted).unwrap();

        assert_eq!(tracker.history().len(), 7);
        assert!(tracker.state().is_success());
    }

    #[test]
    fn test_rejects_illegal_step() {
        let mut tracker = PageTracker::new(9);
        let err = tracker.advance(PageState::Emitted).unwrap_err();

        match err {
            CrawlError::InvalidTransition { page, from, to } => {
                assert_eq!(page, 9);
                assert_eq!(from, PageState::Fetching);
                assert_eq!(to, PageState::Emitted);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // State is unchanged after a rejected step
        assert_eq!(tracker.state(), PageState::Fetching);
    }
}
