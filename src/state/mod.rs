//! State module for tracking walk progress
//!
//! # Components
//!
//! - `PageState`: The states a listing page moves through (fetching, extracting, fallback, emitted, etc.)
//! - `PageTracker`: Follows one page and validates each transition

mod page_state;
mod page_tracker;

// Re-export main types
pub use page_state::PageState;
pub use page_tracker::PageTracker;
