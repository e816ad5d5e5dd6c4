/// Page state definitions for tracking a single listing page
///
/// This module defines every state a listing page passes through between its
/// first request and its final outcome.
use std::fmt;

/// Represents the current state of a listing page in the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page is being requested through the lightweight fetcher
    Fetching,

    /// Fetched content is being parsed for links and count
    Extracting,

    /// Lightweight extraction found no links
    NeedsFallback,

    /// Page is being loaded through the rendering engine
    FallbackRendering,

    /// Records are being built and handed to the sink
    Emitting,

    // ===== Terminal Success States =====
    /// All records for the page were emitted
    Emitted,

    // ===== Terminal Error States =====
    /// Neither the lightweight fetch nor the rendered load produced links
    FallbackEmpty,

    /// Every fetch attempt failed and the retry budget is spent
    Exhausted,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Emitted | Self::FallbackEmpty | Self::Exhausted)
    }

    /// Returns true if this is an active state (page may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Emitted)
    }

    /// Returns true if the page was given up on
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::FallbackEmpty | Self::Exhausted)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// `Fetching -> Fetching` is the retry edge.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        use PageState::*;

        matches!(
            (self, next),
            (Fetching, Fetching)
                | (Fetching, Extracting)
                | (Fetching, Exhausted)
                | (Extracting, Emitting)
                | (Extracting, NeedsFallback)
                | (NeedsFallback, FallbackRendering)
                | (FallbackRendering, Emitting)
                | (FallbackRendering, FallbackEmpty)
                | (Emitting, Emitted)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::NeedsFallback => "needs_fallback",
            Self::FallbackRendering => "fallback_rendering",
            Self::Emitting => "emitting",
            Self::Emitted => "emitted",
            Self::FallbackEmpty => "fallback_empty",
            Self::Exhausted => "exhausted",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::Extracting,
            Self::NeedsFallback,
            Self::FallbackRendering,
            Self::Emitting,
            Self::Emitted,
            Self::FallbackEmpty,
            Self::Exhausted,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Fetching.is_terminal());
        assert!(!PageState::Extracting.is_terminal());
        assert!(!PageState::NeedsFallback.is_terminal());
        assert!(!PageState::FallbackRendering.is_terminal());
        assert!(!PageState::Emitting.is_terminal());

        assert!(PageState::Emitted.is_terminal());
        assert!(PageState::FallbackEmpty.is_terminal());
        assert!(PageState::Exhausted.is_terminal());
    }

    #[test]
    fn test_success_and_abandoned_are_disjoint() {
        for state in PageState::all_states() {
            assert!(!(state.is_success() && state.is_abandoned()), "{:?}", state);
        }
        assert!(PageState::Emitted.is_success());
        assert!(PageState::Exhausted.is_abandoned());
        assert!(PageState::FallbackEmpty.is_abandoned());
    }

    #[test]
    fn test_lightweight_path() {
        assert!(PageState::Fetching.can_transition_to(PageState::Extracting));
        assert!(PageState::Extracting.can_transition_to(PageState::Emitting));
        assert!(PageState::Emitting.can_transition_to(PageState::Emitted));
    }

    #[test]
    fn test_fallback_path() {
        assert!(PageState::Extracting.can_transition_to(PageState::NeedsFallback));
        assert!(PageState::NeedsFallback.can_transition_to(PageState::FallbackRendering));
        assert!(PageState::FallbackRendering.can_transition_to(PageState::Emitting));
        assert!(PageState::FallbackRendering.can_transition_to(PageState::FallbackEmpty));
    }

    #[test]
    fn test_retry_edge() {
        assert!(PageState::Fetching.can_transition_to(PageState::Fetching));
        assert!(PageState::Fetching.can_transition_to(PageState::Exhausted));
        assert!(!PageState::Extracting.can_transition_to(PageState::Fetching));
    }

    #[test]
    fn test_no_skipping_the_fallback() {
        assert!(!PageState::Extracting.can_transition_to(PageState::FallbackRendering));
        assert!(!PageState::NeedsFallback.can_transition_to(PageState::Emitting));
        assert!(!PageState::Fetching.can_transition_to(PageState::Emitting));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in PageState::all_states().into_iter().filter(|s| s.is_terminal()) {
            for to in PageState::all_states() {
                assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Fetching), "fetching");
        assert_eq!(format!("{}", PageState::FallbackEmpty), "fallback_empty");
    }

    #[test]
    fn test_all_states_complete() {
        let all = PageState::all_states();
        assert_eq!(all.len(), 8);

        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert_ne!(all[i], all[j], "Duplicate state found");
            }
        }
    }
}
