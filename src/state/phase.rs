//! Crawl controller phases
//!
//! This module defines the phases a crawl run moves through and which
//! transitions between them are legal.

use crate::RippleError;
use std::fmt;

/// Represents the current phase of a crawl run
///
/// `Idle → FetchingLevel(0) → … → FetchingLevel(d) → Draining → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing fetched yet
    Idle,

    /// Fetching every page queued at the given depth
    FetchingLevel(u32),

    /// No further levels will start; output is being flushed
    Draining,

    /// Output is durable and the run is over
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (*self, next) {
            (Self::Idle, Self::FetchingLevel(0)) => true,
            (Self::Idle, Self::Draining) => true,
            (Self::FetchingLevel(d), Self::FetchingLevel(n)) => n == d + 1,
            (Self::FetchingLevel(_), Self::Draining) => true,
            (Self::Draining, Self::Done) => true,
            _ => false,
        }
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), RippleError> {
        if !self.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Returns the level being fetched, if any
    pub fn level(&self) -> Option<u32> {
        match self {
            Self::FetchingLevel(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::FetchingLevel(d) => write!(f, "fetching level {}", d),
            Self::Draining => write!(f, "draining"),
            Self::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut phase = CrawlPhase::Idle;
        phase.transition(CrawlPhase::FetchingLevel(0)).unwrap();
        phase.transition(CrawlPhase::FetchingLevel(1)).unwrap();
        phase.transition(CrawlPhase::FetchingLevel(2)).unwrap();
        assert_eq!(phase.level(), Some(2));
        phase.transition(CrawlPhase::Draining).unwrap();
        phase.transition(CrawlPhase::Done).unwrap();
        assert!(phase.is_done());
    }

    #[test]
    fn test_levels_cannot_be_skipped() {
        let phase = CrawlPhase::FetchingLevel(1);
        assert!(!phase.can_transition_to(CrawlPhase::FetchingLevel(3)));
        assert!(!phase.can_transition_to(CrawlPhase::FetchingLevel(1)));
        assert!(!phase.can_transition_to(CrawlPhase::FetchingLevel(0)));
    }

    #[test]
    fn test_idle_must_start_at_level_zero() {
        assert!(!CrawlPhase::Idle.can_transition_to(CrawlPhase::FetchingLevel(1)));
        assert!(!CrawlPhase::Idle.can_transition_to(CrawlPhase::Done));
    }

    #[test]
    fn test_invalid_transition_error() {
        let mut phase = CrawlPhase::Done;
        let err = phase.transition(CrawlPhase::FetchingLevel(0)).unwrap_err();
        assert!(matches!(
            err,
            RippleError::InvalidTransition {
                from: CrawlPhase::Done,
                to: CrawlPhase::FetchingLevel(0)
            }
        ));
        // Phase is unchanged after a rejected transition
        assert_eq!(phase, CrawlPhase::Done);
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::FetchingLevel(3).to_string(), "fetching level 3");
        assert_eq!(CrawlPhase::Draining.to_string(), "draining");
    }
}
