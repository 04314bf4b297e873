//! Lifecycle states of one recursive crawl invocation
//!
//! An invocation is identified by (target URL, remaining depth budget) and only
//! exists while its recursive call is in flight.
use std::fmt;

/// Represents the current state of a crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationState {
    // ===== Active States =====
    /// Created with a URL and depth budget
    Pending,

    /// Checking the visited set and depth budget
    Claiming,

    /// Waiting on the network fetch and document extraction
    Fetching,

    /// Sending the page to the result stream
    Emitting,

    /// Starting one sub-crawl per extracted link
    Spawning,

    /// Waiting for every sub-crawl to finish
    Joining,

    // ===== Terminal States =====
    /// Depth exhausted or URL already claimed; no work done
    Skipped,

    /// Page emitted and all descendants finished
    Done,

    /// Fetch or parse failed for this page
    Failed,
}

impl InvocationState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Done | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: InvocationState) -> bool {
        use InvocationState::*;

        matches!(
            (*self, next),
            (Pending, Claiming)
                | (Claiming, Skipped)
                | (Claiming, Fetching)
                | (Fetching, Skipped)
                | (Fetching, Failed)
                | (Fetching, Emitting)
                | (Emitting, Spawning)
                | (Emitting, Failed)
                | (Spawning, Joining)
                | (Joining, Done)
                | (Joining, Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claiming => "claiming",
            Self::Fetching => "fetching",
            Self::Emitting => "emitting",
            Self::Spawning => "spawning",
            Self::Joining => "joining",
            Self::Skipped => "skipped",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
