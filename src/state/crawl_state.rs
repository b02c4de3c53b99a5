/// Crawl scheduler state machine
///
/// ```text
/// Idle -> Running -> Draining -> Running
///            |           |
///            +--> Done <-+
/// ```
use std::fmt;

/// The lifecycle of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Frontier seeded, nothing fetched yet
    Idle,

    /// Taking the next wave from the frontier
    Running,

    /// Waiting for every worker of the current wave to finish
    Draining,

    /// Frontier exhausted or deadline hit; terminal
    Done,
}

impl CrawlState {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Draining -> Done` is only taken when a hard deadline expires mid-wave.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Running)
                | (Self::Draining, Self::Done)
        )
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}
