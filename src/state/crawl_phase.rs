/// Phase definitions for the crawl state machine
///
/// This module defines every phase a run can be in and which transitions
/// between them are legal.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Discovery =====
    /// Nothing has been fetched yet
    Init,

    /// The index page was fetched
    IndexFetched,

    /// Crawl targets were extracted from the index page
    LinksDiscovered,

    // ===== Per-target cycle =====
    /// A detail page is being fetched
    Fetching,

    /// Non-content subtrees are being removed
    Cleaning,

    /// Structural text is being extracted
    Extracting,

    /// A record was appended to the output collection
    RecordAppended,

    // ===== Terminal =====
    /// Every target has been visited
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// A failed detail fetch goes straight from `Fetching` to the next
    /// target's `Fetching` (or to `Done` if it was the last one).
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Init, IndexFetched)
                | (IndexFetched, LinksDiscovered)
                | (LinksDiscovered, Fetching)
                | (LinksDiscovered, Done)
                | (Fetching, Cleaning)
                | (Fetching, Fetching)
                | (Fetching, Done)
                | (Cleaning, Extracting)
                | (Extracting, RecordAppended)
                | (RecordAppended, Fetching)
                | (RecordAppended, Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::IndexFetched => "index_fetched",
            Self::LinksDiscovered => "links_discovered",
            Self::Fetching => "fetching",
            Self::Cleaning => "cleaning",
            Self::Extracting => "extracting",
            Self::RecordAppended => "record_appended",
            Self::Done => "done",
        }
    }

    /// Returns all possible phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Init,
            Self::IndexFetched,
            Self::LinksDiscovered,
            Self::Fetching,
            Self::Cleaning,
            Self::Extracting,
            Self::RecordAppended,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
