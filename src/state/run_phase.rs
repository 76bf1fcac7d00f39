//! Run phase definitions for one harvest
//!
//! A run moves strictly forward through these phases; the only shortcut is
//! from discovery straight to emission when no book IDs were found.

use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Walking listing pages and collecting book IDs
    Discovering,

    /// Fetching, parsing and saving each discovered book
    FetchingBooks,

    /// Barrier between fetch work and metadata emission
    Persisting,

    /// Writing `descriptions.json`
    Emitting,

    /// Terminal
    Done,
}

impl RunPhase {
    /// Returns true if the run may move from `self` to `next`
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        matches!(
            (self, next),
            (Self::Discovering, Self::FetchingBooks)
                | (Self::Discovering, Self::Emitting)
                | (Self::FetchingBooks, Self::Persisting)
                | (Self::Persisting, Self::Emitting)
                | (Self::Emitting, Self::Done)
        )
    }

    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovering => "discovering",
            Self::FetchingBooks => "fetching_books",
            Self::Persisting => "persisting",
            Self::Emitting => "emitting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
