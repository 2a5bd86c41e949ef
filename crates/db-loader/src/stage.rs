//! Lifecycle of a single load.
//!
//! ```text
//! NotStarted -> FileRemoved -> Created -> ScriptExecuted -> Verified
//!      \             \            \              \
//!       `-------------`------------`--------------`--> Failed
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStage {
    NotStarted,
    /// Any previous database file at the target path is gone
    FileRemoved,
    /// A fresh, empty database is open
    Created,
    /// The whole script ran
    ScriptExecuted,
    /// Row counts were read back from every table
    Verified,
    Failed,
}

impl LoadStage {
    /// The stage a successful step moves to, if any
    pub fn next(self) -> Option<LoadStage> {
        match self {
            LoadStage::NotStarted => Some(LoadStage::FileRemoved),
            LoadStage::FileRemoved => Some(LoadStage::Created),
            LoadStage::Created => Some(LoadStage::ScriptExecuted),
            LoadStage::ScriptExecuted => Some(LoadStage::Verified),
            LoadStage::Verified | LoadStage::Failed => None,
        }
    }
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStage::NotStarted => "not started",
            LoadStage::FileRemoved => "file removed",
            LoadStage::Created => "created",
            LoadStage::ScriptExecuted => "script executed",
            LoadStage::Verified => "verified",
            LoadStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why and where a load stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Last stage that completed before the failing step
    pub last_completed: LoadStage,
    pub cause: String,
}
