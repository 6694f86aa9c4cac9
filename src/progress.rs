// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One item (a game page) finished.
    fn item_done(&mut self, _id: u32, _name: &str) {}

    /// One item failed; the run goes on.
    fn item_failed(&mut self, _id: u32, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
