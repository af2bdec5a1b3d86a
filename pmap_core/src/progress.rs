/// Sink for pipeline progress, one update per block.
///
/// Purely observational: implementations render status however they like
/// (the CLI draws a console bar) and carry no correctness logic. The drivers
/// call [`update`](Progress::update) with `done` in `1..=total` and never
/// consult the sink for anything.
pub trait Progress {
    fn update(&mut self, done: u64, total: u64);
}

/// Discards all updates. Used by tests and `--quiet` runs.
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _done: u64, _total: u64) {}
}
