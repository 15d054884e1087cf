/// Counter handed to repeating animation ticks.
///
/// Frames are counted, not timed, so tick logic stays deterministic under
/// test clocks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
}

impl Frame {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1)
    }
}
