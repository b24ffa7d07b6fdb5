//! Buffer pool frame identifiers.

/// Identifier for a frame within the buffer pool.
///
/// FrameId is an index into the pool's frame array. The replacer tracks
/// frames by this identity and the page table maps pages to it; the frames
/// themselves are owned by the buffer pool manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

impl FrameId {
    /// Creates a new FrameId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the frame index.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for FrameId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
