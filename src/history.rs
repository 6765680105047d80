use image::RgbaImage;

/// A full copy of the drawing buffer at one point in time.
///
/// Snapshots own their pixels outright and are never mutated after capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn capture(buffer: &RgbaImage) -> Self {
        Self {
            pixels: buffer.clone(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Approximate heap size of the snapshot
    pub fn memory_size(&self) -> usize {
        self.pixels.as_raw().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Empty,
    HasHistory,
}

/// Snapshot-based undo stack. There is no redo.
#[derive(Debug, Default)]
pub struct History {
    /// Oldest first
    snapshots: Vec<Snapshot>,
    /// Maximum number of snapshots retained, `None` for unbounded
    limit: Option<usize>,
}

impl History {
    /// Creates a new empty, unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history that drops its oldest snapshot beyond `limit` entries
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            snapshots: Vec::new(),
            limit: limit.filter(|l| *l > 0),
        }
    }

    /// Capture a deep copy of `buffer` and push it on top of the stack
    pub fn snapshot(&mut self, buffer: &RgbaImage) {
        self.snapshots.push(Snapshot::capture(buffer));
        if let Some(limit) = self.limit {
            if self.snapshots.len() > limit {
                let excess = self.snapshots.len() - limit;
                self.snapshots.drain(..excess);
            }
        }
    }

    /// Remove and return the most recent snapshot
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }

    /// Returns true if there are snapshots that can be restored
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn state(&self) -> HistoryState {
        if self.snapshots.is_empty() {
            HistoryState::Empty
        } else {
            HistoryState::HasHistory
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_size(&self) -> usize {
        self.snapshots.iter().map(Snapshot::memory_size).sum()
    }

    /// Discard every snapshot
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
