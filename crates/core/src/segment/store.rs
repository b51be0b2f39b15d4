//! Segment store
//!
//! The store is the only channel through which descriptors reach the
//! sequencer. Reads return copies, so a descriptor in use is unaffected by a
//! concurrent program replacement until the sequencer fetches again.

use heapless::Vec;

use super::{PathSegmentDescriptor, SegmentError};

/// Maximum number of segments in a program
pub const MAX_SEGMENTS: usize = 32;

/// Indexed descriptor collection shared with the planner.
pub trait SegmentStore {
    /// Number of descriptors currently published
    fn count(&self) -> u16;

    /// Copy of the descriptor at `index`, `None` when out of range
    fn get(&self, index: u16) -> Option<PathSegmentDescriptor>;

    /// Replace the whole program.
    ///
    /// Used when a guidance mode loads a canned program.
    fn replace(&mut self, program: &[PathSegmentDescriptor]) -> Result<(), SegmentError>;
}

/// Fixed-capacity in-memory segment store
#[derive(Debug, Clone, Default)]
pub struct SegmentProgram {
    segments: Vec<PathSegmentDescriptor, MAX_SEGMENTS>,
}

impl SegmentProgram {
    /// Create an empty program
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a program from a slice of descriptors
    pub fn from_slice(segments: &[PathSegmentDescriptor]) -> Result<Self, SegmentError> {
        let mut program = Self::new();
        program.replace(segments)?;
        Ok(program)
    }

    /// Append one descriptor
    pub fn push(&mut self, segment: PathSegmentDescriptor) -> Result<(), SegmentError> {
        self.segments
            .push(segment)
            .map_err(|_| SegmentError::StoreFull)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn as_slice(&self) -> &[PathSegmentDescriptor] {
        &self.segments
    }
}

impl SegmentStore for SegmentProgram {
    fn count(&self) -> u16 {
        self.segments.len() as u16
    }

    fn get(&self, index: u16) -> Option<PathSegmentDescriptor> {
        self.segments.get(index as usize).copied()
    }

    fn replace(&mut self, program: &[PathSegmentDescriptor]) -> Result<(), SegmentError> {
        if program.is_empty() {
            return Err(SegmentError::EmptyProgram);
        }
        if program.len() > MAX_SEGMENTS {
            return Err(SegmentError::StoreFull);
        }
        self.segments.clear();
        // Capacity checked above
        for segment in program {
            let _ = self.segments.push(*segment);
        }
        Ok(())
    }
}
