use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::segment::{Orientation, Segment};

/// Stable reference to a trail segment: the owning cycle's slot and the
/// segment's position in that cycle's trail. Trails only ever grow, so a
/// handle stays valid for the whole round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentHandle {
    pub owner: usize,
    pub index: usize,
}

/// Anything that can resolve a handle to the segment it names.
pub trait SegmentSource {
    fn segment(&self, handle: SegmentHandle) -> Option<&Segment>;
}

/// A segment a cycle touched this tick, as reported to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailDelta {
    pub handle: SegmentHandle,
    pub orientation: Orientation,
}

/// Shared lookup of every trail segment on the field, split by axis.
///
/// The index holds handles, not segments; the cycles own their trails.
/// Because a handle always resolves to the live segment, an open segment's
/// growing free end is seen without re-inserting it.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryIndex {
    vertical: Vec<SegmentHandle>,
    horizontal: Vec<SegmentHandle>,
    indexed: HashSet<SegmentHandle>,
}

impl TrajectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the segments a cycle reported this tick.
    ///
    /// A segment already in the index (the still-open one, extended since it
    /// was added) keeps its single entry; new segments are appended to their
    /// axis in order.
    pub fn merge_delta(&mut self, delta: &[TrailDelta]) {
        for entry in delta {
            if !self.indexed.insert(entry.handle) {
                continue;
            }
            match entry.orientation {
                Orientation::Vertical => self.vertical.push(entry.handle),
                Orientation::Horizontal => self.horizontal.push(entry.handle),
            }
        }
    }

    pub fn vertical(&self) -> &[SegmentHandle] {
        &self.vertical
    }

    pub fn horizontal(&self) -> &[SegmentHandle] {
        &self.horizontal
    }

    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal.clear();
        self.indexed.clear();
    }

    /// Vertical segments lying on column `x`.
    pub fn vertical_at<'a, S>(
        &'a self,
        x: f32,
        source: &'a S,
    ) -> impl Iterator<Item = (SegmentHandle, &'a Segment)> + 'a
    where
        S: SegmentSource + ?Sized,
    {
        resolve_on_line(&self.vertical, x, source)
    }

    /// Horizontal segments lying on row `y`.
    pub fn horizontal_at<'a, S>(
        &'a self,
        y: f32,
        source: &'a S,
    ) -> impl Iterator<Item = (SegmentHandle, &'a Segment)> + 'a
    where
        S: SegmentSource + ?Sized,
    {
        resolve_on_line(&self.horizontal, y, source)
    }
}

fn resolve_on_line<'a, S>(
    handles: &'a [SegmentHandle],
    coord: f32,
    source: &'a S,
) -> impl Iterator<Item = (SegmentHandle, &'a Segment)> + 'a
where
    S: SegmentSource + ?Sized,
{
    handles.iter().filter_map(move |&handle| {
        let segment = source.segment(handle)?;
        (segment.fixed_coord() == coord).then_some((handle, segment))
    })
}
