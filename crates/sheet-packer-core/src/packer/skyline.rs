use crate::model::Segment;

/// Occupied-height profile of the current section.
///
/// Segments are sorted by `x`, contiguous, non-overlapping and together cover `[0, width)`.
#[derive(Debug, Clone)]
pub struct Skyline {
    width: f64,
    segments: Vec<Segment>,
}

impl Skyline {
    /// A flat skyline spanning the full width at height `y`.
    pub fn new(width: f64, y: f64) -> Self {
        Self {
            width,
            segments: vec![Segment::new(0.0, y, width)],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Drops every segment and starts over with a single full-width segment at `y`.
    pub fn reset(&mut self, y: f64) {
        self.segments.clear();
        self.segments.push(Segment::new(0.0, y, self.width));
    }

    /// Removes the segment at `index` and splices `inserted` in its place. Returns the removed segment.
    ///
    /// The caller keeps the x-order: `inserted` must be sorted and cover exactly the removed span.
    pub fn replace<I>(&mut self, index: usize, inserted: I) -> Segment
    where
        I: IntoIterator<Item = Segment>,
    {
        let removed = self.segments[index];
        self.segments.splice(index..=index, inserted);
        removed
    }

    /// Collapses neighbours with the same `y` that touch or overlap in x.
    /// `y` is compared exactly; callers wanting tolerant merging should pre-round their inputs.
    pub fn merge(&mut self) {
        let mut i = 1;
        while i < self.segments.len() {
            let prev = self.segments[i - 1];
            let cur = self.segments[i];
            if prev.y == cur.y && prev.right() >= cur.x {
                self.segments[i - 1].width = prev.width.max(cur.right() - prev.x);
                self.segments.remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Raises the skyline over a `width x height` rectangle placed at the left edge of segment `index`.
    ///
    /// The segment becomes a new top edge at `y + height` plus, when the rectangle is narrower,
    /// a leftover segment at the original `y`. Merges afterwards.
    pub fn place(&mut self, index: usize, width: f64, height: f64) {
        let seg = self.segments[index];
        debug_assert!(width <= seg.width, "rectangle wider than its segment");

        let top = Segment::new(seg.x, seg.y + height, width);
        let leftover = seg.width - width;
        if leftover > 0.0 {
            self.replace(index, [top, Segment::new(seg.x + width, seg.y, leftover)]);
        } else {
            self.replace(index, [top]);
        }
        self.merge();
        debug_assert!(self.is_contiguous(1e-9 * self.width.max(1.0)));
    }

    /// Checks the covering invariant within `eps`.
    pub fn is_contiguous(&self, eps: f64) -> bool {
        let Some(first) = self.segments.first() else {
            return false;
        };
        if first.x.abs() > eps {
            return false;
        }
        for pair in self.segments.windows(2) {
            if (pair[0].right() - pair[1].x).abs() > eps {
                return false;
            }
        }
        self.segments
            .last()
            .is_some_and(|last| (last.right() - self.width).abs() <= eps)
    }
}
