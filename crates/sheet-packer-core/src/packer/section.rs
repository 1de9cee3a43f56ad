use super::skyline::Skyline;

/// Tracks the current section and the boundaries of the closed ones.
#[derive(Debug, Clone)]
pub struct SectionManager {
    max_height: f64,
    start: f64,
    height: f64,
    index: usize,
    boundaries: Vec<f64>,
}

impl SectionManager {
    pub fn new(max_height: f64) -> Self {
        Self {
            max_height,
            start: 0.0,
            height: 0.0,
            index: 0,
            boundaries: Vec::new(),
        }
    }

    /// Absolute y of the current section's origin.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Tallest content placed so far in the current section, relative to `start`.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// 0-based index of the current section.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Nothing has been placed in the current section yet.
    pub fn is_empty(&self) -> bool {
        self.height <= 0.0
    }

    /// Grows the section to cover a rectangle of `placed_height` at absolute `placed_y`.
    pub fn record(&mut self, placed_y: f64, placed_height: f64) {
        self.height = self.height.max((placed_y - self.start) + placed_height);
    }

    /// Closes the current section and resets `skyline` at the start of the next one.
    /// Returns the new section start.
    pub fn open_next(&mut self, skyline: &mut Skyline) -> f64 {
        let end = self.start + self.height;
        self.boundaries.push(end);
        self.start = end;
        self.height = 0.0;
        self.index += 1;
        skyline.reset(end);
        end
    }

    /// Closes the last section (if it holds anything) and returns `(boundaries, total_height)`.
    pub fn finish(mut self) -> (Vec<f64>, f64) {
        let total = self.start + self.height;
        if self.height > 0.0 {
            self.boundaries.push(total);
        }
        (self.boundaries, total)
    }
}
