//! Progress mapper: scroll offset to animation frame.
//!
//! The mapping is a clamped linear interpolation from the scroll range
//! `[range_start, range_end]` onto a frame range. It is a pure function of
//! its inputs and does no debouncing of its own.

use crate::geometry::SectionGeometry;

/// An ordered pair of renderer frame indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRange {
    pub start: f32,
    pub end: f32,
}

impl FrameRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Segment the renderer should preload: from frame 0 to the last frame
    /// scrubbing can reach.
    pub fn initial_segment(&self) -> [f32; 2] {
        [0.0, self.end]
    }
}

impl From<[f32; 2]> for FrameRange {
    fn from([start, end]: [f32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<(f32, f32)> for FrameRange {
    fn from((start, end): (f32, f32)) -> Self {
        Self { start, end }
    }
}

/// Scroll offsets between which the animation scrubs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBounds {
    pub range_start: f32,
    pub range_end: f32,
}

impl ScrollBounds {
    /// `range_start = top − start_margin`, `range_end = top + extent`.
    pub fn from_geometry(geometry: SectionGeometry, start_margin: f32) -> Self {
        Self {
            range_start: geometry.top_offset - start_margin,
            range_end: geometry.top_offset + geometry.scroll_extent,
        }
    }

    /// True when the range has no positive width.
    pub fn is_degenerate(&self) -> bool {
        self.range_end <= self.range_start
    }

    /// Normalized progress in `[0, 1]`.
    ///
    /// A degenerate range behaves as a step at `range_start`.
    pub fn progress(&self, scroll_offset: f32) -> f32 {
        if self.is_degenerate() {
            return if scroll_offset < self.range_start {
                0.0
            } else {
                1.0
            };
        }

        ((scroll_offset - self.range_start) / (self.range_end - self.range_start)).clamp(0.0, 1.0)
    }
}

/// Maps scroll offsets onto a frame range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressMapper {
    pub bounds: ScrollBounds,
    pub frames: FrameRange,
}

impl ProgressMapper {
    pub fn new(bounds: ScrollBounds, frames: FrameRange) -> Self {
        Self { bounds, frames }
    }

    pub fn progress(&self, scroll_offset: f32) -> f32 {
        self.bounds.progress(scroll_offset)
    }

    /// Frame for the given scroll offset.
    ///
    /// Endpoints are returned exactly (no rounding error at either clamp).
    pub fn frame_at(&self, scroll_offset: f32) -> f32 {
        let t = self.progress(scroll_offset);
        if t <= 0.0 {
            self.frames.start
        } else if t >= 1.0 {
            self.frames.end
        } else {
            self.frames.start + (self.frames.end - self.frames.start) * t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ProgressMapper {
        let geometry = SectionGeometry {
            top_offset: 500.0,
            scroll_extent: 1600.0,
        };
        ProgressMapper::new(
            ScrollBounds::from_geometry(geometry, 0.0),
            FrameRange::new(0.0, 100.0),
        )
    }

    #[test]
    fn test_bounds_from_geometry() {
        let mapper = scenario();
        assert_eq!(mapper.bounds.range_start, 500.0);
        assert_eq!(mapper.bounds.range_end, 2100.0);
    }

    #[test]
    fn test_start_margin_moves_range_start_up() {
        let geometry = SectionGeometry {
            top_offset: 500.0,
            scroll_extent: 1600.0,
        };
        let bounds = ScrollBounds::from_geometry(geometry, 200.0);
        assert_eq!(bounds.range_start, 300.0);
        assert_eq!(bounds.range_end, 2100.0);
    }

    #[test]
    fn test_scenario_frames() {
        let mapper = scenario();
        assert_eq!(mapper.frame_at(0.0), 0.0);
        assert_eq!(mapper.frame_at(500.0), 0.0);
        assert!((mapper.frame_at(1300.0) - 50.0).abs() < 1e-3);
        assert_eq!(mapper.frame_at(2100.0), 100.0);
        assert_eq!(mapper.frame_at(9000.0), 100.0);
    }

    #[test]
    fn test_clamped_outside_range() {
        let mapper = scenario();
        for s in [-1000.0, -1.0, 0.0, 250.0, 499.9, 500.0] {
            assert_eq!(mapper.frame_at(s), 0.0, "offset {s}");
        }
        for s in [2100.0, 2100.1, 5000.0, f32::MAX] {
            assert_eq!(mapper.frame_at(s), 100.0, "offset {s}");
        }
    }

    #[test]
    fn test_monotonic_inside_range() {
        let mapper = scenario();
        let mut last = mapper.frame_at(500.0);
        let mut s = 500.0;
        while s < 2100.0 {
            s += 7.5;
            let frame = mapper.frame_at(s);
            assert!(frame >= last, "{frame} < {last} at {s}");
            last = frame;
        }
    }

    #[test]
    fn test_reversed_frames_are_non_increasing() {
        let mut mapper = scenario();
        mapper.frames = FrameRange::new(100.0, 20.0);
        assert_eq!(mapper.frame_at(0.0), 100.0);
        assert_eq!(mapper.frame_at(3000.0), 20.0);

        let mut last = mapper.frame_at(500.0);
        for step in 1..160 {
            let frame = mapper.frame_at(500.0 + step as f32 * 10.0);
            assert!(frame <= last);
            last = frame;
        }
    }

    #[test]
    fn test_degenerate_range_is_step() {
        let mapper = ProgressMapper::new(
            ScrollBounds {
                range_start: 800.0,
                range_end: 800.0,
            },
            FrameRange::new(10.0, 40.0),
        );
        assert!(mapper.bounds.is_degenerate());
        assert_eq!(mapper.frame_at(799.9), 10.0);
        assert_eq!(mapper.frame_at(800.0), 40.0);
        assert_eq!(mapper.frame_at(801.0), 40.0);
        assert!(mapper.frame_at(800.0).is_finite());
    }

    #[test]
    fn test_inverted_bounds_are_step_at_start() {
        let bounds = ScrollBounds {
            range_start: 900.0,
            range_end: 600.0,
        };
        assert_eq!(bounds.progress(700.0), 0.0);
        assert_eq!(bounds.progress(900.0), 1.0);
    }

    #[test]
    fn test_initial_segment() {
        assert_eq!(FrameRange::new(30.0, 90.0).initial_segment(), [0.0, 90.0]);
    }
}
