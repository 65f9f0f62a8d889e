// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximation of cubic Béziers by quadratic segments.

use peniko::kurbo::{CubicBez, Point};
use smallvec::SmallVec;

/// Maximum number of quadratic segments produced for one cubic.
pub const MAX_QUAD_SEGMENTS: usize = 16;

/// One quadratic segment of an approximated cubic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadSegment {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

/// Segment list returned by a [`CurveApproximator`].
pub type QuadSegments = SmallVec<[QuadSegment; MAX_QUAD_SEGMENTS]>;

/// Service that subdivides a cubic Bézier into quadratic segments.
///
/// Implementations must return at most [`MAX_QUAD_SEGMENTS`] segments,
/// ordered from `p0` to `p3`, each starting where the previous one ended.
pub trait CurveApproximator {
    fn approximate(&self, p0: Point, p1: Point, p2: Point, p3: Point) -> QuadSegments;
}

/// Default approximator backed by kurbo's cubic-to-quadratic conversion.
#[derive(Copy, Clone, Debug)]
pub struct KurboApproximator {
    /// Maximum allowed distance between the cubic and its approximation,
    /// in the units of the points handed in.
    pub tolerance: f64,
}

impl KurboApproximator {
    /// One twip, in document units.
    pub const DEFAULT_TOLERANCE: f64 = 0.05;

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for KurboApproximator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl CurveApproximator for KurboApproximator {
    fn approximate(&self, p0: Point, p1: Point, p2: Point, p3: Point) -> QuadSegments {
        let cubic = CubicBez::new(p0, p1, p2, p3);
        let mut accuracy = self.tolerance.max(f64::EPSILON);
        loop {
            let quads: QuadSegments = cubic
                .to_quads(accuracy)
                .map(|(_, _, q)| QuadSegment {
                    start: q.p0,
                    control: q.p1,
                    end: q.p2,
                })
                .collect();
            if quads.len() <= MAX_QUAD_SEGMENTS {
                return quads;
            }
            // Huge curves at a fine tolerance; trade accuracy for the bound.
            accuracy *= 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn segments_are_contiguous() {
        let approx = KurboApproximator::default();
        let quads = approx.approximate(
            Point::new(0.0, 0.0),
            Point::new(30.0, 90.0),
            Point::new(70.0, -90.0),
            Point::new(100.0, 0.0),
        );
        assert!(!quads.is_empty());
        assert!(quads.len() <= MAX_QUAD_SEGMENTS);
        assert!(close(quads[0].start, Point::new(0.0, 0.0)));
        assert!(close(quads[quads.len() - 1].end, Point::new(100.0, 0.0)));
        for pair in quads.windows(2) {
            assert!(close(pair[0].end, pair[1].start));
        }
    }

    #[test]
    fn segment_count_is_bounded() {
        let approx = KurboApproximator::new(1e-6);
        let quads = approx.approximate(
            Point::new(0.0, 0.0),
            Point::new(10_000.0, 50_000.0),
            Point::new(-40_000.0, -50_000.0),
            Point::new(10_000.0, 0.0),
        );
        assert!(quads.len() <= MAX_QUAD_SEGMENTS);
        assert!(close(quads[quads.len() - 1].end, Point::new(10_000.0, 0.0)));
    }

    #[test]
    fn straight_cubic_needs_one_segment() {
        let approx = KurboApproximator::default();
        let quads = approx.approximate(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        );
        assert_eq!(quads.len(), 1);
    }
}
