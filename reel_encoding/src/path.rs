// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{PathEl, Point};

use super::{quantize, CurveApproximator, ShapeRecord, Transform};

/// Pen position in twips.
///
/// Reset to the origin whenever a new shape or glyph outline starts.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Pen {
    pub x: i32,
    pub y: i32,
}

/// Encoder for shape outlines.
///
/// Points are transformed, quantized to twips and written as pen-relative
/// edges. Moves are only written when they actually displace the pen.
pub struct PathEncoder<'a> {
    records: &'a mut Vec<ShapeRecord>,
    pen: &'a mut Pen,
    approximator: &'a dyn CurveApproximator,
    transform: Transform,
    is_fill: bool,
    /// First point of the current subpath, untransformed.
    first: Point,
    /// Last plotted point, untransformed.
    last: Point,
    n_edges: u32,
}

impl<'a> PathEncoder<'a> {
    /// Creates a new path encoder writing to `records`.
    ///
    /// If `is_fill` is true, every subpath whose end doesn't meet its start
    /// gets an explicit closing edge. Strokes are only closed by
    /// [`PathEncoder::close`].
    pub fn new(
        records: &'a mut Vec<ShapeRecord>,
        pen: &'a mut Pen,
        approximator: &'a dyn CurveApproximator,
        transform: Transform,
        is_fill: bool,
    ) -> Self {
        Self {
            records,
            pen,
            approximator,
            transform,
            is_fill,
            first: Point::ORIGIN,
            last: Point::ORIGIN,
            n_edges: 0,
        }
    }

    /// Starts a new subpath.
    pub fn move_to(&mut self, p: Point) {
        self.close_subpath(false);
        self.first = p;
        self.last = p;
    }

    /// Encodes a straight edge from the last point.
    pub fn line_to(&mut self, p: Point) {
        self.line(self.last, p);
        self.last = p;
    }

    /// Encodes a quadratic Bézier from the last point.
    pub fn quad_to(&mut self, p1: Point, p2: Point) {
        self.quad(self.last, p1, p2);
        self.last = p2;
    }

    /// Encodes a cubic Bézier from the last point.
    pub fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.cubic(self.last, p1, p2, p3);
        self.last = p3;
    }

    /// Closes the current subpath, for fills and strokes alike.
    pub fn close(&mut self) {
        self.close_subpath(true);
        self.last = self.first;
    }

    /// Encodes a path iterator.
    pub fn path_elements(&mut self, path: impl IntoIterator<Item = PathEl>) {
        for el in path {
            match el {
                PathEl::MoveTo(p0) => self.move_to(p0),
                PathEl::LineTo(p0) => self.line_to(p0),
                PathEl::QuadTo(p0, p1) => self.quad_to(p0, p1),
                PathEl::CurveTo(p0, p1, p2) => self.curve_to(p0, p1, p2),
                PathEl::ClosePath => self.close(),
            }
        }
    }

    /// Completes the outline and returns the number of edges written.
    pub fn finish(mut self) -> u32 {
        self.close_subpath(false);
        self.n_edges
    }

    /// Encodes a line between two untransformed points.
    ///
    /// A line is always written, even when it has zero length: single
    /// point plots are encoded that way.
    pub fn line(&mut self, p0: Point, p1: Point) {
        let p0 = self.transform.apply(p0);
        let p1 = self.transform.apply(p1);
        self.pen_move(p0);
        self.pen_line(p1);
    }

    /// Encodes a quadratic Bézier between untransformed points.
    pub fn quad(&mut self, p0: Point, p1: Point, p2: Point) {
        let p0 = self.transform.apply(p0);
        self.pen_move(p0);
        self.pen_curve(self.transform.apply(p1), self.transform.apply(p2));
    }

    /// Encodes a cubic Bézier between untransformed points.
    ///
    /// The curve is transformed first and then approximated by quadratic
    /// segments.
    pub fn cubic(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        let t = self.transform;
        let quads = self
            .approximator
            .approximate(t.apply(p0), t.apply(p1), t.apply(p2), t.apply(p3));
        for q in quads {
            self.pen_move(q.start);
            self.pen_curve(q.control, q.end);
        }
    }

    fn close_subpath(&mut self, explicit: bool) {
        if !(self.is_fill || explicit) {
            return;
        }
        let last = quantize(self.transform.apply(self.last));
        let first = quantize(self.transform.apply(self.first));
        if last != first {
            self.line(self.last, self.first);
        }
    }

    fn pen_move(&mut self, p: Point) {
        let (x, y) = quantize(p);
        if (x, y) != (self.pen.x, self.pen.y) {
            self.records.push(ShapeRecord::MoveTo { x, y });
        }
        self.pen.x = x;
        self.pen.y = y;
    }

    fn pen_line(&mut self, p: Point) {
        let (x, y) = quantize(p);
        let dx = x.saturating_sub(self.pen.x);
        let dy = y.saturating_sub(self.pen.y);
        self.records.push(ShapeRecord::LineTo { dx, dy });
        self.pen.x = x;
        self.pen.y = y;
        self.n_edges += 1;
    }

    fn pen_curve(&mut self, control: Point, end: Point) {
        let (cx, cy) = quantize(control);
        let control_dx = cx.saturating_sub(self.pen.x);
        let control_dy = cy.saturating_sub(self.pen.y);
        let (ex, ey) = quantize(end);
        self.records.push(ShapeRecord::CurveTo {
            control_dx,
            control_dy,
            anchor_dx: ex.saturating_sub(cx),
            anchor_dy: ey.saturating_sub(cy),
        });
        self.pen.x = ex;
        self.pen.y = ey;
        self.n_edges += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KurboApproximator;
    use peniko::kurbo::BezPath;

    fn encode(path: &BezPath, transform: Transform, is_fill: bool) -> Vec<ShapeRecord> {
        let mut records = vec![];
        let mut pen = Pen::default();
        let approximator = KurboApproximator::default();
        let mut encoder =
            PathEncoder::new(&mut records, &mut pen, &approximator, transform, is_fill);
        encoder.path_elements(path.elements().iter().copied());
        encoder.finish();
        records
    }

    #[test]
    fn closed_fill_needs_no_fixup() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        path.line_to((2.0, 2.0));
        path.line_to((1.0, 1.0));
        let records = encode(&path, Transform::IDENTITY, true);
        assert_eq!(
            records,
            vec![
                ShapeRecord::MoveTo { x: 20, y: 20 },
                ShapeRecord::LineTo { dx: 20, dy: 0 },
                ShapeRecord::LineTo { dx: 0, dy: 20 },
                ShapeRecord::LineTo { dx: -20, dy: -20 },
            ]
        );
    }

    #[test]
    fn open_fill_gets_closing_line() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        path.line_to((2.0, 2.0));
        let records = encode(&path, Transform::IDENTITY, true);
        assert_eq!(records.len(), 4);
        assert_eq!(records[3], ShapeRecord::LineTo { dx: -20, dy: -20 });
    }

    #[test]
    fn open_stroke_stays_open() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        path.line_to((2.0, 2.0));
        let records = encode(&path, Transform::IDENTITY, false);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn explicit_close_applies_to_strokes() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        path.line_to((2.0, 2.0));
        path.close_path();
        let records = encode(&path, Transform::IDENTITY, false);
        assert_eq!(records.len(), 4);
        assert_eq!(records[3], ShapeRecord::LineTo { dx: -20, dy: -20 });
    }

    #[test]
    fn each_subpath_is_closed_before_the_next() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.move_to((5.0, 5.0));
        path.line_to((6.0, 5.0));
        let records = encode(&path, Transform::IDENTITY, true);
        assert_eq!(
            records,
            vec![
                ShapeRecord::LineTo { dx: 20, dy: 0 },
                ShapeRecord::LineTo { dx: -20, dy: 0 },
                ShapeRecord::MoveTo { x: 100, y: 100 },
                ShapeRecord::LineTo { dx: 20, dy: 0 },
                ShapeRecord::LineTo { dx: -20, dy: 0 },
            ]
        );
    }

    #[test]
    fn zero_length_line_is_a_plot() {
        let mut records = vec![];
        let mut pen = Pen::default();
        let approximator = KurboApproximator::default();
        let mut encoder = PathEncoder::new(
            &mut records,
            &mut pen,
            &approximator,
            Transform::IDENTITY,
            false,
        );
        encoder.line(Point::new(3.0, 4.0), Point::new(3.0, 4.0));
        assert_eq!(
            records,
            vec![
                ShapeRecord::MoveTo { x: 60, y: 80 },
                ShapeRecord::LineTo { dx: 0, dy: 0 },
            ]
        );
    }

    #[test]
    fn moves_within_a_twip_collapse() {
        let mut records = vec![];
        let mut pen = Pen::default();
        let approximator = KurboApproximator::default();
        let mut encoder = PathEncoder::new(
            &mut records,
            &mut pen,
            &approximator,
            Transform::IDENTITY,
            false,
        );
        encoder.line(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        // 1.04 truncates to the same twip as the current pen.
        encoder.line(Point::new(1.04, 0.0), Point::new(2.0, 0.0));
        assert_eq!(
            records,
            vec![
                ShapeRecord::LineTo { dx: 20, dy: 0 },
                ShapeRecord::LineTo { dx: 20, dy: 0 },
            ]
        );
        assert_eq!(pen, Pen { x: 40, y: 0 });
    }

    #[test]
    fn transform_is_applied_before_quantizing() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        let t = Transform::new(0.5, 0.0, 0.0, -0.5, 10.0, 10.0);
        let records = encode(&path, t, false);
        assert_eq!(
            records,
            vec![
                ShapeRecord::MoveTo { x: 210, y: 190 },
                ShapeRecord::LineTo { dx: 10, dy: 0 },
            ]
        );
    }

    #[test]
    fn curves_are_relative_to_the_pen() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.quad_to((2.0, 3.0), (3.0, 1.0));
        let records = encode(&path, Transform::IDENTITY, false);
        assert_eq!(
            records,
            vec![
                ShapeRecord::MoveTo { x: 20, y: 20 },
                ShapeRecord::CurveTo {
                    control_dx: 20,
                    control_dy: 40,
                    anchor_dx: 20,
                    anchor_dy: -40,
                },
            ]
        );
    }

    #[test]
    fn cubic_segments_chain_without_moves() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((30.0, 90.0), (70.0, -90.0), (100.0, 0.0));
        let records = encode(&path, Transform::IDENTITY, false);
        assert!(records.len() > 1);
        assert!(records
            .iter()
            .all(|r| matches!(r, ShapeRecord::CurveTo { .. })));
    }

    #[test]
    fn far_apart_points_saturate_their_deltas() {
        let mut path = BezPath::new();
        path.move_to((-1.5e8, 0.0));
        path.line_to((1.5e8, 0.0));
        path.quad_to((-1.5e8, 1.5e8), (1.5e8, -1.5e8));
        let records = encode(&path, Transform::IDENTITY, false);
        assert_eq!(
            records,
            vec![
                ShapeRecord::MoveTo { x: i32::MIN, y: 0 },
                ShapeRecord::LineTo {
                    dx: i32::MAX,
                    dy: 0
                },
                ShapeRecord::CurveTo {
                    control_dx: i32::MIN,
                    control_dy: i32::MAX,
                    anchor_dx: i32::MAX,
                    anchor_dy: i32::MIN,
                },
            ]
        );
    }
}
