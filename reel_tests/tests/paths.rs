// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties of encoded shape outlines.

#![allow(clippy::missing_assert_message, reason = "Assertions name what they check")]

use reel_encoding::kurbo::{BezPath, Point};
use reel_encoding::{quantize, KurboApproximator, PathEncoder, Pen, ShapeRecord, Transform};
use reel_tests::{count_edges, count_moves, replay};

fn encode(path: &BezPath, transform: Transform, is_fill: bool) -> Vec<ShapeRecord> {
    let mut records = vec![];
    let mut pen = Pen::default();
    let approximator = KurboApproximator::default();
    let mut encoder = PathEncoder::new(&mut records, &mut pen, &approximator, transform, is_fill);
    encoder.path_elements(path.elements().iter().copied());
    encoder.finish();
    records
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for &p in &points[1..] {
        path.line_to(p);
    }
    path
}

const POINTS: [Point; 5] = [
    Point::new(1.33, 2.71),
    Point::new(4.02, -3.5),
    Point::new(4.02, -3.5),
    Point::new(-7.77, 0.06),
    Point::new(10.0, 10.0),
];

#[test]
fn replay_reconstructs_absolute_points() {
    let records = encode(&polyline(&POINTS), Transform::IDENTITY, false);
    let expected: Vec<_> = POINTS.iter().map(|&p| quantize(p)).collect();
    assert_eq!(replay(&records), expected);
    assert_eq!(count_moves(&records), 1);
}

#[test]
fn replay_reconstructs_transformed_points() {
    let t = Transform::new(2.0, 0.0, 0.0, -2.0, 5.0, 5.0);
    let records = encode(&polyline(&POINTS), t, false);
    let expected: Vec<_> = POINTS.iter().map(|&p| quantize(t.apply(p))).collect();
    assert_eq!(replay(&records), expected);
}

#[test]
fn moves_to_the_pen_position_are_collapsed() {
    let mut path = BezPath::new();
    path.move_to((1.0, 1.0));
    path.line_to((2.0, 1.0));
    // Same twip as the end of the previous edge.
    path.move_to((2.01, 1.0));
    path.line_to((3.0, 1.0));
    let records = encode(&path, Transform::IDENTITY, false);
    assert_eq!(
        records,
        vec![
            ShapeRecord::MoveTo { x: 20, y: 20 },
            ShapeRecord::LineTo { dx: 20, dy: 0 },
            ShapeRecord::LineTo { dx: 20, dy: 0 },
        ]
    );
}

#[test]
fn closed_fill_gets_no_closing_edge() {
    let path = polyline(&[
        Point::new(1.0, 1.0),
        Point::new(11.0, 1.0),
        Point::new(11.0, 11.0),
        Point::new(1.0, 1.0),
    ]);
    assert_eq!(count_edges(&encode(&path, Transform::IDENTITY, true)), 3);
}

#[test]
fn nearly_closed_fill_gets_no_closing_edge() {
    // 1.01 quantizes to the start twip.
    let path = polyline(&[
        Point::new(1.0, 1.0),
        Point::new(11.0, 1.0),
        Point::new(11.0, 11.0),
        Point::new(1.01, 1.0),
    ]);
    assert_eq!(count_edges(&encode(&path, Transform::IDENTITY, true)), 3);
}

#[test]
fn open_fill_is_closed_back_to_its_start() {
    let path = polyline(&[
        Point::new(1.0, 1.0),
        Point::new(11.0, 1.0),
        Point::new(11.0, 11.0),
        Point::new(1.5, 1.0),
    ]);
    let records = encode(&path, Transform::IDENTITY, true);
    assert_eq!(count_edges(&records), 4);
    assert_eq!(replay(&records).last(), Some(&(20, 20)));
}

#[test]
fn open_stroke_is_left_open() {
    let path = polyline(&[
        Point::new(1.0, 1.0),
        Point::new(11.0, 1.0),
        Point::new(11.0, 11.0),
        Point::new(1.5, 1.0),
    ]);
    assert_eq!(count_edges(&encode(&path, Transform::IDENTITY, false)), 3);
}

#[test]
fn cubic_curves_end_on_the_quantized_endpoint() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.curve_to((10.0, 30.0), (40.0, 30.0), (50.0, 0.0));
    let records = encode(&path, Transform::IDENTITY, false);
    assert!(records.len() <= reel_encoding::MAX_QUAD_SEGMENTS);
    assert_eq!(count_moves(&records), 0);
    assert_eq!(replay(&records).last(), Some(&(1000, 0)));
}
