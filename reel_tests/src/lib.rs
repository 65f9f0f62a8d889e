// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for the Reel integration tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    reason = "Test fixtures, not a public API"
)]

use std::io;

use peniko::kurbo::BezPath;
use reel_encoding::{
    DefineFont, DefineShape, DefineText, Depth, FontSource, MovieHeader, PlaceObject,
    ShapeRecord, Tag, TagHandle, TagList, TagWriter,
};

/// Font whose glyphs are squares, one per name.
///
/// Glyph `n` of the list is a square of side `10 * (n + 1)` at the origin,
/// at the usual extraction size of 100.
pub struct SquareFont {
    names: Vec<String>,
}

impl SquareFont {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|&n| n.to_owned()).collect(),
        }
    }
}

impl FontSource for SquareFont {
    fn name(&self) -> &str {
        "squares.ttf"
    }

    fn glyph_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn outline(&self, glyph_name: &str) -> Option<BezPath> {
        let n = self.names.iter().position(|n| n == glyph_name)?;
        Some(square(0.0, 0.0, 10.0 * (n + 1) as f64))
    }
}

/// A closed square outline.
pub fn square(x: f64, y: f64, size: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x, y));
    path.line_to((x + size, y));
    path.line_to((x + size, y + size));
    path.line_to((x, y + size));
    path.close_path();
    path
}

/// Replays shape records from the origin, returning the pen position after
/// every edge or move.
pub fn replay(records: &[ShapeRecord]) -> Vec<(i32, i32)> {
    let (mut x, mut y) = (0, 0);
    let mut points = vec![];
    for record in records {
        match *record {
            ShapeRecord::StyleChange(_) => continue,
            ShapeRecord::MoveTo { x: to_x, y: to_y } => {
                x = to_x;
                y = to_y;
            }
            ShapeRecord::LineTo { dx, dy } => {
                x += dx;
                y += dy;
            }
            ShapeRecord::CurveTo {
                control_dx,
                control_dy,
                anchor_dx,
                anchor_dy,
            } => {
                x += control_dx + anchor_dx;
                y += control_dy + anchor_dy;
            }
        }
        points.push((x, y));
    }
    points
}

pub fn count_moves(records: &[ShapeRecord]) -> usize {
    records
        .iter()
        .filter(|r| matches!(r, ShapeRecord::MoveTo { .. }))
        .count()
}

pub fn count_edges(records: &[ShapeRecord]) -> usize {
    records
        .iter()
        .filter(|r| matches!(r, ShapeRecord::LineTo { .. } | ShapeRecord::CurveTo { .. }))
        .count()
}

pub fn shapes(tags: &[Tag]) -> Vec<&DefineShape> {
    tags.iter()
        .filter_map(|t| match t {
            Tag::DefineShape(shape) => Some(shape),
            _ => None,
        })
        .collect()
}

pub fn texts(tags: &[Tag]) -> Vec<&DefineText> {
    tags.iter()
        .filter_map(|t| match t {
            Tag::DefineText(text) => Some(text),
            _ => None,
        })
        .collect()
}

pub fn fonts(tags: &[Tag]) -> Vec<&DefineFont> {
    tags.iter()
        .filter_map(|t| match t {
            Tag::DefineFont(font) => Some(font),
            _ => None,
        })
        .collect()
}

pub fn placements(tags: &[Tag]) -> Vec<PlaceObject> {
    tags.iter()
        .filter_map(|t| match t {
            Tag::PlaceObject(place) => Some(*place),
            _ => None,
        })
        .collect()
}

pub fn removals(tags: &[Tag]) -> Vec<Depth> {
    tags.iter()
        .filter_map(|t| match t {
            Tag::RemoveObject(depth) => Some(*depth),
            _ => None,
        })
        .collect()
}

/// Writer that collects records like [`TagList`] but can't complete the
/// movie.
#[derive(Default)]
pub struct FailingWriter(pub TagList);

impl TagWriter for FailingWriter {
    fn begin_tag(&mut self) -> TagHandle {
        self.0.begin_tag()
    }

    fn end_tag(&mut self, handle: TagHandle, tag: Tag) {
        self.0.end_tag(handle, tag);
    }

    fn discard_tag(&mut self, handle: TagHandle) {
        self.0.discard_tag(handle);
    }

    fn finish(&mut self, _header: &MovieHeader) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}
