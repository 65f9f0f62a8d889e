// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoding of vector drawing calls into a depth-ordered movie.
//!
//! A [`DocumentSession`] receives paths, glyphs, images and clip regions in
//! document order and turns them into shape, text and font definitions
//! placed on a display list. Finished records are handed to a
//! [`TagWriter`]; the binary layout of those records is up to the writer.
//!
//! All coordinates in the output are integer twips, 1/20 of a document unit.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    missing_debug_implementations,
    single_use_lifetimes,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::exhaustive_enums,
    reason = "Deferred"
)]

mod approx;
mod clip;
mod display;
mod error;
mod font;
pub mod math;
mod options;
mod path;
mod session;
mod shape;
#[cfg(feature = "skrifa")]
mod skrifa_font;
mod tag;
mod text;

pub use approx::{
    CurveApproximator, KurboApproximator, QuadSegment, QuadSegments, MAX_QUAD_SEGMENTS,
};
pub use clip::{ClipFrame, ClipStack, MAX_CLIP_DEPTH};
pub use display::DisplayList;
pub use error::Error;
pub use font::{FontEntry, FontRegistry, FontSource};
pub use math::{quantize, to_twips, unsigned_bits, Transform, TWIPS_PER_UNIT};
pub use options::SessionOptions;
pub use path::{PathEncoder, Pen};
pub use session::{DocumentSession, DrawMode, DrawingMode};
pub use shape::{ActiveStyle, ShapeBuilder, StyleState};
pub use tag::{
    CharacterId, DefineFont, DefineShape, DefineText, Depth, FillStyle, GlyphEntry, LineStyle,
    Matrix, MovieHeader, PlaceObject, ShapeRecord, StyleChange, Tag, TagHandle, TagList,
    TagWriter, TextFont, TextRecord, TextStyle, TwipsRect,
};
pub use text::{
    BitWidths, EncodedText, GlyphRecord, GlyphRunEncoder, GLYPH_BUFFER_CAPACITY,
    MAX_GLYPHS_PER_RUN,
};

#[cfg(feature = "skrifa")]
pub use skrifa_font::{SkrifaFont, OUTLINE_SIZE};

pub use peniko;
pub use peniko::kurbo;
