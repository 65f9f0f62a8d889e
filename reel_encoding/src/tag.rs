// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The record-level object model handed to a tag writer.

use std::io;
use std::path::PathBuf;

use peniko::Color;

/// Identifier of a defined character (shape, text, font or bitmap).
///
/// All characters of a document share one id space.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CharacterId(pub u16);

/// Stacking position of a placed character on the display list.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Depth(pub u16);

/// Rectangle in twips.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct TwipsRect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

/// Placement or fill matrix. The linear part is 16.16 fixed point, the
/// translation is in twips.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Matrix {
    pub scale_x: i32,
    pub scale_y: i32,
    pub rotate_skew0: i32,
    pub rotate_skew1: i32,
    pub translate_x: i32,
    pub translate_y: i32,
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        scale_x: 1 << 16,
        scale_y: 1 << 16,
        rotate_skew0: 0,
        rotate_skew1: 0,
        translate_x: 0,
        translate_y: 0,
    };
}

/// Fill style of a shape definition.
#[derive(Clone, PartialEq, Debug)]
pub enum FillStyle {
    Solid(Color),
    /// Repeating bitmap fill.
    Bitmap { bitmap: CharacterId, matrix: Matrix },
}

/// Line style of a shape definition.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LineStyle {
    /// Width in twips.
    pub width: u16,
    pub color: Color,
}

/// Change of the selected styles inside a shape.
///
/// `None` leaves a style untouched, `Some(0)` deselects it and `Some(n)`
/// selects the 1-based style `n`.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct StyleChange {
    pub line: Option<u16>,
    pub fill0: Option<u16>,
    pub fill1: Option<u16>,
}

/// One drawing command of a shape outline.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ShapeRecord {
    StyleChange(StyleChange),
    /// Moves the pen to an absolute position.
    MoveTo { x: i32, y: i32 },
    /// Straight edge relative to the pen.
    LineTo { dx: i32, dy: i32 },
    /// Quadratic edge; the control point is relative to the pen, the anchor
    /// relative to the control point.
    CurveTo {
        control_dx: i32,
        control_dy: i32,
        anchor_dx: i32,
        anchor_dy: i32,
    },
}

/// A shape definition.
#[derive(Clone, PartialEq, Debug)]
pub struct DefineShape {
    pub id: CharacterId,
    pub bounds: TwipsRect,
    pub fill_styles: Vec<FillStyle>,
    pub line_styles: Vec<LineStyle>,
    pub records: Vec<ShapeRecord>,
}

/// Font selection of a text style record.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TextFont {
    pub font: CharacterId,
    /// Glyph height in twips.
    pub size: i32,
}

/// State change at the start of a glyph run.
///
/// Only the fields that changed since the previous record are present.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct TextStyle {
    pub font: Option<TextFont>,
    pub color: Option<Color>,
    /// New absolute pen position in twips.
    pub offset: Option<(i32, i32)>,
}

/// A glyph inside a glyph run.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct GlyphEntry {
    /// Compact per-font glyph index.
    pub index: u16,
    /// Horizontal pen advance after this glyph, in twips.
    pub advance: i32,
}

/// One record of a text definition.
#[derive(Clone, PartialEq, Debug)]
pub enum TextRecord {
    Style(TextStyle),
    Glyphs(Vec<GlyphEntry>),
}

/// A text definition.
///
/// Every glyph index fits in `glyph_bits` unsigned bits and every advance in
/// `advance_bits` signed bits.
#[derive(Clone, PartialEq, Debug)]
pub struct DefineText {
    pub id: CharacterId,
    pub bounds: TwipsRect,
    pub matrix: Matrix,
    pub glyph_bits: u8,
    pub advance_bits: u8,
    pub records: Vec<TextRecord>,
}

/// A font definition holding the outlines of the glyphs used by text, in
/// compact index order.
#[derive(Clone, PartialEq, Debug)]
pub struct DefineFont {
    pub id: CharacterId,
    pub glyphs: Vec<Vec<ShapeRecord>>,
}

/// Placement of a character on the display list.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PlaceObject {
    pub character: CharacterId,
    pub depth: Depth,
    /// For clip shapes: the highest depth the clip applies to.
    pub clip_depth: Option<Depth>,
}

/// One record of the output stream.
#[derive(Clone, PartialEq, Debug)]
pub enum Tag {
    SetBackgroundColor(Color),
    Protect,
    DefineShape(DefineShape),
    DefineText(DefineText),
    DefineFont(DefineFont),
    /// A raster image to be embedded as JPEG at the given quality.
    DefineBitsJpeg {
        id: CharacterId,
        path: PathBuf,
        quality: u8,
    },
    PlaceObject(PlaceObject),
    RemoveObject(Depth),
    ShowFrame,
    End,
}

/// Values of the movie header.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MovieHeader {
    pub version: u8,
    /// Frames per second, 8.8 fixed point.
    pub frame_rate: u16,
    pub frame_size: TwipsRect,
}

/// Handle to a reserved slot in the tag stream.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TagHandle(pub usize);

/// Sink for finished records.
///
/// Slots are ordered by reservation. A slot may be filled long after it was
/// reserved, which is how records that are only complete later (clip
/// placements, font definitions) keep their place in the stream.
pub trait TagWriter {
    /// Reserves the next slot in the stream.
    fn begin_tag(&mut self) -> TagHandle;

    /// Fills a reserved slot.
    fn end_tag(&mut self, handle: TagHandle, tag: Tag);

    /// Gives up a reserved slot; it produces no output.
    fn discard_tag(&mut self, handle: TagHandle);

    /// Appends a record.
    fn write_tag(&mut self, tag: Tag) {
        let handle = self.begin_tag();
        self.end_tag(handle, tag);
    }

    /// Completes the stream.
    fn finish(&mut self, header: &MovieHeader) -> io::Result<()>;
}

/// In-memory [`TagWriter`].
#[derive(Clone, Default, Debug)]
pub struct TagList {
    slots: Vec<Option<Tag>>,
    header: Option<MovieHeader>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled records in stream order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.slots.iter().flatten()
    }

    /// The header, once the stream is finished.
    pub fn header(&self) -> Option<&MovieHeader> {
        self.header.as_ref()
    }

    pub fn into_tags(self) -> Vec<Tag> {
        self.slots.into_iter().flatten().collect()
    }
}

impl TagWriter for TagList {
    fn begin_tag(&mut self) -> TagHandle {
        self.slots.push(None);
        TagHandle(self.slots.len() - 1)
    }

    fn end_tag(&mut self, handle: TagHandle, tag: Tag) {
        self.slots[handle.0] = Some(tag);
    }

    fn discard_tag(&mut self, handle: TagHandle) {
        self.slots[handle.0] = None;
    }

    fn finish(&mut self, header: &MovieHeader) -> io::Result<()> {
        self.header = Some(*header);
        Ok(())
    }
}
