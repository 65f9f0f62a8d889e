// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batching of positioned glyphs into text records.

use peniko::Color;

use super::{unsigned_bits, CharacterId, GlyphEntry, TextFont, TextRecord, TextStyle};

/// Number of glyphs buffered before a text definition is flushed.
pub const GLYPH_BUFFER_CAPACITY: usize = 1024;

/// Maximum number of glyphs in one glyph run record.
pub const MAX_GLYPHS_PER_RUN: usize = 127;

/// A glyph placed by the caller.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GlyphRecord {
    pub font: CharacterId,
    /// Compact per-font glyph id.
    pub char_id: u16,
    /// Glyph height in twips.
    pub size: i32,
    /// Pen position in twips.
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Field widths shared by all glyph runs of a text definition.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BitWidths {
    /// Unsigned width of the glyph index field.
    pub glyph_bits: u8,
    /// Signed width of the advance field.
    pub advance_bits: u8,
}

/// Output of [`GlyphRunEncoder::encode`].
#[derive(Clone, PartialEq, Debug)]
pub struct EncodedText {
    pub widths: BitWidths,
    pub records: Vec<TextRecord>,
}

/// Buffer of placed glyphs, encoded in two passes.
///
/// The first pass finds the field widths for the whole batch, the second
/// writes the records, so no run ever has to be re-encoded because a later
/// glyph needs more bits.
#[derive(Clone, Default, Debug)]
pub struct GlyphRunEncoder {
    glyphs: Vec<GlyphRecord>,
}

impl GlyphRunEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.glyphs.len() >= GLYPH_BUFFER_CAPACITY
    }

    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    /// Appends a glyph.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full; callers flush on [`Self::is_full`].
    pub fn push(&mut self, glyph: GlyphRecord) {
        assert!(!self.is_full(), "glyph buffer overflow");
        self.glyphs.push(glyph);
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }

    /// Encodes the buffered glyphs and empties the buffer.
    pub fn flush(&mut self) -> EncodedText {
        let encoded = self.encode();
        self.glyphs.clear();
        encoded
    }

    /// Encodes the buffered glyphs.
    pub fn encode(&self) -> EncodedText {
        let widths = self.bit_widths();
        let records = self.emit(widths);
        EncodedText { widths, records }
    }

    /// First pass: the smallest widths that hold every glyph index and every
    /// non-negative advance of the batch.
    ///
    /// The advance field is signed, so it gets one bit on top of the
    /// unsigned width the advances need.
    pub fn bit_widths(&self) -> BitWidths {
        let mut glyph_bits = 1;
        let mut advance_bits = 1;
        for ix in 0..self.glyphs.len() {
            glyph_bits = unsigned_bits(self.glyphs[ix].char_id.into(), glyph_bits);
            let advance = self.advance_after(ix).unwrap_or(0).max(0) as u32;
            advance_bits = unsigned_bits(advance, advance_bits);
        }
        BitWidths {
            glyph_bits,
            advance_bits: advance_bits + 1,
        }
    }

    /// Horizontal distance to the next glyph; zero for the last one.
    /// `None` when the distance overflows, the next run then repositions.
    fn advance_after(&self, ix: usize) -> Option<i32> {
        let next = (ix + 1).min(self.glyphs.len() - 1);
        self.glyphs[next].x.checked_sub(self.glyphs[ix].x)
    }

    /// Second pass: split the batch into glyph runs.
    ///
    /// A run ends when font, size or color change, when the next glyph is
    /// not where the advances put the pen, or when it is full. Each run is
    /// preceded by a style record carrying just the fields that changed.
    fn emit(&self, widths: BitWidths) -> Vec<TextRecord> {
        let max_advance = 1_i64 << (widths.advance_bits - 1);
        let mut records = vec![];
        let mut run: Vec<GlyphEntry> = Vec::with_capacity(MAX_GLYPHS_PER_RUN);
        let mut font: Option<CharacterId> = None;
        let mut size: Option<i32> = None;
        let mut color: Option<Color> = None;
        // Text starts at the origin.
        let (mut x, mut y) = (0, 0);

        for (ix, glyph) in self.glyphs.iter().enumerate() {
            let breaks = font != Some(glyph.font)
                || size != Some(glyph.size)
                || color != Some(glyph.color)
                || (x, y) != (glyph.x, glyph.y)
                || run.len() == MAX_GLYPHS_PER_RUN;
            if breaks {
                if !run.is_empty() {
                    records.push(TextRecord::Glyphs(std::mem::take(&mut run)));
                }
                let mut style = TextStyle::default();
                if (x, y) != (glyph.x, glyph.y) {
                    style.offset = Some((glyph.x, glyph.y));
                }
                if color != Some(glyph.color) {
                    style.color = Some(glyph.color);
                    color = Some(glyph.color);
                }
                if font != Some(glyph.font) || size != Some(glyph.size) {
                    style.font = Some(TextFont {
                        font: glyph.font,
                        size: glyph.size,
                    });
                }
                records.push(TextRecord::Style(style));
                font = Some(glyph.font);
                size = Some(glyph.size);
                (x, y) = (glyph.x, glyph.y);
            }

            let advance = match self.advance_after(ix) {
                Some(rel) if (0..max_advance).contains(&i64::from(rel)) => {
                    x += rel;
                    rel
                }
                // Backwards (or too far): the next run repositions the pen.
                _ => 0,
            };
            run.push(GlyphEntry {
                index: glyph.char_id,
                advance,
            });
        }
        if !run.is_empty() {
            records.push(TextRecord::Glyphs(run));
        }
        records
    }
}
