// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font service backed by an OpenType/TrueType font program.

use peniko::kurbo::{BezPath, Point};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlineGlyphCollection, OutlinePen};
use skrifa::raw::TableProvider;
use skrifa::{FontRef, GlyphId, MetadataProvider};

use super::{Error, FontSource};
use crate::error::Result;

/// Font size the outlines are extracted at.
pub const OUTLINE_SIZE: f32 = 100.0;

/// [`FontSource`] for a font program parsed with skrifa.
///
/// Glyphs are named `gid{N}` after their glyph id. Outlines are in font
/// orientation (y up) at a size of [`OUTLINE_SIZE`].
pub struct SkrifaFont<'a> {
    name: String,
    font: FontRef<'a>,
    outlines: OutlineGlyphCollection<'a>,
    num_glyphs: u32,
}

impl<'a> SkrifaFont<'a> {
    /// Parses the font at `index` of a font file or collection.
    pub fn new(name: &str, data: &'a [u8], index: u32) -> Result<Self> {
        let font =
            FontRef::from_index(data, index).map_err(|e| Error::InvalidFont(e.to_string()))?;
        let num_glyphs = font
            .maxp()
            .map_err(|e| Error::InvalidFont(e.to_string()))?
            .num_glyphs()
            .into();
        Ok(Self {
            name: name.to_owned(),
            outlines: font.outline_glyphs(),
            font,
            num_glyphs,
        })
    }

    /// Name of the glyph the font maps `ch` to.
    pub fn glyph_name_for_char(&self, ch: char) -> Option<String> {
        self.font.charmap().map(ch).map(glyph_name)
    }
}

impl FontSource for SkrifaFont<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn glyph_names(&self) -> Vec<String> {
        (0..self.num_glyphs).map(GlyphId::new).map(glyph_name).collect()
    }

    fn outline(&self, glyph_name: &str) -> Option<BezPath> {
        let gid: u32 = glyph_name.strip_prefix("gid")?.parse().ok()?;
        if gid >= self.num_glyphs {
            return None;
        }
        let outline = self.outlines.get(GlyphId::new(gid))?;
        let mut path = OutlinePath(BezPath::new());
        let settings = DrawSettings::unhinted(Size::new(OUTLINE_SIZE), LocationRef::default());
        outline.draw(settings, &mut path).ok()?;
        Some(path.0)
    }
}

fn glyph_name(gid: GlyphId) -> String {
    format!("gid{}", gid.to_u32())
}

struct OutlinePath(BezPath);

impl OutlinePen for OutlinePath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(Point::new(x.into(), y.into()));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(Point::new(x.into(), y.into()));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to(
            Point::new(cx0.into(), cy0.into()),
            Point::new(x.into(), y.into()),
        );
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            Point::new(cx0.into(), cy0.into()),
            Point::new(cx1.into(), cy1.into()),
            Point::new(x.into(), y.into()),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_a_font() {
        let data = [0_u8; 16];
        assert!(matches!(
            SkrifaFont::new("garbage.ttf", &data, 0),
            Err(Error::InvalidFont(_))
        ));
    }

    #[test]
    fn glyph_names_follow_ids() {
        assert_eq!(glyph_name(GlyphId::new(42)), "gid42");
    }
}
