// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-font glyph tables and the document's font registry.

use std::collections::HashMap;

use peniko::kurbo::BezPath;

use super::{
    CharacterId, CurveApproximator, DefineFont, Error, PathEncoder, Pen, ShapeRecord,
    StyleChange, Transform,
};
use crate::error::Result;

/// Service providing glyph outlines of one font program.
///
/// Outlines are expected at a font size of 100 document units.
pub trait FontSource {
    /// Name used in diagnostics, usually the font file.
    fn name(&self) -> &str;

    /// All glyph names of the font, in font order.
    fn glyph_names(&self) -> Vec<String>;

    /// The outline of a glyph, if the font has one under this name.
    fn outline(&self, glyph_name: &str) -> Option<BezPath>;
}

#[derive(Clone, Debug)]
struct GlyphSlot {
    outline: BezPath,
    /// Compact id, assigned on first use.
    compact_id: Option<u16>,
}

/// Glyph outlines of one font, with compact ids for the glyphs actually used.
///
/// Compact ids are dense and handed out in order of first use, so the font
/// definition only has to carry the glyphs a document references.
#[derive(Clone, Debug)]
pub struct FontEntry {
    font_id: String,
    name: String,
    id: CharacterId,
    glyphs: Vec<GlyphSlot>,
    by_name: HashMap<String, usize>,
    /// Glyph index for each compact id.
    used: Vec<usize>,
}

impl FontEntry {
    /// Extracts every outline of `source` once.
    pub fn new(font_id: &str, id: CharacterId, source: &dyn FontSource) -> Self {
        let names = source.glyph_names();
        let mut glyphs = Vec::with_capacity(names.len());
        let mut by_name = HashMap::with_capacity(names.len());
        for name in names {
            let Some(outline) = source.outline(&name) else {
                log::warn!("Font {}: glyph {name} has no outline", source.name());
                continue;
            };
            // The first glyph wins if a font repeats a name.
            by_name.entry(name).or_insert(glyphs.len());
            glyphs.push(GlyphSlot {
                outline,
                compact_id: None,
            });
        }
        log::debug!(
            "Font {font_id}({}): storing {} outlines",
            source.name(),
            glyphs.len()
        );
        Self {
            font_id: font_id.to_owned(),
            name: source.name().to_owned(),
            id,
            glyphs,
            by_name,
            used: vec![],
        }
    }

    pub fn font_id(&self) -> &str {
        &self.font_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Number of glyphs with an outline.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Number of glyphs resolved so far.
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Returns the compact id of a glyph, assigning the next one on first use.
    pub fn resolve(&mut self, glyph_name: &str) -> Result<u16> {
        let index = self.lookup(glyph_name)?;
        let slot = &mut self.glyphs[index];
        if let Some(id) = slot.compact_id {
            return Ok(id);
        }
        let id = self.used.len() as u16;
        slot.compact_id = Some(id);
        self.used.push(index);
        Ok(id)
    }

    /// Looks up an outline without marking the glyph used.
    pub fn outline(&self, glyph_name: &str) -> Result<&BezPath> {
        let index = self.lookup(glyph_name)?;
        Ok(&self.glyphs[index].outline)
    }

    fn lookup(&self, glyph_name: &str) -> Result<usize> {
        self.by_name
            .get(glyph_name)
            .copied()
            .ok_or_else(|| Error::GlyphNotFound {
                font: self.name.clone(),
                glyph: glyph_name.to_owned(),
            })
    }

    /// Encodes the used glyphs in compact id order, or `None` if no glyph
    /// was used.
    ///
    /// Every glyph is a separate filled outline with a single implicit fill
    /// style, drawn under `transform` with the pen starting at the origin.
    pub fn encode_definition(
        &self,
        approximator: &dyn CurveApproximator,
        transform: Transform,
    ) -> Option<DefineFont> {
        if self.used.is_empty() {
            return None;
        }
        log::debug!(
            "Font {} has {} used characters",
            self.font_id,
            self.used.len()
        );
        let glyphs = self
            .used
            .iter()
            .map(|&index| {
                let mut records = vec![ShapeRecord::StyleChange(StyleChange {
                    fill0: Some(1),
                    ..Default::default()
                })];
                let mut pen = Pen::default();
                let mut encoder =
                    PathEncoder::new(&mut records, &mut pen, approximator, transform, true);
                encoder.path_elements(self.glyphs[index].outline.elements().iter().copied());
                encoder.finish();
                records
            })
            .collect();
        Some(DefineFont {
            id: self.id,
            glyphs,
        })
    }
}

/// Fonts of a document, keyed by font identity.
#[derive(Clone, Default, Debug)]
pub struct FontRegistry {
    entries: Vec<FontEntry>,
    index: HashMap<String, usize>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, font_id: &str) -> bool {
        self.index.contains_key(font_id)
    }

    /// Position of a registered font.
    pub fn find(&self, font_id: &str) -> Option<usize> {
        self.index.get(font_id).copied()
    }

    /// Registers a font and returns its position. An already registered
    /// font is kept as is.
    pub fn insert(&mut self, entry: FontEntry) -> usize {
        if let Some(ix) = self.find(entry.font_id()) {
            return ix;
        }
        let ix = self.entries.len();
        self.index.insert(entry.font_id().to_owned(), ix);
        self.entries.push(entry);
        ix
    }

    pub fn get(&self, ix: usize) -> &FontEntry {
        &self.entries[ix]
    }

    pub fn get_mut(&mut self, ix: usize) -> &mut FontEntry {
        &mut self.entries[ix]
    }

    /// Fonts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FontEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
