// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::Path;

use peniko::kurbo::{Affine, BezPath, Point};
use peniko::Color;

use super::{
    to_twips, CharacterId, ClipFrame, ClipStack, CurveApproximator, DefineShape, DefineText,
    Depth, DisplayList, Error, FillStyle, FontEntry, FontRegistry, FontSource, GlyphRecord,
    GlyphRunEncoder, KurboApproximator, LineStyle, Matrix, PlaceObject, SessionOptions,
    ShapeBuilder, Tag, TagHandle, TagWriter, Transform, TwipsRect, TWIPS_PER_UNIT,
};
use crate::error::Result;

/// The object currently being assembled.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DrawingMode {
    Idle,
    Shape,
    Text,
}

/// How paths handed to [`DocumentSession::draw_path`] are painted.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum DrawMode {
    #[default]
    Fill,
    EvenOddFill,
    Stroke,
    Clip,
    EvenOddClip,
}

impl DrawMode {
    /// Everything but strokes is drawn filled.
    pub fn is_fill(self) -> bool {
        self != Self::Stroke
    }
}

#[derive(Default)]
enum Assembly {
    #[default]
    Idle,
    Shape(ShapeBuilder),
    Text {
        id: CharacterId,
        glyphs: GlyphRunEncoder,
    },
}

/// State of one document being converted.
///
/// Drawing calls are routed into either a shape or a text definition,
/// switching between them as needed. Finished definitions are placed at
/// increasing depths on the current page.
pub struct DocumentSession<W: TagWriter> {
    writer: W,
    options: SessionOptions,
    approximator: Box<dyn CurveApproximator + Send>,
    /// Last character id handed out.
    last_id: u16,
    assembly: Assembly,
    fonts: FontRegistry,
    /// Slots for the font definitions, by registry position.
    font_slots: Vec<TagHandle>,
    current_font: Option<usize>,
    font_matrix: [f64; 4],
    fill_color: Color,
    stroke_color: Color,
    /// Line width in twips.
    line_width: u16,
    draw_mode: DrawMode,
    depths: DisplayList,
    clips: ClipStack,
}

static_assertions::assert_impl_all!(DocumentSession<crate::TagList>: Send);

impl<W: TagWriter> DocumentSession<W> {
    /// Starts a document. Cubic curves are approximated with a
    /// [`KurboApproximator`] at the configured tolerance.
    pub fn new(writer: W, options: SessionOptions) -> Self {
        let approximator = KurboApproximator::new(options.curve_tolerance);
        Self::with_approximator(writer, options, approximator)
    }

    /// Starts a document with a custom curve approximator.
    pub fn with_approximator(
        mut writer: W,
        options: SessionOptions,
        approximator: impl CurveApproximator + Send + 'static,
    ) -> Self {
        log::debug!(
            "Initializing output for size {}*{}",
            options.width,
            options.height
        );
        writer.write_tag(Tag::SetBackgroundColor(options.background));
        if options.protected {
            writer.write_tag(Tag::Protect);
        }
        Self {
            writer,
            options,
            approximator: Box::new(approximator),
            last_id: 0,
            assembly: Assembly::Idle,
            fonts: FontRegistry::new(),
            font_slots: vec![],
            current_font: None,
            font_matrix: Transform::IDENTITY.matrix,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 0,
            draw_mode: DrawMode::default(),
            depths: DisplayList::new(),
            clips: ClipStack::new(),
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Records written so far.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn mode(&self) -> DrawingMode {
        match self.assembly {
            Assembly::Idle => DrawingMode::Idle,
            Assembly::Shape(_) => DrawingMode::Shape,
            Assembly::Text { .. } => DrawingMode::Text,
        }
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Number of open clip regions.
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    fn next_id(&mut self) -> Result<CharacterId> {
        self.last_id = self.last_id.checked_add(1).ok_or(Error::IdsExhausted)?;
        Ok(CharacterId(self.last_id))
    }

    fn ids_exhausted(&self) -> bool {
        self.last_id == u16::MAX
    }

    fn place(&mut self, character: CharacterId) {
        match self.depths.next_depth() {
            Ok(depth) => self.writer.write_tag(Tag::PlaceObject(PlaceObject {
                character,
                depth,
                clip_depth: None,
            })),
            Err(e) => log::error!("{e}, not placing character {}", character.0),
        }
    }

    /// Opens a shape definition, closing open text first.
    ///
    /// The shape gets the current fill color and line style, and starts
    /// out stroking. Once the document is out of character ids nothing is
    /// opened and the drawing calls that follow are skipped.
    pub fn begin_shape(&mut self) {
        match self.assembly {
            Assembly::Shape(_) => return,
            Assembly::Text { .. } => self.end_text(),
            Assembly::Idle => {}
        }
        let id = match self.next_id() {
            Ok(id) => id,
            Err(e) => {
                log::error!("{e}, skipping shape");
                return;
            }
        };
        let mut shape = ShapeBuilder::new(id, self.options.page_bounds());
        shape.add_line_style(LineStyle {
            width: self.line_width,
            color: self.stroke_color,
        });
        shape.add_fill_style(FillStyle::Solid(self.fill_color));
        shape.select_line();
        self.assembly = Assembly::Shape(shape);
    }

    /// Closes an open shape and places it on the page.
    pub fn end_shape(&mut self) {
        if let Some(shape) = self.take_shape() {
            let id = shape.id;
            self.writer.write_tag(Tag::DefineShape(shape));
            self.place(id);
        }
    }

    fn take_shape(&mut self) -> Option<DefineShape> {
        match std::mem::take(&mut self.assembly) {
            Assembly::Shape(shape) => Some(shape.finish()),
            other => {
                self.assembly = other;
                None
            }
        }
    }

    /// Opens a text definition, closing an open shape first.
    pub fn begin_text(&mut self) {
        match self.assembly {
            Assembly::Text { .. } => return,
            Assembly::Shape(_) => self.end_shape(),
            Assembly::Idle => {}
        }
        let id = match self.next_id() {
            Ok(id) => id,
            Err(e) => {
                log::error!("{e}, skipping text");
                return;
            }
        };
        self.assembly = Assembly::Text {
            id,
            glyphs: GlyphRunEncoder::new(),
        };
    }

    /// Encodes the buffered glyphs of open text and places it on the page.
    pub fn end_text(&mut self) {
        let (id, glyphs) = match std::mem::take(&mut self.assembly) {
            Assembly::Text { id, glyphs } => (id, glyphs),
            other => {
                self.assembly = other;
                return;
            }
        };
        let encoded = glyphs.encode();
        self.writer.write_tag(Tag::DefineText(DefineText {
            id,
            bounds: self.options.page_bounds(),
            matrix: Matrix::IDENTITY,
            glyph_bits: encoded.widths.glyph_bits,
            advance_bits: encoded.widths.advance_bits,
            records: encoded.records,
        }));
        self.place(id);
    }

    fn close_all(&mut self) {
        self.end_text();
        self.end_shape();
    }

    /// Sets the fill color of shapes and glyphs.
    ///
    /// A shape can't change its fill style, so an open one is closed.
    pub fn set_fill_color(&mut self, color: Color) {
        if self.fill_color == color {
            return;
        }
        self.end_shape();
        self.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.stroke_color == color {
            return;
        }
        self.end_shape();
        self.stroke_color = color;
    }

    /// Sets the line width, in document units.
    pub fn set_line_width(&mut self, width: f64) {
        let width = (width * TWIPS_PER_UNIT) as u16;
        if self.line_width == width {
            return;
        }
        self.end_shape();
        self.line_width = width;
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Selects the font for [`Self::draw_char`], registering it on first
    /// use. All outlines of `source` are extracted at registration.
    pub fn set_font(&mut self, font_id: &str, source: &dyn FontSource) {
        if let Some(ix) = self.fonts.find(font_id) {
            self.current_font = Some(ix);
            return;
        }
        let id = match self.next_id() {
            Ok(id) => id,
            Err(e) => {
                log::error!("{e}, can't register font {font_id}");
                self.current_font = None;
                return;
            }
        };
        // Reserve the definition's place ahead of any text using the font.
        let slot = self.writer.begin_tag();
        let ix = self.fonts.insert(FontEntry::new(font_id, id, source));
        self.font_slots.push(slot);
        self.current_font = Some(ix);
    }

    /// Returns true if a font is registered under `font_id`.
    pub fn query_font(&self, font_id: &str) -> bool {
        self.fonts.contains(font_id)
    }

    /// Sets the linear part of the glyph transform. Open text is not
    /// affected, glyph sizes are tracked per glyph.
    pub fn set_font_matrix(&mut self, m11: f64, m12: f64, m21: f64, m22: f64) {
        self.font_matrix = [m11, m12, m21, m22];
    }

    /// Draws a glyph of the current font at `(x, y)`.
    ///
    /// Glyphs that are only scaled become text; rotated, skewed or
    /// stretched ones are drawn as filled shapes. Unknown glyph names are
    /// logged and skipped.
    ///
    /// # Panics
    ///
    /// Panics if no font has been selected.
    pub fn draw_char(&mut self, x: f64, y: f64, glyph_name: &str) {
        let Some(ix) = self.current_font else {
            // The selected font couldn't be registered.
            assert!(
                self.ids_exhausted(),
                "draw_char requires a font selected with set_font"
            );
            return;
        };
        let transform = Transform {
            matrix: self.font_matrix,
            translation: [x, y],
        };
        if transform.is_uniform_scale() && !self.options.draw_only_shapes {
            let char_id = match self.fonts.get_mut(ix).resolve(glyph_name) {
                Ok(char_id) => char_id,
                Err(e) => {
                    log::warn!("{e}");
                    return;
                }
            };
            self.push_glyph(GlyphRecord {
                font: self.fonts.get(ix).id(),
                char_id,
                size: (transform.matrix[0] * TWIPS_PER_UNIT / 2.0 + 0.5) as i32,
                x: to_twips(x),
                y: to_twips(y),
                color: self.fill_color,
            });
        } else {
            let outline = match self.fonts.get(ix).outline(glyph_name) {
                Ok(outline) => outline.clone(),
                Err(e) => {
                    log::warn!("{e}");
                    return;
                }
            };
            self.begin_shape();
            // Outlines are extracted at size 100.
            self.encode_outline(&outline, transform.scale_linear(0.01), true);
        }
    }

    fn push_glyph(&mut self, glyph: GlyphRecord) {
        self.begin_text();
        if matches!(&self.assembly, Assembly::Text { glyphs, .. } if glyphs.is_full()) {
            self.end_text();
            self.begin_text();
        }
        if let Assembly::Text { glyphs, .. } = &mut self.assembly {
            glyphs.push(glyph);
        }
    }

    /// Draws an outline according to the draw mode.
    pub fn draw_path(&mut self, outline: &BezPath, transform: Affine) {
        self.begin_shape();
        let is_fill = self.draw_mode.is_fill();
        self.encode_outline(outline, Transform::from_kurbo(&transform), is_fill);
    }

    /// Appends an outline to the open shape.
    fn encode_outline(&mut self, outline: &BezPath, transform: Transform, is_fill: bool) {
        let Assembly::Shape(shape) = &mut self.assembly else {
            return;
        };
        if is_fill {
            shape.select_fill();
        } else {
            shape.select_line();
        }
        let mut encoder = shape.encode_path(&*self.approximator, transform, is_fill);
        encoder.path_elements(outline.elements().iter().copied());
        encoder.finish();
    }

    /// Starts a clip region. Everything placed until the matching
    /// [`Self::end_clip`] is clipped by `outline`, which is always filled.
    pub fn start_clip(&mut self, outline: &BezPath, transform: Affine) {
        self.close_all();
        if let Err(e) = self.clips.reserve() {
            log::warn!("{e}");
            return;
        }
        self.begin_shape();
        self.encode_outline(outline, Transform::from_kurbo(&transform), true);
        let Some(shape) = self.take_shape() else {
            self.clips.skip();
            return;
        };
        let depth = match self.depths.next_depth() {
            Ok(depth) => depth,
            Err(e) => {
                log::error!("{e}, dropping clip region");
                self.clips.skip();
                return;
            }
        };
        let id = shape.id;
        self.writer.write_tag(Tag::DefineShape(shape));
        // Placed once the region ends and its extent is known.
        let placement = self.writer.begin_tag();
        self.clips.push(ClipFrame {
            placement,
            shape: id,
            depth,
        });
    }

    /// Ends the innermost clip region.
    pub fn end_clip(&mut self) {
        self.close_all();
        match self.clips.pop() {
            Ok(Some(frame)) => {
                // Nothing can be placed above a full page.
                let clip_depth = self.depths.next_depth().unwrap_or(Depth(u16::MAX));
                self.writer.end_tag(
                    frame.placement,
                    Tag::PlaceObject(PlaceObject {
                        character: frame.shape,
                        depth: frame.depth,
                        clip_depth: Some(clip_depth),
                    }),
                );
            }
            Ok(None) => log::debug!("Ending a dropped clip region"),
            Err(e) => log::error!("{e}"),
        }
    }

    /// Draws a JPEG image file mapped onto a quadrilateral.
    ///
    /// `width` and `height` are the pixel size of the image. The corners
    /// `p1..p4` are the image's top left, bottom left, bottom right and
    /// top right corners on the page.
    pub fn draw_image(
        &mut self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        quad: [Point; 4],
    ) {
        self.close_all();
        if width == 0 || height == 0 {
            log::warn!(
                "Skipping image {} of size {width}*{height}",
                path.as_ref().display()
            );
            return;
        }
        let ids = self
            .next_id()
            .and_then(|bitmap| Ok((bitmap, self.next_id()?)));
        let (bitmap, id) = match ids {
            Ok(ids) => ids,
            Err(e) => {
                log::error!("{e}, skipping image {}", path.as_ref().display());
                return;
            }
        };
        let [p1, p2, p3, p4] = quad;
        // 16.16 fixed point per pixel, saturated to the field.
        let fixed = |v: f64, size: u32| {
            let v = (65536.0 * TWIPS_PER_UNIT * v) as i64 / i64::from(size);
            v.clamp(i32::MIN.into(), i32::MAX.into()) as i32
        };
        let matrix = Matrix {
            scale_x: fixed(p4.x - p1.x, width),
            rotate_skew1: fixed(p1.y - p4.y, width),
            rotate_skew0: fixed(p1.x - p2.x, height),
            scale_y: fixed(p2.y - p1.y, height),
            translate_x: to_twips(p1.x),
            translate_y: to_twips(p1.y),
        };
        let (min, max) = quad.iter().fold((p1, p1), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        let bounds = TwipsRect {
            x_min: to_twips(min.x),
            y_min: to_twips(min.y),
            x_max: to_twips(max.x),
            y_max: to_twips(max.y),
        };

        self.writer.write_tag(Tag::DefineBitsJpeg {
            id: bitmap,
            path: path.as_ref().to_owned(),
            quality: self.options.jpeg_quality,
        });

        let mut shape = ShapeBuilder::new(id, bounds);
        shape.add_fill_style(FillStyle::Bitmap { bitmap, matrix });
        shape.select_fill();
        let mut encoder = shape.encode_path(&*self.approximator, Transform::IDENTITY, false);
        encoder.move_to(p1);
        encoder.line_to(p2);
        encoder.line_to(p3);
        encoder.line_to(p4);
        encoder.line_to(p1);
        encoder.finish();
        self.writer.write_tag(Tag::DefineShape(shape.finish()));
        self.place(id);
    }

    /// Finishes the current page: closes open objects and clip regions and
    /// shows the frame.
    pub fn end_page(&mut self) {
        self.close_all();
        if !self.clips.is_empty() {
            log::debug!("Closing {} open clip regions", self.clips.len());
        }
        while !self.clips.is_empty() {
            self.end_clip();
        }
        self.writer.write_tag(Tag::ShowFrame);
    }

    /// Ends the current page and clears its display list.
    pub fn new_page(&mut self) {
        self.end_page();
        for depth in self.depths.new_page() {
            self.writer.write_tag(Tag::RemoveObject(depth));
        }
    }

    /// Ends the document and hands back the writer.
    ///
    /// Fonts are defined with the glyphs actually used, in the slots
    /// reserved when they were registered.
    pub fn finish(mut self) -> Result<W, Error> {
        self.end_page();
        for (font, &slot) in self.fonts.iter().zip(&self.font_slots) {
            let definition = if self.options.draw_only_shapes {
                None
            } else {
                font.encode_definition(&*self.approximator, Transform::IDENTITY)
            };
            match definition {
                Some(definition) => self.writer.end_tag(slot, Tag::DefineFont(definition)),
                None => self.writer.discard_tag(slot),
            }
        }
        self.writer.write_tag(Tag::End);
        self.writer.finish(&self.options.movie_header())?;
        log::debug!("Movie written");
        Ok(self.writer)
    }
}
