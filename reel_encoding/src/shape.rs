// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{
    CharacterId, CurveApproximator, DefineShape, FillStyle, LineStyle, PathEncoder, Pen,
    ShapeRecord, StyleChange, Transform, TwipsRect,
};

/// Style category currently selected inside a shape.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum ActiveStyle {
    #[default]
    None,
    Fill,
    Line,
}

/// Selected styles of a shape being assembled.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct StyleState {
    /// 1-based fill style used for fills, 0 if there is none.
    pub fill_style: u16,
    /// 1-based line style used for strokes, 0 if there is none.
    pub line_style: u16,
    pub active: ActiveStyle,
}

/// A shape definition being assembled.
#[derive(Clone, Debug)]
pub struct ShapeBuilder {
    id: CharacterId,
    bounds: TwipsRect,
    fill_styles: Vec<FillStyle>,
    line_styles: Vec<LineStyle>,
    records: Vec<ShapeRecord>,
    pen: Pen,
    style: StyleState,
}

impl ShapeBuilder {
    /// Creates an empty shape. The pen starts at the origin.
    pub fn new(id: CharacterId, bounds: TwipsRect) -> Self {
        Self {
            id,
            bounds,
            fill_styles: vec![],
            line_styles: vec![],
            records: vec![],
            pen: Pen::default(),
            style: StyleState::default(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn style(&self) -> StyleState {
        self.style
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    /// Adds a fill style and makes it the one used by [`Self::select_fill`].
    /// Returns its 1-based index.
    pub fn add_fill_style(&mut self, style: FillStyle) -> u16 {
        self.fill_styles.push(style);
        self.style.fill_style = self.fill_styles.len() as u16;
        self.style.fill_style
    }

    /// Adds a line style and makes it the one used by [`Self::select_line`].
    /// Returns its 1-based index.
    pub fn add_line_style(&mut self, style: LineStyle) -> u16 {
        self.line_styles.push(style);
        self.style.line_style = self.line_styles.len() as u16;
        self.style.line_style
    }

    /// Switches to filling. Nothing is written if fills are already active.
    pub fn select_fill(&mut self) {
        let change = match self.style.active {
            ActiveStyle::Fill => return,
            ActiveStyle::None => StyleChange {
                fill0: Some(self.style.fill_style),
                ..Default::default()
            },
            ActiveStyle::Line => StyleChange {
                line: Some(0),
                fill0: Some(self.style.fill_style),
                ..Default::default()
            },
        };
        self.records.push(ShapeRecord::StyleChange(change));
        self.style.active = ActiveStyle::Fill;
    }

    /// Switches to stroking. Nothing is written if strokes are already active.
    pub fn select_line(&mut self) {
        let change = match self.style.active {
            ActiveStyle::Line => return,
            ActiveStyle::None => StyleChange {
                line: Some(self.style.line_style),
                ..Default::default()
            },
            ActiveStyle::Fill => StyleChange {
                line: Some(self.style.line_style),
                fill0: Some(0),
                ..Default::default()
            },
        };
        self.records.push(ShapeRecord::StyleChange(change));
        self.style.active = ActiveStyle::Line;
    }

    /// Returns an encoder appending an outline to this shape.
    pub fn encode_path<'a>(
        &'a mut self,
        approximator: &'a dyn CurveApproximator,
        transform: Transform,
        is_fill: bool,
    ) -> PathEncoder<'a> {
        PathEncoder::new(
            &mut self.records,
            &mut self.pen,
            approximator,
            transform,
            is_fill,
        )
    }

    pub fn finish(self) -> DefineShape {
        DefineShape {
            id: self.id,
            bounds: self.bounds,
            fill_styles: self.fill_styles,
            line_styles: self.line_styles,
            records: self.records,
        }
    }
}
