// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

use super::{to_twips, KurboApproximator, MovieHeader, TwipsRect};

/// Options of a [`DocumentSession`](crate::DocumentSession).
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// Page width in document units.
    pub width: u32,
    /// Page height in document units.
    pub height: u32,
    /// Quality of embedded JPEG images, 0 to 100.
    pub jpeg_quality: u8,
    /// Draw every glyph as a shape instead of using font and text records.
    pub draw_only_shapes: bool,
    /// Mark the movie as protected against import.
    pub protected: bool,
    pub background: Color,
    /// Frames per second, 8.8 fixed point.
    pub frame_rate: u16,
    /// Movie format version.
    pub version: u8,
    /// Accuracy of the default cubic approximation, in document units.
    pub curve_tolerance: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(612, 792)
    }
}

impl SessionOptions {
    /// Default options for a page of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            jpeg_quality: 85,
            draw_only_shapes: false,
            protected: false,
            background: Color::WHITE,
            // One frame every four seconds.
            frame_rate: 0x0040,
            version: 4,
            curve_tolerance: KurboApproximator::DEFAULT_TOLERANCE,
        }
    }

    /// The page rectangle in twips.
    pub fn page_bounds(&self) -> TwipsRect {
        TwipsRect {
            x_min: 0,
            y_min: 0,
            x_max: to_twips(self.width.into()),
            y_max: to_twips(self.height.into()),
        }
    }

    pub fn movie_header(&self) -> MovieHeader {
        MovieHeader {
            version: self.version,
            frame_rate: self.frame_rate,
            frame_size: self.page_bounds(),
        }
    }
}
