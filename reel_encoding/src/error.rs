// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors that can occur while encoding a document.
///
/// Apart from [`Error::Io`], these are recoverable: the session logs them and
/// carries on with the offending item skipped.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A glyph name is not part of the font's glyph set.
    #[error("didn't find glyph {glyph:?} in font {font:?}")]
    GlyphNotFound { font: String, glyph: String },

    /// Clip regions are nested deeper than the display list supports.
    #[error("too many clip levels (limit is {limit})")]
    ClipOverflow { limit: usize },

    /// A clip region was ended without a matching start.
    #[error("invalid end of clipping region")]
    UnbalancedClip,

    /// Every character id of the document is in use.
    #[error("ran out of character ids (limit is {})", u16::MAX)]
    IdsExhausted,

    /// Every depth of the current page is in use.
    #[error("ran out of display list depths on this page")]
    DepthsExhausted,

    /// The font program could not be parsed.
    #[error("invalid font data: {0}")]
    InvalidFont(String),

    /// The tag writer failed to produce its output.
    #[error("couldn't write movie")]
    Io(#[from] std::io::Error),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
