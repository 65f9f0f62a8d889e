// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{CharacterId, Depth, Error, TagHandle};
use crate::error::Result;

/// Maximum number of nested clip regions.
pub const MAX_CLIP_DEPTH: usize = 127;

/// An open clip region.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClipFrame {
    /// Slot reserved for the placement of the clip shape. It can only be
    /// filled once the region ends, because the placement carries the
    /// highest depth it clips.
    pub placement: TagHandle,
    pub shape: CharacterId,
    /// Depth of the clip shape itself.
    pub depth: Depth,
}

/// Stack of nested clip regions.
///
/// Regions beyond [`MAX_CLIP_DEPTH`] are dropped but still counted, so that
/// every end of a region still pairs with its own start.
#[derive(Clone, Default, Debug)]
pub struct ClipStack {
    frames: Vec<ClipFrame>,
    /// Regions started while the stack was full.
    dropped: usize,
}

impl ClipStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open regions, dropped ones included.
    pub fn len(&self) -> usize {
        self.frames.len() + self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that another region fits.
    ///
    /// When the stack is full the new region is counted as dropped and
    /// [`Error::ClipOverflow`] is returned; the caller must not push it.
    pub fn reserve(&mut self) -> Result<()> {
        if self.frames.len() < MAX_CLIP_DEPTH {
            return Ok(());
        }
        self.dropped += 1;
        Err(Error::ClipOverflow {
            limit: MAX_CLIP_DEPTH,
        })
    }

    /// Pushes a region admitted by [`Self::reserve`].
    pub fn push(&mut self, frame: ClipFrame) {
        debug_assert!(self.frames.len() < MAX_CLIP_DEPTH, "clip stack overflow");
        self.frames.push(frame);
    }

    /// Counts an admitted region that couldn't be defined as dropped.
    pub fn skip(&mut self) {
        self.dropped += 1;
    }

    /// Ends the innermost region.
    ///
    /// Returns `Ok(None)` when that region had been dropped, and
    /// [`Error::UnbalancedClip`] when there is no open region.
    pub fn pop(&mut self) -> Result<Option<ClipFrame>> {
        if self.dropped > 0 {
            self.dropped -= 1;
            return Ok(None);
        }
        self.frames.pop().map(Some).ok_or(Error::UnbalancedClip)
    }
}
