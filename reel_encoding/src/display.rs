// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Depth, Error};
use crate::error::Result;

/// Allocator of display-list depths for one page at a time.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DisplayList {
    /// First depth of every page.
    start: u16,
    /// Next depth to hand out.
    current: u16,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            start: 1,
            current: 1,
        }
    }

    /// Returns the next unused depth of the page, or
    /// [`Error::DepthsExhausted`] once the page is full.
    pub fn next_depth(&mut self) -> Result<Depth> {
        let depth = Depth(self.current);
        self.current = self
            .current
            .checked_add(1)
            .ok_or(Error::DepthsExhausted)?;
        Ok(depth)
    }

    /// Depths used on the current page so far.
    pub fn used(&self) -> usize {
        usize::from(self.current - self.start)
    }

    /// Starts a new page. Returns every depth used on the previous one,
    /// highest first, for removal.
    pub fn new_page(&mut self) -> Vec<Depth> {
        let removed = (self.start..self.current).rev().map(Depth).collect();
        self.current = self.start;
        removed
    }
}
