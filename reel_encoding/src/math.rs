// Copyright 2026 the Reel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Mul;

use peniko::kurbo::{self, Point};

/// Number of twips in one document unit.
pub const TWIPS_PER_UNIT: f64 = 20.0;

/// Affine transformation matrix.
///
/// Points are mapped as
///
/// ```text
/// x' = m11 * x + m12 * y + tx
/// y' = m21 * x + m22 * y + ty
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// 2x2 matrix, stored as `[m11, m12, m21, m22]`.
    pub matrix: [f64; 4],
    /// Translation.
    pub translation: [f64; 2],
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0],
        translation: [0.0; 2],
    };

    /// Creates a transform from its six coefficients.
    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, tx: f64, ty: f64) -> Self {
        Self {
            matrix: [m11, m12, m21, m22],
            translation: [tx, ty],
        }
    }

    /// Creates a pure translation.
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a transform from a kurbo affine matrix.
    pub fn from_kurbo(transform: &kurbo::Affine) -> Self {
        // kurbo stores the matrix column-major: [a b c d e f] maps
        // x' = a x + c y + e, y' = b x + d y + f.
        let c = transform.as_coeffs();
        Self::new(c[0], c[2], c[1], c[3], c[4], c[5])
    }

    /// Converts the transform to a kurbo affine matrix.
    pub fn to_kurbo(&self) -> kurbo::Affine {
        let [m11, m12, m21, m22] = self.matrix;
        kurbo::Affine::new([
            m11,
            m21,
            m12,
            m22,
            self.translation[0],
            self.translation[1],
        ])
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let [m11, m12, m21, m22] = self.matrix;
        Point::new(
            m11 * p.x + m12 * p.y + self.translation[0],
            m21 * p.x + m22 * p.y + self.translation[1],
        )
    }

    /// Returns a copy with the linear part multiplied by `factor`. The
    /// translation is left alone.
    #[must_use]
    pub fn scale_linear(&self, factor: f64) -> Self {
        Self {
            matrix: self.matrix.map(|m| m * factor),
            translation: self.translation,
        }
    }

    /// Returns true if the linear part has no rotation or skew and scales
    /// both axes by the same amount.
    pub fn is_uniform_scale(&self) -> bool {
        let [m11, m12, m21, m22] = self.matrix;
        m12 == 0.0 && m21 == 0.0 && m11 == m22
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Self;

    /// Composes two transforms; `a * b` applies `b` first.
    #[inline]
    fn mul(self, other: Self) -> Self {
        let [a11, a12, a21, a22] = self.matrix;
        let [b11, b12, b21, b22] = other.matrix;
        Self {
            matrix: [
                a11 * b11 + a12 * b21,
                a11 * b12 + a12 * b22,
                a21 * b11 + a22 * b21,
                a21 * b12 + a22 * b22,
            ],
            translation: [
                a11 * other.translation[0] + a12 * other.translation[1] + self.translation[0],
                a21 * other.translation[0] + a22 * other.translation[1] + self.translation[1],
            ],
        }
    }
}

/// Converts a document coordinate to twips.
///
/// The conversion truncates toward zero rather than rounding; existing
/// output depends on that tie-breaking at half-twip boundaries.
#[inline]
pub fn to_twips(value: f64) -> i32 {
    (value * TWIPS_PER_UNIT) as i32
}

/// Quantizes an already transformed point to integer twips.
#[inline]
pub fn quantize(p: Point) -> (i32, i32) {
    (to_twips(p.x), to_twips(p.y))
}

/// Returns the number of bits needed to store `value` as an unsigned
/// integer, never less than `min_bits`.
pub fn unsigned_bits(value: u32, min_bits: u8) -> u8 {
    let needed = (u32::BITS - value.leading_zeros()) as u8;
    needed.max(min_bits)
}
