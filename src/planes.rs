//! Contains the PlaneMapper struct, which maps the [-2, 2] x [-2, 2]
//! square of the complex plane onto a square integral plane with an
//! origin at 0,0.
//!
//! Rows of the integral plane follow the real axis and columns follow
//! the imaginary axis, so a Nebulabrot comes out standing upright.
use num::Complex;

/// The corner of the complex window every Nebulabrot is drawn in.
pub const LEFTLOWER: Complex<f64> = Complex { re: -2.0, im: -2.0 };

/// The other corner.
pub const RIGHTUPPER: Complex<f64> = Complex { re: 2.0, im: 2.0 };

/// Describes the x, y of a pixel: x indexes the real axis, y the
/// imaginary axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps points of the complex window onto a size x size grid of pixels.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// The edge length of the integral plane, in pixels.
    pub size: usize,
}

impl PlaneMapper {
    /// A mapper for a size x size image.
    pub fn new(size: usize) -> PlaneMapper {
        PlaneMapper { size }
    }

    /// Given a complex number, return the pixel it falls in, or None
    /// when it falls outside the plane.  Coordinates are floored, so
    /// the right and upper edges belong to no pixel.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let size = self.size as f64;
        let left = ((point.re - LEFTLOWER.re) / (RIGHTUPPER.re - LEFTLOWER.re) * size).floor();
        let top = ((point.im - LEFTLOWER.im) / (RIGHTUPPER.im - LEFTLOWER.im) * size).floor();
        if !(left >= 0.0 && left < size && top >= 0.0 && top < size) {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }

    /// The linear offset of the pixel a point falls in, from the root
    /// of a row-major buffer in memory.
    pub fn point_to_offset(&self, point: &Complex<f64>) -> Option<usize> {
        self.point_to_pixel(point).map(|Pixel(x, y)| x * self.size + y)
    }
}
