//! Affine matrix decomposition
//!
//! Elements store a raw 2x3 matrix; the editor keys translation, rotation
//! and scale separately. The matrix is split Gram-Schmidt style: the first
//! column gives scale x and rotation, the second column (after removing its
//! projection on the first) gives scale y and skew.

use serde::Serialize;

use crate::anim::Affine;

/// Components of an affine matrix, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decomposed {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation: f64,
    pub skew_x: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

pub fn decompose(matrix: &Affine) -> Decomposed {
    let mut a = f64::from(matrix.a);
    let mut b = f64::from(matrix.b);
    let mut c = f64::from(matrix.c);
    let mut d = f64::from(matrix.d);

    let mut scale_x = a.hypot(b);
    if scale_x != 0.0 {
        a /= scale_x;
        b /= scale_x;
    }

    let mut skew = a * c + b * d;
    if skew != 0.0 {
        c -= a * skew;
        d -= b * skew;
    }

    let scale_y = c.hypot(d);
    if scale_y != 0.0 {
        c /= scale_y;
        d /= scale_y;
        skew /= scale_y;
    }

    // Mirrored: flip the first axis so rotation stays continuous
    if a * d < b * c {
        a = -a;
        b = -b;
        skew = -skew;
        scale_x = -scale_x;
    }

    Decomposed {
        translate_x: f64::from(matrix.tx),
        translate_y: f64::from(matrix.ty),
        rotation: b.atan2(a).to_degrees(),
        skew_x: skew.atan().to_degrees(),
        scale_x,
        scale_y,
    }
}

/// Editor angle for a matrix rotation: clockwise, in `(-360, 360)`.
///
/// The remainder keeps the sign of `360 - rotation`, so the result is never
/// folded into `[0, 360)`.
pub fn display_angle(rotation: f64) -> f64 {
    (360.0 - rotation) % 360.0
}

/// Interpolation direction between consecutive keys of one timeline
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTracker {
    previous: f64,
}

impl SpinTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spin (`1` or `-1`) for the next key at `angle`
    pub fn next(&mut self, angle: f64) -> i32 {
        let mut spin = if (angle - self.previous).abs() <= 180.0 {
            1
        } else {
            -1
        };
        if angle < self.previous {
            spin = -spin;
        }
        self.previous = angle;
        spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-5;

    fn affine(a: f32, b: f32, c: f32, d: f32) -> Affine {
        Affine {
            a,
            b,
            c,
            d,
            tx: 12.5,
            ty: -3.0,
        }
    }

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_identity() {
        let parts = decompose(&Affine::IDENTITY);
        assert_eq!(
            parts,
            Decomposed {
                translate_x: 0.0,
                translate_y: 0.0,
                rotation: 0.0,
                skew_x: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
            }
        );
        assert_eq!(display_angle(parts.rotation), 0.0);
    }

    #[test]
    fn test_scale_and_translate() {
        let parts = decompose(&affine(2.0, 0.0, 0.0, 0.5));
        close(parts.scale_x, 2.0);
        close(parts.scale_y, 0.5);
        close(parts.rotation, 0.0);
        assert_eq!((parts.translate_x, parts.translate_y), (12.5, -3.0));
    }

    #[test]
    fn test_rotation() {
        let (s, c) = 30f32.to_radians().sin_cos();
        let parts = decompose(&affine(c, s, -s, c));
        close(parts.rotation, 30.0);
        close(parts.scale_x, 1.0);
        close(parts.scale_y, 1.0);
        close(parts.skew_x, 0.0);
        close(display_angle(parts.rotation), 330.0);
    }

    #[test]
    fn test_mirrored() {
        // Flip along x shows up as a negative x scale
        let parts = decompose(&affine(-1.0, 0.0, 0.0, 1.0));
        close(parts.scale_x, -1.0);
        close(parts.scale_y, 1.0);
        close(parts.rotation, 0.0);

        let parts = decompose(&affine(1.0, 0.0, 0.0, -2.0));
        close(parts.scale_x, -1.0);
        close(parts.scale_y, 2.0);
        close(parts.rotation.abs(), 180.0);
    }

    #[test]
    fn test_skew() {
        // Shear x by y: second column (1, 1)
        let parts = decompose(&affine(1.0, 0.0, 1.0, 1.0));
        close(parts.scale_x, 1.0);
        close(parts.scale_y, 1.0);
        close(parts.skew_x, 45.0);
    }

    #[test]
    fn test_degenerate_matrix() {
        let parts = decompose(&affine(0.0, 0.0, 0.0, 0.0));
        assert_eq!((parts.scale_x, parts.scale_y), (0.0, 0.0));
        assert!(parts.rotation.is_finite());
        assert!(parts.skew_x.is_finite());
    }

    #[test]
    fn test_display_angle_keeps_sign() {
        assert_eq!(display_angle(90.0), 270.0);
        assert_eq!(display_angle(-90.0), 90.0);
        assert_eq!(display_angle(0.0), 0.0);
        // 360 - 400 = -40, remainder keeps the sign
        assert_eq!(display_angle(400.0), -40.0);
    }

    #[test]
    fn test_spin() {
        let mut spin = SpinTracker::new();
        assert_eq!(spin.next(0.0), 1);
        assert_eq!(spin.next(90.0), 1);
        // Small step backwards
        assert_eq!(spin.next(45.0), -1);
        // Large jump forwards
        assert_eq!(spin.next(300.0), -1);
        // Large jump backwards flips twice
        assert_eq!(spin.next(10.0), 1);
    }
}
