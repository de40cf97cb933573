//! Vector and matrix math for the software pipeline
//!
//! `Vec4` doubles as a homogeneous point (w = 1) and as a plane
//! (xyz = unit normal, w = signed offset). Callers track which one they hold.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

use crate::error::MathError;

fn one() -> f64 {
    1.0
}

/// Four-component vector
///
/// Arithmetic works on x, y, z and always produces a point (w = 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default = "one")]
    pub w: f64,
}

impl Default for Vec4 {
    fn default() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }
}

impl Vec4 {
    pub const UP: Vec4 = Vec4 { x: 0.0, y: 1.0, z: 0.0, w: 1.0 };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn point(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub fn add(self, other: Vec4) -> Vec4 {
        Vec4::point(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Vec4) -> Vec4 {
        Vec4::point(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, s: f64) -> Vec4 {
        Vec4::point(self.x * s, self.y * s, self.z * s)
    }

    pub fn div(self, s: f64) -> Vec4 {
        Vec4::point(self.x / s, self.y / s, self.z / s)
    }

    pub fn neg(self) -> Vec4 {
        self.scale(-1.0)
    }

    pub fn dot(self, other: Vec4) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec4) -> Vec4 {
        Vec4::point(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit-length copy; a zero vector has no direction.
    pub fn normalize(self) -> Result<Vec4, MathError> {
        let l = self.length();
        if l == 0.0 || !l.is_finite() {
            return Err(MathError::DivideByZero);
        }
        Ok(self.div(l))
    }

    /// Component-wise comparison (all four) within `epsilon`
    pub fn approx_eq(self, other: Vec4, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
            && (self.w - other.w).abs() <= epsilon
    }

    /// Homogeneous divide: x, y, z over w
    pub fn perspective_divide(self) -> Vec4 {
        self.div(self.w)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, other: Vec4) -> Vec4 {
        Vec4::add(self, other)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 {
        Vec4::sub(self, other)
    }
}

impl Mul<f64> for Vec4 {
    type Output = Vec4;
    fn mul(self, s: f64) -> Vec4 {
        self.scale(s)
    }
}

impl Div<f64> for Vec4 {
    type Output = Vec4;
    fn div(self, s: f64) -> Vec4 {
        Vec4::div(self, s)
    }
}

impl Neg for Vec4 {
    type Output = Vec4;
    fn neg(self) -> Vec4 {
        Vec4::neg(self)
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.2}, {:.2}, {:.2}, {:.2}>", self.x, self.y, self.z, self.w)
    }
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub elements: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn new(elements: [f64; 16]) -> Self {
        Self { elements }
    }

    fn offset(row: usize, col: usize) -> Result<usize, MathError> {
        if !(1..=4).contains(&row) || !(1..=4).contains(&col) {
            return Err(MathError::IndexOutOfRange { row, col });
        }
        Ok((row - 1) * 4 + (col - 1))
    }

    /// Element at 1-based (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f64, MathError> {
        Ok(self.elements[Self::offset(row, col)?])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MathError> {
        self.elements[Self::offset(row, col)?] = value;
        Ok(())
    }

    /// Apply the transform to all four components of `v`
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let e = &self.elements;
        Vec4 {
            x: v.x * e[0] + v.y * e[1] + v.z * e[2] + v.w * e[3],
            y: v.x * e[4] + v.y * e[5] + v.z * e[6] + v.w * e[7],
            z: v.x * e[8] + v.y * e[9] + v.z * e[10] + v.w * e[11],
            w: v.x * e[12] + v.y * e[13] + v.z * e[14] + v.w * e[15],
        }
    }

    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        let a = &self.elements;
        let b = &other.elements;
        let mut out = [0.0f64; 16];
        for r in 0..4 {
            for c in 0..4 {
                out[r * 4 + c] = (0..4).map(|i| a[r * 4 + i] * b[i * 4 + c]).sum::<f64>();
            }
        }
        Mat4 { elements: out }
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f64) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn translation(v: Vec4) -> Mat4 {
        Mat4::new([
            1.0, 0.0, 0.0, v.x,
            0.0, 1.0, 0.0, v.y,
            0.0, 0.0, 1.0, v.z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_x(angle: f64) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_y(angle: f64) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        self.multiply(&other)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.transform(v)
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
                if i % 4 == 0 {
                    writeln!(f)?;
                }
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// Supporting plane of triangle (a, b, c)
///
/// Returns the unit normal in xyz and the offset `d` in w, so that
/// `n·p + d = 0` for every point p on the plane.
pub fn plane(a: Vec4, b: Vec4, c: Vec4) -> Result<Vec4, MathError> {
    let normal = (a - c).cross(a - b).normalize()?;
    let d = -normal.dot(a);
    Ok(Vec4 { w: d, ..normal })
}
