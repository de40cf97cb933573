//! Perspective camera
//!
//! Builds the projection and look-at matrices and keeps their product as the
//! single world-to-clip transform applied to every vertex.

use super::math::{Mat4, Vec4};
use crate::error::MathError;

impl Mat4 {
    /// Perspective projection with a fixed frustum (right = top = 1)
    ///
    /// After the divide by w, z runs from -1 at `near` to 1 at `far`.
    pub fn perspective(near: f64, far: f64) -> Mat4 {
        let r = 1.0;
        let t = 1.0;
        let d = far - near;
        Mat4::new([
            near / r, 0.0, 0.0, 0.0,
            0.0, near / t, 0.0, 0.0,
            0.0, 0.0, (far + near) / d, (-2.0 * far * near) / d,
            0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// View matrix looking from `eye` towards `focus`
    ///
    /// The right vector is `forward x up` and is not re-normalized.
    pub fn look_at(focus: Vec4, eye: Vec4, up: Vec4) -> Result<Mat4, MathError> {
        let f = (focus - eye).normalize()?;
        let r = f.cross(up);
        if r.length() == 0.0 {
            return Err(MathError::Degenerate);
        }
        let u = r.cross(f);

        let rotation = Mat4::new([
            r.x, r.y, r.z, 0.0,
            u.x, u.y, u.z, 0.0,
            -f.x, -f.y, -f.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        Ok(rotation * Mat4::translation(-eye))
    }
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub near: f64,
    pub far: f64,
    pub eye: Vec4,
    pub focus: Vec4,
    pub up: Vec4,

    // Computed projection * view
    transformation: Mat4,
}

impl Camera {
    pub fn new(near: f64, far: f64, eye: Vec4, focus: Vec4, up: Vec4) -> Result<Self, MathError> {
        let mut cam = Self {
            near,
            far,
            eye,
            focus,
            up,
            transformation: Mat4::IDENTITY,
        };
        cam.update_transformation()?;
        Ok(cam)
    }

    /// Move the camera; the transform is rebuilt before the next pass uses it.
    pub fn set_view(&mut self, eye: Vec4, focus: Vec4, up: Vec4) -> Result<(), MathError> {
        let previous = (self.eye, self.focus, self.up);
        self.eye = eye;
        self.focus = focus;
        self.up = up;
        if let Err(e) = self.update_transformation() {
            (self.eye, self.focus, self.up) = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn update_transformation(&mut self) -> Result<(), MathError> {
        let view = Mat4::look_at(self.focus, self.eye, self.up)?;
        self.transformation = Mat4::perspective(self.near, self.far) * view;
        Ok(())
    }

    pub fn transformation(&self) -> &Mat4 {
        &self.transformation
    }

    /// World point to normalized device coordinates
    pub fn project(&self, p: Vec4) -> Vec4 {
        self.transformation.transform(p).perspective_divide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_perspective_depth_range() {
        let proj = Mat4::perspective(1.0, 1000.0);
        let near = (proj * Vec4::point(0.0, 0.0, 1.0)).perspective_divide();
        let far = (proj * Vec4::point(0.0, 0.0, 1000.0)).perspective_divide();
        assert!((near.z + 1.0).abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec4::point(3.0, 2.0, -5.0);
        let view = Mat4::look_at(Vec4::point(0.0, 0.0, 0.0), eye, Vec4::UP).unwrap();
        assert!(view.transform(eye).approx_eq(Vec4::point(0.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_look_at_forward_maps_to_negative_z() {
        let view = Mat4::look_at(
            Vec4::point(0.0, 0.0, 10.0),
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::UP,
        )
        .unwrap();
        let p = view.transform(Vec4::point(0.0, 0.0, 4.0));
        assert!(p.approx_eq(Vec4::point(0.0, 0.0, -4.0), EPS));
    }

    #[test]
    fn test_look_at_rejects_degenerate() {
        let eye = Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(Mat4::look_at(eye, eye, Vec4::UP), Err(MathError::DivideByZero));
        assert_eq!(
            Mat4::look_at(Vec4::point(1.0, 5.0, 1.0), eye, Vec4::UP),
            Err(MathError::Degenerate)
        );
    }

    #[test]
    fn test_set_view_recomputes_and_rolls_back() {
        let mut cam = Camera::new(
            1.0,
            100.0,
            Vec4::point(0.0, 0.0, -10.0),
            Vec4::point(0.0, 0.0, 0.0),
            Vec4::UP,
        )
        .unwrap();
        let before = *cam.transformation();

        cam.set_view(Vec4::point(5.0, 0.0, -10.0), Vec4::point(0.0, 0.0, 0.0), Vec4::UP)
            .unwrap();
        assert!(!cam.transformation().approx_eq(&before, EPS));

        let moved = *cam.transformation();
        let bad = Vec4::point(0.0, 0.0, 0.0);
        assert!(cam.set_view(bad, bad, Vec4::UP).is_err());
        assert_eq!(*cam.transformation(), moved);
        assert_eq!(cam.eye, Vec4::point(5.0, 0.0, -10.0));
    }
}
