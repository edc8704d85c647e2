//! Globe orientation, orbit camera and orthographic screen projection

use glam::{Mat3, Vec3};
use std::f32::consts::{FRAC_PI_6, TAU};

/// Auto-rotation per frame (rad).
pub const AUTO_SPIN: f32 = 0.0005;
/// Resting globe orientation: yaw and roll applied before any spin.
pub const BASE_YAW: f32 = 2.8;
pub const BASE_ROLL: f32 = -0.4;
/// Drag sensitivity, as a fraction of a full turn per viewport dragged.
pub const ROTATE_SPEED: f32 = 0.5;
/// Camera polar angle is held to [pi/3, 2pi/3], i.e. +-pi/6 from the equator.
pub const MAX_ELEVATION: f32 = FRAC_PI_6;

const MIN_ZOOM: f32 = 0.5;
const MAX_ZOOM: f32 = 3.0;

/// Direction the camera looks from, toward the globe centre.
const EYE: Vec3 = Vec3::new(-3.0, 1.0, 0.5);

/// Render-loop owned orientation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitView {
    pub spin: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub zoom: f32,
}

impl Default for OrbitView {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitView {
    pub fn new() -> Self {
        let eye = EYE.normalize();
        Self {
            spin: 0.0,
            azimuth: eye.x.atan2(eye.z),
            elevation: eye.y.asin().clamp(-MAX_ELEVATION, MAX_ELEVATION),
            zoom: 1.0,
        }
    }

    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.elevation = tilt.clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self
    }

    /// One frame of auto-rotation.
    pub fn advance(&mut self) {
        self.spin = (self.spin + AUTO_SPIN) % TAU;
    }

    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth = (self.azimuth + d_azimuth) % TAU;
        self.elevation = (self.elevation + d_elevation).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Orbit from a pointer drag measured in cells. Both axes scale by the
    /// viewport height, so the turn does not depend on terminal width.
    pub fn drag(&mut self, dx: i32, dy: i32, rows: u16) {
        let h = rows.max(1) as f32;
        // A column is half as wide as a row is tall.
        let dx = dx as f32 * 0.5;
        self.orbit(-TAU * dx / h * ROTATE_SPEED, TAU * dy as f32 / h * ROTATE_SPEED);
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Globe-local to world rotation.
    pub fn model(&self) -> Mat3 {
        Mat3::from_rotation_y(BASE_YAW + self.spin) * Mat3::from_rotation_z(BASE_ROLL)
    }

    /// World to camera rotation. The camera looks down -z.
    pub fn view(&self) -> Mat3 {
        Mat3::from_rotation_x(self.elevation) * Mat3::from_rotation_y(-self.azimuth)
    }

    pub fn transform(&self) -> Mat3 {
        self.view() * self.model()
    }
}

/// A projected point in fractional cells. `depth` > 0 faces the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenPoint {
    /// Position on the braille dot grid.
    pub fn dot(&self) -> (i32, i32) {
        ((self.x * 2.0).floor() as i32, (self.y * 4.0).floor() as i32)
    }
}

/// Screen placement of the globe for a terminal size.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub center_x: f32,
    pub center_y: f32,
    /// Globe radius in columns. Rows are half that.
    pub radius: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, zoom: f32) -> Self {
        let w = cols as f32;
        let h = rows as f32;
        Self {
            cols,
            rows,
            center_x: w / 2.0,
            center_y: h / 2.0,
            radius: (h * 1.8).min(w * 0.8) * 0.4 * zoom,
        }
    }

    /// Project a globe-local point. Back-facing points are `None`.
    pub fn project(&self, transform: &Mat3, p: Vec3) -> Option<ScreenPoint> {
        let point = self.place(*transform * p);
        (point.depth >= 0.0).then_some(point)
    }

    /// Project an already-rotated camera-space point, ignoring facing.
    pub fn place(&self, v: Vec3) -> ScreenPoint {
        ScreenPoint {
            x: self.center_x + v.x * self.radius,
            y: self.center_y - v.y * self.radius * 0.5,
            depth: v.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::CITIES;

    #[test]
    fn default_camera_looks_along_eye() {
        let view = OrbitView::new();
        let v = view.view() * EYE.normalize();
        assert!(v.x.abs() < 1e-5);
        assert!(v.y.abs() < 1e-5);
        assert!((v.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn every_city_faces_the_viewer_at_start() {
        let view = OrbitView::new();
        let t = view.transform();
        let vp = Viewport::new(120, 40, 1.0);
        for city in &CITIES {
            assert!(vp.project(&t, city.position()).is_some(), "{} is hidden", city.name);
        }
    }

    #[test]
    fn far_side_is_hidden() {
        let view = OrbitView::new();
        let t = view.transform();
        let vp = Viewport::new(120, 40, 1.0);
        let facing = t.transpose() * Vec3::Z;
        assert!(vp.project(&t, facing).is_some());
        assert!(vp.project(&t, -facing).is_none());
    }

    #[test]
    fn facing_point_lands_at_centre() {
        let view = OrbitView::new();
        let t = view.transform();
        let vp = Viewport::new(100, 30, 1.0);
        let p = vp.project(&t, t.transpose() * Vec3::Z).unwrap();
        assert!((p.x - 50.0).abs() < 1e-3);
        assert!((p.y - 15.0).abs() < 1e-3);
    }

    #[test]
    fn elevation_is_clamped() {
        let mut view = OrbitView::new();
        view.orbit(0.0, 10.0);
        assert!((view.elevation - MAX_ELEVATION).abs() < 1e-6);
        view.orbit(0.0, -10.0);
        assert!((view.elevation + MAX_ELEVATION).abs() < 1e-6);
        assert_eq!(OrbitView::new().with_tilt(2.0).elevation, MAX_ELEVATION);
    }

    #[test]
    fn spin_advances_per_frame() {
        let mut view = OrbitView::new();
        let before = view.model();
        view.advance();
        assert!((view.spin - AUTO_SPIN).abs() < 1e-7);
        assert_ne!(before, view.model());
    }

    #[test]
    fn drag_scales_both_axes_by_height() {
        let mut view = OrbitView::new().with_tilt(0.0);
        let start = view;
        view.drag(2, 0, 40);
        let d_azimuth = (view.azimuth - start.azimuth).abs();
        assert!((d_azimuth - TAU * ROTATE_SPEED / 40.0).abs() < 1e-5);

        let mut down = OrbitView::new().with_tilt(0.0);
        down.drag(0, 1, 40);
        assert!((down.elevation - d_azimuth).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut view = OrbitView::new();
        for _ in 0..20 {
            view.zoom_by(1.2);
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        view.reset_zoom();
        assert_eq!(view.zoom, 1.0);
        let small = Viewport::new(80, 24, 0.5);
        let big = Viewport::new(80, 24, 1.0);
        assert!(small.radius < big.radius);
    }

    #[test]
    fn rows_are_squashed() {
        let vp = Viewport::new(100, 40, 1.0);
        let p = vp.place(Vec3::new(0.0, 1.0, 1.0));
        assert!((vp.center_y - p.y - vp.radius * 0.5).abs() < 1e-4);
        assert_eq!(p.dot(), ((p.x * 2.0).floor() as i32, (p.y * 4.0).floor() as i32));
    }
}
