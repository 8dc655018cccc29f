use glam::{Mat4, Vec3};
use std::f32::consts::PI;
use tidewater_render::RenderView;

/// Orbit camera circling a target point.
///
/// Camera motion lives outside the scene state; it never affects the world.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around +Y, radians; 0 looks from +Z.
    pub azimuth: f32,
    /// Angle down from +Y, radians.
    pub polar: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut cam = Self {
            target: Vec3::ZERO,
            distance: 1.0,
            azimuth: 0.0,
            polar: 0.0,
            fov: 55.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 20_000.0,
            min_distance: 40.0,
            max_distance: 200.0,
            max_polar: PI * 0.495,
            sensitivity: 0.005,
            zoom_speed: 0.1,
        };
        cam.look_from(Vec3::new(30.0, 30.0, 100.0), Vec3::new(0.0, 10.0, 0.0));
        cam
    }
}

impl OrbitCamera {
    /// Place the camera at `eye` looking at `target`, then apply the limits.
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        let offset = eye - target;
        self.target = target;
        self.distance = offset.length();
        if self.distance > f32::EPSILON {
            self.azimuth = offset.x.atan2(offset.z);
            self.polar = (offset.y / self.distance).clamp(-1.0, 1.0).acos();
        }
        self.clamp();
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Orbit by a pointer drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.polar -= dy * self.sensitivity;
        self.clamp();
    }

    /// Zoom by wheel notches; positive moves closer.
    pub fn zoom(&mut self, notches: f32) {
        self.distance *= (1.0 - self.zoom_speed).powf(notches);
        self.clamp();
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.polar = self.polar.clamp(0.01, self.max_polar);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The view as seen by renderer-agnostic consumers.
    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
        }
    }
}
