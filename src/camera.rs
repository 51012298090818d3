use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

const MIN_POLAR_ANGLE: f32 = 1e-4;
const ZOOM_STEP: f32 = 0.95;
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            eye: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            up: Vec3::Y,
            fov_y_radians: config.fov_y_degrees.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit-style camera manipulation around a target with damped rotation.
///
/// Input only accumulates pending deltas; `update` applies a `damping_factor`
/// share of them each frame and decays the rest, so the camera keeps gliding
/// for a few frames after the pointer stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,

    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,

    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    pub fn new(camera: &Camera, config: &CameraConfig) -> Self {
        let offset = camera.eye - camera.target;
        let radius = offset.length().max(SETTLE_EPSILON);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        Self {
            target: camera.target,
            radius,
            theta,
            phi,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
        }
    }

    /// Queues a rotation from a pointer drag of `pixels` on a surface `viewport_height` tall.
    pub fn rotate(&mut self, pixels: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }

        self.pending_theta -= TAU * pixels.x / viewport_height * self.rotate_speed;
        self.pending_phi -= TAU * pixels.y / viewport_height * self.rotate_speed;
    }

    /// Positive steps move the camera towards the target.
    pub fn zoom(&mut self, steps: f32) {
        self.pending_scale *= ZOOM_STEP.powf(steps * self.zoom_speed);
    }

    /// Applies pending input to `camera`. Runs every frame regardless of playback.
    /// Returns `true` while the camera is still moving.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let damped = self.damping_factor > 0.0 && self.damping_factor < 1.0;
        let share = if damped { self.damping_factor } else { 1.0 };

        let step_theta = self.pending_theta * share;
        let step_phi = self.pending_phi * share;

        self.theta += step_theta;
        self.phi = (self.phi + step_phi).clamp(MIN_POLAR_ANGLE, PI - MIN_POLAR_ANGLE);

        let previous_radius = self.radius;
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.pending_scale = 1.0;

        if damped {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        if self.pending_theta.abs() < SETTLE_EPSILON {
            self.pending_theta = 0.0;
        }
        if self.pending_phi.abs() < SETTLE_EPSILON {
            self.pending_phi = 0.0;
        }

        camera.target = self.target;
        camera.eye = self.target + self.offset();

        step_theta.abs() > SETTLE_EPSILON
            || step_phi.abs() > SETTLE_EPSILON
            || (self.radius - previous_radius).abs() > SETTLE_EPSILON
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_settled(&self) -> bool {
        self.pending_theta == 0.0 && self.pending_phi == 0.0 && self.pending_scale == 1.0
    }

    fn offset(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}
