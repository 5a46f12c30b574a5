//! Scene animation: an orbiting camera and a spinning model

use crate::config::{OrbitConfig, RenderConfig, SpinConfig};
use crate::rasterizer::{Camera, Mat3, Mesh, ModelTransform, Vec3};

/// Camera on a sphere around the origin, looking inwards
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub phi: f32,
    pub theta: f32,
    pub radius: f32,
    pub phi_speed: f32,
    pub theta_speed: f32,
}

impl OrbitCamera {
    pub fn new(config: &OrbitConfig) -> Self {
        Self {
            phi: config.phi,
            theta: config.theta,
            radius: config.radius,
            phi_speed: config.phi_speed,
            theta_speed: config.theta_speed,
        }
    }

    pub fn advance(&mut self) {
        self.phi += self.phi_speed;
        self.theta += self.theta_speed;
    }

    /// Unit vector from the origin towards the camera
    pub fn direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(cos_theta * sin_phi, sin_theta, cos_theta * cos_phi)
    }

    pub fn camera(&self) -> Camera {
        let dir = self.direction();

        // Over the poles the world up is parallel to the view direction
        let up = if dir.dot(Vec3::UP).abs() > 0.999 {
            let s = -pole_sign(self.theta);
            Vec3::new(s * self.phi.sin(), 0.0, s * self.phi.cos())
        } else {
            Vec3::UP
        };

        Camera::new(dir * self.radius, Mat3::rotate(dir, up))
    }
}

/// +1 over the north pole, -1 over the south pole
fn pole_sign(theta: f32) -> f32 {
    if theta.sin() >= 0.0 { 1.0 } else { -1.0 }
}

/// What gets drawn each frame and how it moves
pub struct Scene {
    pub mesh: Mesh,
    pub orbit: OrbitCamera,
    pub offset: Vec3,
    pub spin: Option<SpinConfig>,
    pub spin_angle: f32,
    pub paused: bool,
}

impl Scene {
    pub fn new(mesh: Mesh, config: &RenderConfig) -> Self {
        Self {
            mesh,
            orbit: OrbitCamera::new(&config.orbit),
            offset: config.model_offset,
            spin: config.spin,
            spin_angle: 0.0,
            paused: false,
        }
    }

    /// Step the animation by one frame
    pub fn advance(&mut self) {
        if self.paused {
            return;
        }
        self.orbit.advance();
        if let Some(spin) = self.spin {
            self.spin_angle = (self.spin_angle + spin.speed) % std::f32::consts::TAU;
        }
    }

    pub fn camera(&self) -> Camera {
        self.orbit.camera()
    }

    pub fn model_transform(&self) -> ModelTransform {
        ModelTransform {
            offset: self.offset,
            spin: self.spin.map(|s| (s.axis, self.spin_angle)),
        }
    }
}
