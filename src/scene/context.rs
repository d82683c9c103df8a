use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use std::f32::consts::TAU;

/// Time-based animation state for the loaded object: a spin about Y and a
/// sinusoidal bob along Y.
#[derive(Debug, Clone)]
pub struct SpinState {
    pub enabled: bool,
    pub bob: bool,
    /// Radians per second.
    pub angular_velocity: f32,
    /// Accumulated rotation, wrapped into [0, 2pi).
    pub angle: f32,
    pub y_offset: f32,
}

impl SpinState {
    pub fn new(enabled: bool, bob: bool, angular_velocity: f32) -> Self {
        Self {
            enabled,
            bob,
            angular_velocity,
            angle: 0.0,
            y_offset: 0.0,
        }
    }
}

/// Holds all scene state required for rendering: the camera, the active mesh
/// (replaced wholesale when a model is loaded) and the animation state.
/// Owned by the frame driver and passed to each pipeline stage.
pub struct RenderContext {
    pub camera: Camera,
    pub mesh: Option<Mesh>,
    pub spin: SpinState,
}

impl RenderContext {
    /// Advances the time-based animation. `dt` is the last frame's duration,
    /// `elapsed` the total run time, both in seconds.
    pub fn advance_animation(&mut self, dt: f32, elapsed: f32) {
        if !self.spin.enabled {
            return;
        }

        self.spin.angle = (self.spin.angle + self.spin.angular_velocity * dt).rem_euclid(TAU);
        if self.spin.bob {
            self.spin.y_offset = (elapsed * 2.0).sin();
        }
    }

    /// Whether the next tick will change visible state on its own.
    pub fn is_animating(&self) -> bool {
        self.spin.enabled && self.mesh.is_some()
    }
}
