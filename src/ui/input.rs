use crate::scene::camera::Camera;
use minifb::{MouseButton, MouseMode, Window};

/// Pointer input normalized to the signals the orbit controller consumes.
/// Produced by the window adapter below, or synthesized directly in tests
/// and headless drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    DragStart,
    /// Pointer movement since the last sample, in pixels.
    DragDelta { dx: f32, dy: f32 },
    DragEnd,
    /// Wheel notch: +1.0 dollies away from the target, -1.0 toward it.
    Zoom { direction: f32 },
}

/// Turns normalized pointer events into clamped orbit-camera mutations.
/// All camera input funnels through here.
pub struct OrbitController {
    /// Radians of orbit per pixel of drag.
    pub sensitivity: f32,

    dragging: bool,
    last_mouse_pos: Option<(f32, f32)>,
}

impl OrbitController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            dragging: false,
            last_mouse_pos: None,
        }
    }

    /// Feeds one normalized event. Returns true when the camera changed.
    pub fn apply(&mut self, event: InputEvent, camera: &mut Camera) -> bool {
        match event {
            InputEvent::DragStart => {
                self.dragging = true;
                false
            }
            InputEvent::DragDelta { dx, dy } => {
                if !self.dragging || (dx == 0.0 && dy == 0.0) {
                    return false;
                }
                camera.rotate_orbit(dx * self.sensitivity, dy * self.sensitivity);
                true
            }
            InputEvent::DragEnd => {
                self.dragging = false;
                false
            }
            InputEvent::Zoom { direction } => {
                if direction == 0.0 {
                    return false;
                }
                // Dolly faster the farther out the camera sits.
                let amplitude =
                    1.0 + (camera.distance - camera.min_distance).max(0.0).sqrt();
                camera.zoom_dolly(direction * amplitude);
                true
            }
        }
    }

    /// Window adapter: derives normalized events from the current minifb
    /// state (left-button drag, vertical wheel) and applies them.
    /// Returns true when the camera changed this tick.
    pub fn update(&mut self, window: &Window, camera: &mut Camera) -> bool {
        let mut changed = false;

        if let Some((_, scroll_y)) = window.get_scroll_wheel()
            && scroll_y != 0.0
        {
            // Wheel up pulls the camera in.
            let direction = if scroll_y > 0.0 { -1.0 } else { 1.0 };
            changed |= self.apply(InputEvent::Zoom { direction }, camera);
        }

        if window.get_mouse_down(MouseButton::Left) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
                match self.last_mouse_pos {
                    Some((last_x, last_y)) => {
                        changed |= self.apply(
                            InputEvent::DragDelta {
                                dx: x - last_x,
                                dy: y - last_y,
                            },
                            camera,
                        );
                    }
                    None => {
                        self.apply(InputEvent::DragStart, camera);
                    }
                }
                self.last_mouse_pos = Some((x, y));
            }
        } else if self.last_mouse_pos.take().is_some() {
            self.apply(InputEvent::DragEnd, camera);
        }

        changed
    }
}
