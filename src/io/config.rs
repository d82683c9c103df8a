use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub object: ObjectConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            object: ObjectConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Headless output path; a timestamped name is used when absent.
    #[serde(default)]
    pub output: Option<String>,

    // --- Background ---
    #[serde(default = "default_gradient_top")]
    pub background_gradient_top: [f32; 3],
    #[serde(default = "default_gradient_bottom")]
    pub background_gradient_bottom: [f32; 3],

    // --- Pipeline ---
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    /// Re-render every tick; when false the frame is only redrawn after the
    /// camera, mesh or animation state changes.
    #[serde(default = "default_true")]
    pub continuous: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: None,
            background_gradient_top: default_gradient_top(),
            background_gradient_bottom: default_gradient_bottom(),
            cull_mode: default_cull_mode(),
            continuous: default_true(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_gradient_top() -> [f32; 3] {
    [80.0, 80.0, 80.0]
}
fn default_gradient_bottom() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Focal length in millimetres.
    #[serde(default = "default_focal_length")]
    pub focal_length: f32,
    /// Film aperture in inches (film-gate convention).
    #[serde(default = "default_aperture_width")]
    pub aperture_width: f32,
    #[serde(default = "default_aperture_height")]
    pub aperture_height: f32,
    #[serde(default = "default_near")]
    pub near: f32,

    // --- Orbit pose, angles in degrees ---
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_orbit_horizontal")]
    pub orbit_horizontal: f32,
    #[serde(default = "default_orbit_vertical")]
    pub orbit_vertical: f32,

    /// Radians of orbit per pixel of drag.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            focal_length: default_focal_length(),
            aperture_width: default_aperture_width(),
            aperture_height: default_aperture_height(),
            near: default_near(),
            distance: default_distance(),
            min_distance: default_min_distance(),
            orbit_horizontal: default_orbit_horizontal(),
            orbit_vertical: default_orbit_vertical(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_focal_length() -> f32 {
    35.0
}
fn default_aperture_width() -> f32 {
    1.995
}
fn default_aperture_height() -> f32 {
    1.5
}
fn default_near() -> f32 {
    0.1
}
fn default_distance() -> f32 {
    15.0
}
fn default_min_distance() -> f32 {
    3.0
}
fn default_orbit_horizontal() -> f32 {
    180.0
}
fn default_orbit_vertical() -> f32 {
    34.4
}
fn default_sensitivity() -> f32 {
    0.01
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    /// Mesh to load at startup; the scene starts empty when absent.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_true")]
    pub spin: bool,
    #[serde(default = "default_true")]
    pub bob: bool,
    /// Degrees per second of spin about the Y axis.
    #[serde(default = "default_angular_velocity")]
    pub angular_velocity: f32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            path: None,
            spin: default_true(),
            bob: default_true(),
            angular_velocity: default_angular_velocity(),
        }
    }
}

fn default_angular_velocity() -> f32 {
    180.0
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse TOML: {e}"))
    }
}
