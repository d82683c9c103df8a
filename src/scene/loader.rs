use crate::io::config::Config;
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::{RenderContext, SpinState};
use crate::scene::mesh::Mesh;
use log::{info, warn};

/// Builds the render context from configuration: camera, optional mesh and
/// animation state. A missing or broken mesh leaves the scene empty rather
/// than failing startup; invalid camera parameters are fatal.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext, String> {
    let camera = build_camera_from_config(config)?;
    let mesh = load_mesh_from_config(config);

    Ok(RenderContext {
        camera,
        mesh,
        spin: SpinState::new(
            config.object.spin,
            config.object.bob,
            config.object.angular_velocity.to_radians(),
        ),
    })
}

/// Applies a freshly loaded config to an existing context (hot reload).
/// The current orbit pose is kept; intrinsics, mesh and animation follow the
/// new configuration.
pub fn reload_scene(context: &mut RenderContext, config: &Config) -> Result<(), String> {
    let mut camera = build_camera_from_config(config)?;
    camera.set_orbit(
        context.camera.orbit_h,
        context.camera.orbit_v,
        context.camera.distance,
        config.camera.min_distance,
    );
    context.camera = camera;

    context.mesh = load_mesh_from_config(config);
    context.spin = SpinState::new(
        config.object.spin,
        config.object.bob,
        config.object.angular_velocity.to_radians(),
    );
    Ok(())
}

fn build_camera_from_config(config: &Config) -> Result<Camera, String> {
    let mut camera = Camera::new(
        config.camera.focal_length,
        config.camera.aperture_width,
        config.camera.aperture_height,
        config.camera.near,
        config.render.width,
        config.render.height,
    )?;

    camera.set_orbit(
        config.camera.orbit_horizontal.to_radians(),
        config.camera.orbit_vertical.to_radians(),
        config.camera.distance,
        config.camera.min_distance,
    );
    Ok(camera)
}

fn load_mesh_from_config(config: &Config) -> Option<Mesh> {
    let path = config.object.path.as_deref()?;

    match load_obj(path) {
        Ok(mesh) => {
            info!(
                "Scene ready: {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            Some(mesh)
        }
        Err(e) => {
            warn!("Starting with an empty scene: {e}");
            None
        }
    }
}
