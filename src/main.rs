use std::{path::PathBuf, sync::Arc};

use glam::{Mat4, Vec3};

use mp3d_viewer::{
    Error,
    abs::*,
    bindings::{LitSlot, MvpSlot},
    config::{CameraConfig, Config, Scene},
    light::Light,
    logging,
    mesh::MeshData,
};

fn main() {
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn projection(camera: &CameraConfig, aspect: f32) -> Mat4 {
    Mat4::perspective_rh_gl(camera.fov_degrees.to_radians(), aspect, camera.near, camera.far)
}

fn run() -> Result<(), Error> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::discover(config_path.as_deref());
    let level = config
        .as_ref()
        .ok()
        .and_then(|config| config.level_filter().ok())
        .unwrap_or(log::LevelFilter::Info);
    logging::setup_logger(level)?;
    let config = config?;
    config.level_filter()?;

    let mut app = App::new(&config.window, &config.render, LogSink)?;
    let gl = Arc::clone(&app.gl);
    let assets = &config.assets;

    let mut triangle = Geometry::from_mesh(&gl, &MeshData::triangle())?;
    let mut quad = Geometry::from_mesh(&gl, &MeshData::quad())?;
    let mut mesh = Geometry::load(&gl, &assets.mesh)?;

    let mut albedo = match &assets.texture {
        Some(path) => Texture::load(&gl, path)?,
        None => Texture::from_image(
            &gl,
            &DecodedImage::checkerboard(64, 8, [196, 148, 92], [150, 104, 60]),
        )?,
    };

    let mut basic_shader = ShaderProgram::load(&gl, &assets.basic_vert, &assets.basic_frag)?;
    let mut mvp_shader = ShaderProgram::load(&gl, &assets.mvp_vert, &assets.basic_frag)?;
    let mut lit_shader = ShaderProgram::load(&gl, &assets.light_vert, &assets.light_frag)?;

    let camera = &config.camera;
    let view = Mat4::look_at_rh(Vec3::from(camera.eye), Vec3::from(camera.target), Vec3::Y);
    let proj = projection(camera, app.aspect_ratio());
    let spin = Mat4::from_rotation_y(config.render.rotation_degrees_per_frame.to_radians());
    let mut model = Mat4::IDENTITY;

    lit_shader.set_uniform(LitSlot::Projection, proj);
    lit_shader.set_uniform(LitSlot::View, view);
    lit_shader.set_uniform(LitSlot::Model, model);
    lit_shader.set_uniform(LitSlot::Albedo, TextureUnit { texture: &albedo, unit: 0 });
    lit_shader.set_uniform(LitSlot::Ambient, Vec3::from(config.light.ambient));
    Light::from(&config.light).apply(&lit_shader, LitSlot::LightColor, LitSlot::LightDirection);

    mvp_shader.set_uniform(MvpSlot::Projection, proj);
    mvp_shader.set_uniform(MvpSlot::View, view);
    mvp_shader.set_uniform(MvpSlot::Model, model);

    let scene = config.render.scene;
    log::info!("Drawing {scene:?}");

    let mut frames: u64 = 0;
    app.reset_time(0.0);
    while !app.should_close() {
        if app.take_resize().is_some() {
            let proj = projection(camera, app.aspect_ratio());
            lit_shader.set_uniform(LitSlot::Projection, proj);
            mvp_shader.set_uniform(MvpSlot::Projection, proj);
        }

        model *= spin;

        app.clear();

        match scene {
            Scene::LitMesh => {
                lit_shader.set_uniform(LitSlot::Model, model);
                lit_shader.set_uniform(LitSlot::Time, app.time());
                draw(&lit_shader, &mesh);
            }
            Scene::MvpMesh => {
                mvp_shader.set_uniform(MvpSlot::Model, model);
                draw(&mvp_shader, &mesh);
            }
            Scene::FlatTriangle => draw(&basic_shader, &triangle),
            Scene::FlatQuad => draw(&basic_shader, &quad),
        }

        app.tick();
        frames += 1;
    }

    log::info!("Rendered {frames} frames in {:.1}s", app.time());

    triangle.free();
    quad.free();
    mesh.free();
    albedo.free();
    basic_shader.free();
    mvp_shader.free();
    lit_shader.free();

    app.term();
    Ok(())
}
