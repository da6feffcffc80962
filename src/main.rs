#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
#![allow(unsafe_code)]
#![allow(clippy::undocumented_unsafe_blocks)]

use eframe::{egui, egui_glow, glow};
use egui::mutex::Mutex;
use egui::panel::Side;
use egui::{Color32, Id, Response};
use glam::{Vec3, Vec4};

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

mod gfx;
mod scene;
mod terrain;

use scene::{ShaderSource, TerrainScene};

const WIDTH: f32 = 1600f32;
const HEIGHT: f32 = 900f32;

const SHADER_DIR: &str = "Shaders";
const TEXTURE_DIR: &str = "Textures";
const HEIGHTMAP_PATH: &str = "Terrain/heightmap.r16";

const DEFAULT_CAM_SPEED: f32 = 60f32;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([WIDTH, HEIGHT]),
        multisampling: 4,
        depth_buffer: 24,

        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Terrain Viewer",
        options,
        Box::new(|cc| Ok(Box::new(TerrainViewer::new(cc)))),
    )
}

struct TerrainViewer {
    /// Behind an `Arc<Mutex<…>>` so we can pass it to [`egui::PaintCallback`] and paint later.
    scene: Arc<Mutex<TerrainScene>>,
    wireframe: bool,
    cam_speed: f32,
    sun_azimuth: f32,
    sun_elevation: f32,
    vertical_scale: f32,
    bg_color: Color32,
}

impl TerrainViewer {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let gl = cc
            .gl
            .as_ref()
            .expect("You need to run eframe with the glow backend");

        let shader_dir = Path::new(SHADER_DIR);
        let read_shader = |name: &str| {
            fs::read_to_string(shader_dir.join(name)).expect("Could not find shader")
        };
        let (lit_vtx, lit_frag) = (read_shader("terrain.vs"), read_shader("terrain.fs"));
        let (unlit_vtx, unlit_frag) = (
            read_shader("terrain_unlit.vs"),
            read_shader("terrain_unlit.fs"),
        );

        let scene = TerrainScene::new(
            gl,
            ShaderSource {
                vtx: &lit_vtx,
                frag: &lit_frag,
            },
            ShaderSource {
                vtx: &unlit_vtx,
                frag: &unlit_frag,
            },
            Path::new(TEXTURE_DIR),
            Path::new(HEIGHTMAP_PATH),
        )
        .expect("Could not build terrain scene");

        Self {
            scene: Arc::new(Mutex::new(scene)),
            wireframe: false,
            cam_speed: DEFAULT_CAM_SPEED,
            sun_azimuth: 215f32,
            sun_elevation: 55f32,
            vertical_scale: 1f32,
            bg_color: Color32::from_rgb(150, 185, 220),
        }
    }
}

impl eframe::App for TerrainViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::new(Side::Left, Id::new("Control Panel")).show(ctx, |ui| {
            let mut scene = self.scene.lock();

            ui.add(egui::Checkbox::new(&mut self.wireframe, "Wireframe"));
            ui.add(
                egui::Slider::new(&mut self.cam_speed, RangeInclusive::new(0.0, 1000.0))
                    .text("Camera Speed"),
            );
            if ui
                .add(
                    egui::Slider::new(&mut self.vertical_scale, RangeInclusive::new(0.1, 4.0))
                        .text("Vertical Scale"),
                )
                .changed()
            {
                scene
                    .transform_mut()
                    .set_scale(Vec3::new(1.0, self.vertical_scale, 1.0));
            }

            ui.add(egui::Separator::default());

            let mut tint = scene.tint().to_array();
            ui.horizontal(|ui| {
                if ui.color_edit_button_rgba_unmultiplied(&mut tint).changed() {
                    scene.set_tint(Vec4::from_array(tint));
                }
                ui.label("Tint");
            });

            let mut use_lighting = scene.uses_lighting();
            if ui.checkbox(&mut use_lighting, "Lighting").changed() {
                scene.set_lighting(use_lighting);
            }
            ui.add_enabled(
                use_lighting,
                egui::Slider::new(&mut self.sun_azimuth, RangeInclusive::new(0.0, 360.0))
                    .text("Sun Azimuth"),
            );
            ui.add_enabled(
                use_lighting,
                egui::Slider::new(&mut self.sun_elevation, RangeInclusive::new(5.0, 90.0))
                    .text("Sun Elevation"),
            );

            let mut light_color = scene.lighting.light_color.to_array();
            let mut ambient_color = scene.lighting.ambient_color.to_array();
            ui.add_enabled_ui(use_lighting, |ui| {
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut light_color);
                    ui.label("Light");
                });
                ui.horizontal(|ui| {
                    ui.color_edit_button_rgb(&mut ambient_color);
                    ui.label("Ambient");
                });
            });
            scene.lighting = gfx::LightingData::new(
                sun_direction(self.sun_azimuth, self.sun_elevation),
                Vec3::from_array(light_color),
                Vec3::from_array(ambient_color),
            );

            ui.add(egui::Separator::default());

            ui.horizontal(|ui| {
                ui.color_edit_button_srgba(&mut self.bg_color);
                ui.label("BG Color");
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::canvas(ui.style())
                .fill(self.bg_color)
                .show(ui, |ui| {
                    self.custom_painting(ui, ctx);
                });
        });
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.scene.lock().destroy_gl(gl);
        }
    }
}

/// Direction the sun's light travels for the given angles in degrees.
fn sun_direction(azimuth: f32, elevation: f32) -> Vec3 {
    let (az, el) = (azimuth.to_radians(), elevation.to_radians());
    -Vec3::new(el.cos() * az.cos(), el.sin(), el.cos() * az.sin())
}

impl TerrainViewer {
    fn handle_input(&mut self, ctx: &egui::Context, response: &Response) {
        let scene = &mut self.scene.lock();

        let cam = &mut scene.camera;

        ctx.input(|i| {
            let amount = self.cam_speed * i.predicted_dt * 2.0f32;

            if i.key_down(egui::Key::W) {
                cam.move_forward(amount);
            }
            if i.key_down(egui::Key::S) {
                cam.move_backward(amount);
            }
            if i.key_down(egui::Key::A) {
                cam.move_left(amount);
            }
            if i.key_down(egui::Key::D) {
                cam.move_right(amount);
            }
            if i.key_down(egui::Key::Space) {
                cam.move_up(amount);
            }
            if i.modifiers.shift {
                cam.move_down(amount);
            }
        });

        cam.move_yaw(response.drag_motion().x * 0.1);
        cam.move_pitch(-response.drag_motion().y * 0.1);
    }

    fn custom_painting(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let size = ui.available_size();

        let (rect, response) = ui.allocate_at_least(size, egui::Sense::drag());

        // Handle Input related things
        self.handle_input(ctx, &response);

        // Clone to Give to callback
        let scene = self.scene.clone();
        let wire_frame = self.wireframe;
        let bg_color = self.bg_color;
        let aspect = rect.width() / rect.height();

        // Create Callback
        let callback = egui::PaintCallback {
            rect,
            callback: std::sync::Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                let scene = &mut scene.lock();
                let gl = painter.gl();
                unsafe {
                    use glow::HasContext as _;
                    gl.enable(glow::DEPTH_TEST);
                    gl.enable(glow::CULL_FACE);
                    if wire_frame {
                        gl.polygon_mode(glow::FRONT_AND_BACK, glow::LINE);
                    } else {
                        gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
                    }
                    gl.clear_color(
                        bg_color.r() as f32 / u8::MAX as f32,
                        bg_color.g() as f32 / u8::MAX as f32,
                        bg_color.b() as f32 / u8::MAX as f32,
                        bg_color.a() as f32 / u8::MAX as f32,
                    );
                    gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
                }

                scene.draw(gl, aspect);

                // Reset back to what egui expects
                unsafe {
                    use glow::HasContext as _;
                    gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
                    gl.disable(glow::CULL_FACE);
                    gl.disable(glow::DEPTH_TEST);
                }
            })),
        };
        ui.painter().add(callback);
    }
}
