use std::rc::Rc;
use std::time::Duration;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3};
use tracing::{debug, info, warn};

use super::camera::OrbitCamera;
use super::controller::Controller;
use super::inspector::Inspector;
use super::renderers::{starfield, CompoundRenderer};
use crate::config::AppConfig;
use crate::math::projection::Viewport;
use crate::model::{BodyID, CelestialBody, Orrery};

// Camera distance for the opening overview of the whole system
const OVERVIEW_DISTANCE: f32 = 60.0;
// Focused bodies end up this far away, plus a few of their own radii
const FOCUS_MARGIN: f32 = 10.0;
const FOCUS_SIZE_FACTOR: f32 = 4.0;
const SUN_GLOW_FACTOR: f32 = 2.0;

const LABEL_SCALE: f32 = 36.0;
const PANEL_SCALE: f32 = 40.0;
const HUD_WIDTH: f32 = 520.0;

pub struct View {
    // Object state
    orrery: Orrery,
    body_spheres: Vec<SceneNode>,
    // Camera
    camera: OrbitCamera,
    // Misc
    inspector: Inspector,
    renderer: CompoundRenderer,
    font: Rc<Font>,
}

impl View {
    pub fn new(orrery: Orrery, window: &mut Window, config: &AppConfig) -> Self {
        let body_spheres = orrery
            .registry()
            .bodies()
            .map(|body| Self::create_body_object(window, body, config))
            .collect();

        let mut renderer = CompoundRenderer::new(starfield(config.stars, config.star_spread));
        for planet in orrery.registry().planets() {
            if let Some(orbit) = &planet.orbit {
                renderer.add_ring(orbit.distance as f32, planet.color);
            }
        }

        let viewport = Viewport::new(window.width(), window.height());
        let camera = OrbitCamera::new(OrbitCamera::overview(OVERVIEW_DISTANCE), viewport);

        info!(
            bodies = orrery.registry().len(),
            stars = config.stars,
            policy = %orrery.policy(),
            "scene built"
        );

        let mut view = Self {
            orrery,
            body_spheres,
            camera,
            inspector: Inspector::new(),
            renderer,
            font: Font::default(),
        };
        view.update_scene_objects();
        view
    }

    fn create_body_object(window: &mut Window, body: &CelestialBody, config: &AppConfig) -> SceneNode {
        // Make the sphere that represents the body
        let mut sphere = window.add_sphere(body.display_size);
        let color = &body.color;
        sphere.set_color(color.x, color.y, color.z);

        // kiss3d panics on unreadable textures, so check first and keep the flat
        // color if the file isn't there
        if let Some(file_name) = &body.texture {
            let path = config.textures.join(file_name);
            if path.is_file() {
                sphere.set_color(1.0, 1.0, 1.0);
                sphere.set_texture_from_file(&path, &body.name);
                debug!(body = %body.name, path = %path.display(), "texture loaded");
            } else {
                warn!(body = %body.name, path = %path.display(), "texture not found, using flat color");
            }
        }
        sphere
    }

    pub fn update_state_by(&mut self, delta: Duration) {
        // Update the bodies, then move the camera and scene objects to match
        self.orrery.tick(delta);
        let tracked = self.orrery.selection().map(|id| self.orrery.position(id));
        self.camera.step(delta.as_secs_f32(), tracked);
        self.update_scene_objects();
    }

    fn update_scene_objects(&mut self) {
        for (idx, sphere) in self.body_spheres.iter_mut().enumerate() {
            let position = self.orrery.position(BodyID(idx));
            sphere.set_local_translation(Translation3::from(position.coords));
        }
    }

    fn focus_selected(&mut self) {
        if let Some(body) = self.orrery.selected_body() {
            let radius = FOCUS_MARGIN + FOCUS_SIZE_FACTOR * body.display_size;
            info!(body = %body.name, "focusing");
            self.camera.focus_on(radius);
        }
    }

    pub fn pick_at(&mut self, px: f32, py: f32) {
        let ray = match self.camera.ray_through(px, py) {
            Some(ray) => ray,
            None => return,
        };
        match self.orrery.pick(&ray) {
            Some(_) => {
                self.inspector.show();
                self.focus_selected();
            }
            None => debug!(px, py, "click hit nothing"),
        }
    }

    pub fn select_next(&mut self) {
        self.orrery.select_next();
        self.inspector.show();
        self.focus_selected();
    }

    pub fn select_prev(&mut self) {
        self.orrery.select_prev();
        self.inspector.show();
        self.focus_selected();
    }

    pub fn reset_view(&mut self) {
        info!("resetting view");
        self.orrery.clear_selection();
        self.inspector.collapse();
        self.camera.reset();
    }

    pub fn toggle_inspector(&mut self) {
        self.inspector.toggle(self.orrery.selection().is_some());
    }

    pub fn speed_up(&mut self) {
        let speed = self.orrery.clock_mut().speed_up();
        info!(speed, "simulation speed");
    }

    pub fn slow_down(&mut self) {
        let speed = self.orrery.clock_mut().slow_down();
        info!(speed, "simulation speed");
    }

    pub fn toggle_pause(&mut self) {
        let clock = self.orrery.clock_mut();
        clock.toggle_pause();
        info!(paused = clock.is_paused(), "pause toggled");
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        // The Sun is the only body with no orbit
        for (body, state) in self.orrery.bodies() {
            if body.is_fixed() {
                let center: Point3<f32> = nalgebra::convert(state.world_position());
                self.renderer.draw_glow(
                    center,
                    body.display_size,
                    SUN_GLOW_FACTOR * body.display_size,
                    body.color,
                );
            }
        }

        let text_color = Point3::new(1.0, 1.0, 1.0);
        self.draw_labels(window, &text_color);

        if self.inspector.is_visible() {
            if let Some(body) = self.orrery.selected_body() {
                window.draw_text(
                    &Inspector::text(body),
                    &Point2::origin(),
                    PANEL_SCALE,
                    &self.font,
                    &text_color,
                );
            }
        }

        let width = self.camera.viewport().width as f32;
        window.draw_text(
            &self.time_summary_text(controller.fps()),
            &Point2::new((width - HUD_WIDTH).max(0.0), 0.0),
            PANEL_SCALE,
            &self.font,
            &text_color,
        );
    }

    fn draw_labels(&self, window: &mut Window, color: &Point3<f32>) {
        for (body, _) in self.orrery.bodies() {
            let center = self.orrery.position(body.id);
            // Put the label just above the sphere
            let anchor = center + nalgebra::Vector3::y() * (body.display_size * 1.2);
            if let Some(pixel) = self.camera.project_to_pixel(&anchor) {
                window.draw_text(&body.name, &pixel, LABEL_SCALE, &self.font, color);
            }
        }
    }

    fn time_summary_text(&self, fps: f64) -> String {
        let clock = self.orrery.clock();
        format!(
            "Elapsed: {}
Speed: {}x{}
Motion: {}
FPS: {:.0}",
            format_seconds(clock.elapsed_ms() / 1000.0),
            clock.speed(),
            if clock.is_paused() { " (paused)" } else { "" },
            self.orrery.policy(),
            fps,
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

fn format_seconds(seconds: f64) -> String {
    let mut total_seconds = seconds.max(0.0) as u64;
    let n_minutes = 60;
    let n_hours = n_minutes * 60;
    let n_days = n_hours * 24;

    macro_rules! count_and_remainder {
        ($variable:ident, $divisor:expr) => {
            let $variable = total_seconds / $divisor;
            total_seconds %= $divisor;
        };
    }

    count_and_remainder!(days, n_days);
    count_and_remainder!(hours, n_hours);
    count_and_remainder!(minutes, n_minutes);

    format!(
        "{}d, {:02}:{:02}:{:02}",
        days, hours, minutes, total_seconds
    )
}
