use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::config::AppConfig;
use crate::model::Orrery;

pub mod camera;
mod controller;
pub mod inspector;
mod renderers;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
    last_frame: Instant,
}

impl Simulation {
    pub fn new(orrery: Orrery, window: &mut Window, config: &AppConfig) -> Self {
        Self {
            view: View::new(orrery, window, config),
            controller: Controller::new(),
            last_frame: Instant::now(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        // Process events
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.view.update_state_by(delta);
        self.view.prerender_scene(window, &self.controller);
        self.controller.increment_frame_counter();
    }
}
