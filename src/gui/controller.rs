use std::time::{Duration, Instant};

use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::Vector2;

use super::view::View;

// Key config, all in one place
const KEY_PREV_BODY: Key = Key::Q;
const KEY_NEXT_BODY: Key = Key::E;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_RESET_VIEW: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_INSPECTOR: Key = Key::I;

// A press and release further apart than this (in pixels) is a drag, not a click
const CLICK_TOLERANCE: f32 = 4.0;

pub struct Controller {
    cursor_pos: Vector2<f32>,
    press_pos: Option<Vector2<f32>>,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window: Duration,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            window,
            previous_fps: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed > self.window {
            self.previous_fps = self.counter as f64 / elapsed.as_secs_f64();
            self.instant = Instant::now();
            self.counter = 0;
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            cursor_pos: Vector2::zeros(),
            press_pos: None,
            fps_counter: FpsCounter::new(Duration::from_secs(1)),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor_pos = Vector2::new(x as f32, y as f32);
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                self.press_pos = Some(self.cursor_pos);
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                if let Some(press_pos) = self.press_pos.take() {
                    if is_click(press_pos, self.cursor_pos) {
                        view.pick_at(self.cursor_pos.x, self.cursor_pos.y);
                    }
                }
            }
            WindowEvent::Key(KEY_NEXT_BODY, Action::Press, _) => {
                view.select_next();
            }
            WindowEvent::Key(KEY_PREV_BODY, Action::Press, _) => {
                view.select_prev();
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                view.speed_up();
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                view.slow_down();
            }
            WindowEvent::Key(KEY_RESET_VIEW, Action::Press, _) => {
                view.reset_view();
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                view.toggle_pause();
            }
            WindowEvent::Key(KEY_TOGGLE_INSPECTOR, Action::Press, _) => {
                view.toggle_inspector();
            }
            _ => {}
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

fn is_click(press: Vector2<f32>, release: Vector2<f32>) -> bool {
    (release - press).norm() <= CLICK_TOLERANCE
}
