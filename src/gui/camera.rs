use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point2, Point3, Vector2, Vector3};

use crate::math::projection::{Ray, Viewport};
use crate::math::tween::Tween;

const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_ZOOM_STEP: f32 = 1.2;

pub const FOCUS_DURATION: f32 = 1.5;

/// Where the camera sits relative to what it's looking at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub target: Point3<f32>,
    pub theta: f32,  // azimuthal angle, around +y, measured from +z
    pub phi: f32,    // polar angle, measured from +y
    pub radius: f32, // distance from target
}

impl CameraPose {
    fn lerp(&self, other: &CameraPose, u: f32) -> CameraPose {
        CameraPose {
            target: Point3::from(self.target.coords.lerp(&other.target.coords, u)),
            theta: self.theta + shortest_arc(self.theta, other.theta) * u,
            phi: self.phi + (other.phi - self.phi) * u,
            radius: self.radius + (other.radius - self.radius) * u,
        }
    }
}

// Signed angle from `from` to `to`, in (-PI, PI]
fn shortest_arc(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(2.0 * PI);
    if delta > PI {
        delta - 2.0 * PI
    } else {
        delta
    }
}

#[derive(Debug, Clone, Copy)]
struct FocusTween {
    tween: Tween,
    start: CameraPose,
    end: CameraPose,
    // When set, `end.target` is replaced each frame by the tracked body's position
    tracking: bool,
    // When set, the viewing angles are scripted too
    reorient: bool,
}

// A descendant of ArcBall, like the camera it grew out of: drag to rotate, scroll to
// zoom. It adds right-drag panning and scripted transitions.
//
// Unlike ArcBall, the look-at target can follow a moving body. The owner calls
// `step` each frame with the selected body's position; while something is tracked,
// panning is overridden by the tracking.
pub struct OrbitCamera {
    pose: CameraPose,
    home: CameraPose,
    // -- perspective --
    viewport: Viewport,
    fovy: f32,
    znear: f32,
    zfar: f32,
    // -- other --
    last_cursor_pos: Vector2<f32>,
    focus: Option<FocusTween>,
    following: bool,
    // -- knobs to fiddle with --
    theta_step: f32,
    phi_step: f32,
    pan_step: f32,
    scroll_ratio: f32,
    phi_limit: f32,
    radius_limits: (f32, f32),
}

impl OrbitCamera {
    pub fn new(home: CameraPose, viewport: Viewport) -> Self {
        OrbitCamera {
            pose: home,
            home,
            viewport,
            fovy: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 5000.0,
            last_cursor_pos: Vector2::zeros(),
            focus: None,
            following: false,
            theta_step: 0.005,
            phi_step: 0.005,
            pan_step: 0.0015,
            scroll_ratio: 1.2,
            phi_limit: 0.01,
            radius_limits: (1.0, 1500.0),
        }
    }

    /// Looking at the origin from `radius` away, a little above the orbital plane.
    pub fn overview(radius: f32) -> CameraPose {
        CameraPose {
            target: Point3::origin(),
            theta: 0.0,
            phi: 1.2,
            radius,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.viewport.aspect(), self.fovy, self.znear, self.zfar)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn target(&self) -> Point3<f32> {
        self.pose.target
    }

    pub fn distance(&self) -> f32 {
        self.pose.radius
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn is_transitioning(&self) -> bool {
        self.focus.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // Minimized windows report zero; keep the last usable size
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Viewport::new(width, height);
    }

    pub fn rotate(&mut self, dtheta: f32, dphi: f32) {
        self.pose.theta = (self.pose.theta + dtheta) % (2.0 * PI);
        self.pose.phi = nalgebra::clamp(
            self.pose.phi + dphi,
            self.phi_limit,
            PI - self.phi_limit,
        );
    }

    pub fn zoom(&mut self, factor: f32) {
        self.pose.radius = nalgebra::clamp(
            self.pose.radius * factor,
            self.radius_limits.0,
            self.radius_limits.1,
        );
    }

    /// Slides the target within the view plane. Amounts are in screen pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let view_to_world = self.view_transform().inverse();
        let right = view_to_world.transform_vector(&Vector3::x());
        let up = view_to_world.transform_vector(&Vector3::y());
        // Scale by distance so the scene moves about as fast as the cursor
        let scale = self.pose.radius * self.pan_step;
        self.pose.target += (-dx * right + dy * up) * scale;
    }

    /// Starts a transition that ends `radius` away from whatever `step` is told to
    /// track. Replaces any transition in flight.
    pub fn focus_on(&mut self, radius: f32) {
        let mut end = self.pose;
        end.radius = nalgebra::clamp(radius, self.radius_limits.0, self.radius_limits.1);
        self.focus = Some(FocusTween {
            tween: Tween::new(FOCUS_DURATION),
            start: self.pose,
            end,
            tracking: true,
            reorient: false,
        });
        self.following = true;
    }

    /// Starts a transition back to the starting pose, and stops following anything.
    pub fn reset(&mut self) {
        self.focus = Some(FocusTween {
            tween: Tween::new(FOCUS_DURATION),
            start: self.pose,
            end: self.home,
            tracking: false,
            reorient: true,
        });
        self.following = false;
    }

    /// Advances any transition by `dt` seconds. `tracked` is the current position of
    /// the selected body, if there is one.
    pub fn step(&mut self, dt: f32, tracked: Option<Point3<f32>>) {
        let focus = match self.focus.as_mut() {
            Some(focus) => focus,
            None => {
                if let (true, Some(p)) = (self.following, tracked) {
                    self.pose.target = p;
                }
                return;
            }
        };

        if let (true, Some(p)) = (focus.tracking, tracked) {
            focus.end.target = p;
        }

        // Focusing scripts only the target and distance; angles stay under user control
        let u = focus.tween.advance(dt);
        let blended = focus.start.lerp(&focus.end, u);
        self.pose.target = blended.target;
        self.pose.radius = blended.radius;
        if focus.reorient {
            self.pose.theta = blended.theta;
            self.pose.phi = blended.phi;
        }

        if focus.tween.is_finished() {
            self.focus = None;
        }
    }

    /// The ray from the camera through a pixel.
    pub fn ray_through(&self, px: f32, py: f32) -> Option<Ray> {
        let ndc = self.viewport.to_ndc(px, py);
        Ray::from_ndc(&self.inverse_transformation(), &ndc)
    }

    /// Pixel position of a world point, or None if it's behind the camera.
    pub fn project_to_pixel(&self, point: &Point3<f32>) -> Option<Point2<f32>> {
        self.viewport.project(&self.transformation(), point)
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x as f32, y as f32);
                let dpos = curr_pos - self.last_cursor_pos;

                if canvas.get_mouse_button(MouseButton::Button1) == Action::Press {
                    // Rotate the opposite direction as the mouse moves (drag right == camera glides
                    // left)
                    self.rotate(-dpos.x * self.theta_step, -dpos.y * self.phi_step);
                } else if canvas.get_mouse_button(MouseButton::Button2) == Action::Press {
                    self.pan(dpos.x, dpos.y);
                }

                self.last_cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => self.resize(w, h),
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                self.rotate(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                self.rotate(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                self.rotate(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                self.rotate(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        let CameraPose {
            target,
            theta,
            phi,
            radius,
        } = self.pose;
        target
            + Vector3::new(
                radius * theta.sin() * phi.sin(),
                radius * phi.cos(),
                radius * theta.cos() * phi.sin(),
            )
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.pose.target, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(OrbitCamera::overview(60.0), Viewport::new(800, 600))
    }

    #[test]
    fn test_eye_orbits_target() {
        let mut camera = camera();
        assert_relative_eq!((camera.eye() - camera.target()).norm(), 60.0, epsilon = 1e-4);

        camera.rotate(1.0, 0.3);
        assert_relative_eq!((camera.eye() - camera.target()).norm(), 60.0, epsilon = 1e-4);

        // Pitch can't flip over the pole
        camera.rotate(0.0, 100.0);
        assert!(camera.pose().phi < PI);
        assert!(camera.eye().y < 0.0);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = camera();
        assert_eq!(camera.aspect(), 800.0 / 600.0);

        camera.resize(1920, 1080);
        assert_eq!(camera.aspect(), 1920.0 / 1080.0);
        assert_eq!(camera.viewport(), Viewport::new(1920, 1080));

        camera.resize(0, 0);
        assert_eq!(camera.viewport(), Viewport::new(1920, 1080));
    }

    #[test]
    fn test_focus_tracks_moving_target() {
        let mut camera = camera();
        camera.focus_on(10.0);
        assert!(camera.is_transitioning());

        // The body keeps moving while the camera flies towards it
        let mut body = Point3::new(30.0, 0.0, 0.0);
        for _ in 0..10 {
            camera.step(0.1, Some(body));
            body.z += 1.0;
        }
        assert!(camera.is_transitioning());

        for _ in 0..10 {
            camera.step(0.1, Some(body));
            body.z += 1.0;
        }
        assert!(!camera.is_transitioning());
        assert_relative_eq!(camera.distance(), 10.0);

        // Still following after the transition ends
        camera.step(0.1, Some(body));
        assert_relative_eq!(camera.target(), body);
    }

    #[test]
    fn test_new_focus_supersedes_old() {
        let mut camera = camera();
        camera.focus_on(10.0);
        camera.step(0.5, Some(Point3::new(30.0, 0.0, 0.0)));

        // Retarget halfway through; only the new request matters
        camera.focus_on(20.0);
        let mid = camera.target();
        camera.step(0.0, Some(Point3::new(-40.0, 0.0, 0.0)));
        assert_relative_eq!(camera.target(), mid);

        camera.step(FOCUS_DURATION, Some(Point3::new(-40.0, 0.0, 0.0)));
        assert!(!camera.is_transitioning());
        assert_relative_eq!(camera.target(), Point3::new(-40.0, 0.0, 0.0));
        assert_relative_eq!(camera.distance(), 20.0);
    }

    #[test]
    fn test_reset_returns_home() {
        let mut camera = camera();
        let home = *camera.pose();

        camera.rotate(1.0, 0.5);
        camera.focus_on(10.0);
        camera.step(FOCUS_DURATION, Some(Point3::new(30.0, 0.0, 0.0)));
        // Focusing leaves the angles alone
        assert_relative_eq!(camera.pose().theta, 1.0);
        assert_relative_eq!(camera.pose().phi, home.phi + 0.5);

        camera.reset();
        camera.step(FOCUS_DURATION, Some(Point3::new(31.0, 0.0, 0.0)));

        assert!(!camera.is_transitioning());
        assert_relative_eq!(camera.target(), home.target);
        assert_relative_eq!(camera.distance(), home.radius);
        assert_relative_eq!(camera.pose().theta, home.theta, epsilon = 1e-6);
        assert_relative_eq!(camera.pose().phi, home.phi, epsilon = 1e-6);
        assert_relative_eq!(
            camera.eye(),
            Point3::new(0.0, 60.0 * 1.2f32.cos(), 60.0 * 1.2f32.sin()),
            epsilon = 1e-4
        );

        // Not following anymore
        camera.step(0.1, Some(Point3::new(32.0, 0.0, 0.0)));
        assert_relative_eq!(camera.target(), home.target);
    }

    #[test]
    fn test_reset_turns_the_short_way_round() {
        let mut camera = camera();
        let home = *camera.pose();
        let home_eye = camera.eye();

        // Just short of a full turn; the way home is a small step forward
        camera.rotate(2.0 * PI - 0.2, 0.0);
        camera.reset();
        camera.step(FOCUS_DURATION / 2.0, None);
        let theta = camera.pose().theta;
        assert!(theta > 2.0 * PI - 0.2 && theta < 2.0 * PI);

        camera.step(FOCUS_DURATION, None);
        assert_relative_eq!(shortest_arc(camera.pose().theta, home.theta), 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye(), home_eye, epsilon = 1e-3);

        assert_relative_eq!(shortest_arc(0.1, 2.0 * PI - 0.1), -0.2, epsilon = 1e-5);
        assert_relative_eq!(shortest_arc(-1.0, 0.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = camera();
        let ray = camera.ray_through(400.0, 300.0).unwrap();

        let t = (camera.target() - ray.origin).dot(&ray.direction);
        assert_relative_eq!(ray.at(t), camera.target(), epsilon = 1e-3);

        let pixel = camera.project_to_pixel(&Point3::origin()).unwrap();
        assert_relative_eq!(pixel, Point2::new(400.0, 300.0), epsilon = 1e-2);
    }
}
