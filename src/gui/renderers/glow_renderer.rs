use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Point3, Vector3};

use super::utils::{circle_points, draw_polyline};

// Number of concentric outlines making up a halo
const GLOW_LAYERS: usize = 12;
const GLOW_SEGMENTS: usize = 100;

struct GlowData {
    pub center: Point3<f32>,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub color: Point3<f32>,
}

/// Fakes a glow around a sphere with a stack of camera-facing circles that fade
/// out from the surface.
pub struct GlowRenderer {
    line_renderer: LineRenderer,
    glows: Vec<GlowData>,
}

impl GlowRenderer {
    pub fn new() -> Self {
        GlowRenderer {
            line_renderer: LineRenderer::new(),
            glows: vec![],
        }
    }

    pub fn add_glow(
        &mut self,
        center: Point3<f32>,
        inner_radius: f32,
        outer_radius: f32,
        color: Point3<f32>,
    ) {
        self.glows.push(GlowData {
            center,
            inner_radius,
            outer_radius,
            color,
        });
    }

    fn load_glow_into_renderer(line_renderer: &mut LineRenderer, camera: &dyn Camera, glow: &GlowData) {
        // Transform the screen x and y vectors into world space, so the circles
        // always face the camera
        let camera_transform = camera.view_transform().inverse();
        let x_vec = camera_transform.transform_vector(&Vector3::x()).normalize();
        let y_vec = camera_transform.transform_vector(&Vector3::y()).normalize();

        for (radius, color) in glow_layers(glow.inner_radius, glow.outer_radius, glow.color) {
            draw_polyline(
                line_renderer,
                circle_points(glow.center, x_vec, y_vec, radius, GLOW_SEGMENTS),
                color,
            );
        }
    }
}

/// Radius and color of each halo layer, brightest at the surface and fading to
/// black at the outer edge.
fn glow_layers(
    inner_radius: f32,
    outer_radius: f32,
    color: Point3<f32>,
) -> impl Iterator<Item = (f32, Point3<f32>)> {
    (0..GLOW_LAYERS).map(move |i| {
        let u = i as f32 / GLOW_LAYERS as f32;
        let radius = inner_radius + u * (outer_radius - inner_radius);
        let intensity = (1.0 - u).powi(3);
        (radius, color * intensity)
    })
}

impl Renderer for GlowRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        for glow in self.glows.iter() {
            GlowRenderer::load_glow_into_renderer(&mut self.line_renderer, camera, glow);
        }
        self.line_renderer.render(pass, camera);
        self.glows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glow_fades_outwards() {
        let layers: Vec<_> = glow_layers(5.0, 10.0, Point3::new(1.0, 1.0, 0.0)).collect();
        assert_eq!(layers.len(), GLOW_LAYERS);

        approx::assert_relative_eq!(layers[0].0, 5.0);
        approx::assert_relative_eq!(layers[0].1, Point3::new(1.0, 1.0, 0.0));
        for pair in layers.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1.x > pair[1].1.x);
            assert!(pair[1].0 < 10.0);
        }
    }
}
