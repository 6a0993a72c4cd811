use kiss3d::camera::Camera;
use kiss3d::renderer::{PointRenderer, Renderer};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use self::glow_renderer::GlowRenderer;
use self::ring_renderer::RingRenderer;

mod glow_renderer;
mod ring_renderer;
mod utils;

const STAR_SEED: u64 = 0x5eed_0f_57a25;
const STAR_POINT_SIZE: f32 = 1.5;

/// Uniformly scattered points in a cube of half-width `spread`, centered on the origin.
/// Seeded, so the sky looks the same on every run.
pub fn starfield(count: usize, spread: f32) -> Vec<Point3<f32>> {
    let mut rng = StdRng::seed_from_u64(STAR_SEED);
    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen_range(-spread..spread),
                rng.gen_range(-spread..spread),
                rng.gen_range(-spread..spread),
            )
        })
        .collect()
}

pub struct CompoundRenderer {
    ring_renderer: RingRenderer,
    glow_renderer: GlowRenderer,
    point_renderer: PointRenderer,
    stars: Vec<Point3<f32>>,
}

impl CompoundRenderer {
    pub fn new(stars: Vec<Point3<f32>>) -> Self {
        let mut point_renderer = PointRenderer::new();
        point_renderer.set_point_size(STAR_POINT_SIZE);
        CompoundRenderer {
            ring_renderer: RingRenderer::new(),
            glow_renderer: GlowRenderer::new(),
            point_renderer,
            stars,
        }
    }

    pub fn add_ring(&mut self, radius: f32, color: Point3<f32>) {
        self.ring_renderer.add_ring(radius, color);
    }

    pub fn draw_glow(
        &mut self,
        center: Point3<f32>,
        inner_radius: f32,
        outer_radius: f32,
        color: Point3<f32>,
    ) {
        self.glow_renderer
            .add_glow(center, inner_radius, outer_radius, color);
    }

    fn draw_stars(&mut self) {
        let white = Point3::new(1.0, 1.0, 1.0);
        for star in self.stars.iter() {
            self.point_renderer.draw_point(*star, white);
        }
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        // The point renderer empties itself after every frame
        self.draw_stars();
        self.point_renderer.render(pass, camera);
        self.ring_renderer.render(pass, camera);
        self.glow_renderer.render(pass, camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starfield_is_deterministic_and_bounded() {
        let a = starfield(500, 1000.0);
        let b = starfield(500, 1000.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
        for p in a.iter() {
            assert!(p.x.abs() <= 1000.0 && p.y.abs() <= 1000.0 && p.z.abs() <= 1000.0);
        }
    }
}
