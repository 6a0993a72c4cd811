use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};

use nalgebra::{Matrix4, Point3, Vector3};

use super::utils::circle_points;

const RING_SEGMENTS: usize = 128;
// Rings are drawn a little dimmer than the body color
const RING_BRIGHTNESS: f32 = 0.8;

struct RingData {
    // Ring path, stored as (pt, color, pt, color)
    ring_lines: GPUVec<Point3<f32>>,
}

/// Draws flat circular orbit markers on the orbital plane. Rings are uploaded once
/// and drawn every frame; they're decoration only and never picked.
pub struct RingRenderer {
    // OpenGL stuff
    shader: Effect,
    pos: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    view: ShaderUniform<Matrix4<f32>>,
    proj: ShaderUniform<Matrix4<f32>>,
    line_width: f32,
    // Data storage
    rings: Vec<RingData>,
}

impl RingRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(VERTEX_SRC, FRAGMENT_SRC);

        shader.use_program();

        RingRenderer {
            pos: shader
                .get_attrib::<Point3<f32>>("position")
                .expect("Failed to get shader attribute."),
            color: shader
                .get_attrib::<Point3<f32>>("color")
                .expect("Failed to get shader attribute."),
            view: shader
                .get_uniform::<Matrix4<f32>>("view")
                .expect("Failed to get shader uniform."),
            proj: shader
                .get_uniform::<Matrix4<f32>>("proj")
                .expect("Failed to get shader uniform."),
            shader,
            line_width: 1.5,
            rings: vec![],
        }
    }

    pub fn add_ring(&mut self, radius: f32, color: Point3<f32>) {
        let color = color * RING_BRIGHTNESS;
        let points: Vec<_> = ring_points(radius).collect();
        let mut data = Vec::with_capacity(4 * points.len());
        for pts in points.windows(2) {
            data.push(pts[0]);
            data.push(color);
            data.push(pts[1]);
            data.push(color);
        }

        self.rings.push(RingData {
            ring_lines: GPUVec::new(data, BufferType::Array, AllocationType::StaticDraw),
        });
    }
}

/// Closed loop of points around the origin on the x-z plane. The first and last
/// points coincide.
pub fn ring_points(radius: f32) -> impl Iterator<Item = Point3<f32>> {
    circle_points(Point3::origin(), Vector3::x(), Vector3::z(), radius, RING_SEGMENTS)
}

impl Renderer for RingRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if self.rings.is_empty() {
            return;
        }

        self.shader.use_program();
        self.pos.enable();
        self.color.enable();

        camera.upload(pass, &mut self.proj, &mut self.view);

        let ctxt = Context::get();
        ctxt.line_width(self.line_width);
        for ring in self.rings.iter_mut() {
            self.pos.bind_sub_buffer(&mut ring.ring_lines, 1, 0);
            self.color.bind_sub_buffer(&mut ring.ring_lines, 1, 1);

            ctxt.draw_arrays(Context::LINES, 0, (ring.ring_lines.len() / 2) as i32);
        }

        self.pos.disable();
        self.color.disable();
    }
}

/// Vertex shader used by the material to display line.
static VERTEX_SRC: &str = "#version 100
    attribute vec3 position;
    attribute vec3 color;
    varying   vec3 vColor;
    uniform   mat4 proj;
    uniform   mat4 view;
    void main() {
        gl_Position = proj * view * vec4(position, 1.0);
        vColor = color;
    }";

/// Fragment shader used by the material to display line.
static FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
   precision highp float;
#else
   precision mediump float;
#endif

    varying vec3 vColor;
    void main() {
        gl_FragColor = vec4(vColor, 1.0);
    }";
