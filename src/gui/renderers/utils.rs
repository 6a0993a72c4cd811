use kiss3d::renderer::LineRenderer;

use nalgebra::{Point3, Vector3};

/// Closed circle of `segments + 1` points spanned by the unit vectors `u` and `v`.
/// The first and last points coincide.
pub fn circle_points(
    center: Point3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
    radius: f32,
    segments: usize,
) -> impl Iterator<Item = Point3<f32>> {
    let segments = segments.max(3);
    (0..=segments).map(move |i| {
        let theta = std::f32::consts::TAU * (i % segments) as f32 / segments as f32;
        center + (u * theta.cos() + v * theta.sin()) * radius
    })
}

/// Feeds a polyline to the line renderer, one segment per consecutive pair.
pub fn draw_polyline<I>(line_renderer: &mut LineRenderer, points: I, color: Point3<f32>)
where
    I: IntoIterator<Item = Point3<f32>>,
{
    let mut points = points.into_iter();
    let mut prev = match points.next() {
        Some(p) => p,
        None => return,
    };
    for pt in points {
        line_renderer.draw_line(prev, pt, color);
        prev = pt;
    }
}
