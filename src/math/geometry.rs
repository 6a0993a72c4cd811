use nalgebra::{Point2, Point3, Rotation2, Vector3};

/// Lifts a point on the orbital plane into world space. The plane is x-z, with y up.
pub fn planar_to_world(p: &Point2<f64>) -> Point3<f64> {
    Point3::new(p.x, 0.0, p.y)
}

/// Point on a circle of the given radius, centered at the origin of the orbital plane.
/// The angle is measured from +x towards +z.
pub fn point_on_circle(radius: f64, angle: f64) -> Point2<f64> {
    Point2::new(radius * angle.cos(), radius * angle.sin())
}

/// Rotates a planar point about the origin by `angle`, using the same orientation as
/// `point_on_circle`.
pub fn rotate_planar(p: &Point2<f64>, angle: f64) -> Point2<f64> {
    Rotation2::new(angle) * p
}

/// Rescales a planar point so that it sits exactly `radius` away from the origin.
/// A point at the origin has no direction, so it's placed on the +x axis.
pub fn renormalize(p: &Point2<f64>, radius: f64) -> Point2<f64> {
    let norm = p.coords.norm();
    if norm == 0.0 {
        return Point2::new(radius, 0.0);
    }
    Point2::from(p.coords * (radius / norm))
}

/// Returns the smallest non-negative ray parameter at which the ray hits the sphere.
/// `direction` must be normalized. Rays starting inside the sphere hit its far side.
pub fn ray_sphere_intersection(
    origin: &Point3<f32>,
    direction: &Vector3<f32>,
    center: &Point3<f32>,
    radius: f32,
) -> Option<f32> {
    // Solve |o + t*d - c|^2 = r^2, with |d| = 1:
    //   t^2 + 2 b t + c = 0
    let oc: Vector3<f32> = origin - center;
    let b = oc.dot(direction);
    let c = oc.norm_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let near = -b - sqrt_disc;
    let far = -b + sqrt_disc;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

pub fn planar_radius(p: &Point2<f64>) -> f64 {
    p.coords.norm()
}
