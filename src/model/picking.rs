use nalgebra::Point3;

use super::body::BodyID;
use crate::math::geometry::ray_sphere_intersection;
use crate::math::projection::Ray;

/// Something a click can land on. Only bodies are ever targets; rings, labels and
/// stars are not.
#[derive(Debug, Clone, Copy)]
pub struct PickTarget {
    pub id: BodyID,
    pub center: Point3<f32>,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: BodyID,
    // Distance along the ray, in world units
    pub t: f32,
}

/// Returns the target the ray hits first, if any.
pub fn pick<I>(ray: &Ray, targets: I) -> Option<Hit>
where
    I: IntoIterator<Item = PickTarget>,
{
    targets
        .into_iter()
        .filter_map(|target| {
            ray_sphere_intersection(&ray.origin, &ray.direction, &target.center, target.radius)
                .map(|t| Hit { id: target.id, t })
        })
        .min_by(|a, b| a.t.total_cmp(&b.t))
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::Vector3;

    fn target(id: usize, x: f32, radius: f32) -> PickTarget {
        PickTarget {
            id: BodyID(id),
            center: Point3::new(x, 0.0, 0.0),
            radius,
        }
    }

    #[test]
    fn test_nearest_hit_wins() {
        // Looking down -x from far out, everything on the x axis is lined up
        let ray = Ray::new(Point3::new(100.0, 0.0, 0.0), -Vector3::x());
        let targets = vec![target(0, 0.0, 5.0), target(3, 20.0, 1.0), target(5, 30.0, 2.0)];

        let hit = pick(&ray, targets.clone()).unwrap();
        assert_eq!(hit.id, BodyID(5));
        approx::assert_relative_eq!(hit.t, 68.0);

        // Order of the targets doesn't matter
        let hit = pick(&ray, targets.into_iter().rev()).unwrap();
        assert_eq!(hit.id, BodyID(5));
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Point3::new(100.0, 10.0, 0.0), -Vector3::x());
        let targets = vec![target(0, 0.0, 5.0), target(3, 20.0, 1.0)];
        assert_eq!(pick(&ray, targets), None);
        assert_eq!(pick(&ray, Vec::new()), None);
    }
}
