use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

/// Size of the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Converts a pixel coordinate (origin top-left, y down) into normalized device
    /// coordinates (origin center, y up, both axes in [-1, 1]).
    pub fn to_ndc(&self, px: f32, py: f32) -> Point2<f32> {
        Point2::new(
            (px / self.width as f32) * 2.0 - 1.0,
            -(py / self.height as f32) * 2.0 + 1.0,
        )
    }

    pub fn to_pixel(&self, ndc: &Point2<f32>) -> Point2<f32> {
        Point2::new(
            (ndc.x + 1.0) / 2.0 * self.width as f32,
            (1.0 - ndc.y) / 2.0 * self.height as f32,
        )
    }

    /// Projects a world-space point into pixel coordinates, given the combined
    /// projection-view matrix. Returns None for points behind the camera.
    pub fn project(&self, transformation: &Matrix4<f32>, point: &Point3<f32>) -> Option<Point2<f32>> {
        let clip = transformation * point.to_homogeneous();
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = Point2::new(clip.x / clip.w, clip.y / clip.w);
        Some(self.to_pixel(&ndc))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    // Always normalized
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Builds the ray through an NDC point, by unprojecting it onto the near and far
    /// clipping planes with the inverse projection-view matrix.
    pub fn from_ndc(inverse_transformation: &Matrix4<f32>, ndc: &Point2<f32>) -> Option<Self> {
        let unproject = |depth: f32| {
            let h = inverse_transformation * Vector4::new(ndc.x, ndc.y, depth, 1.0);
            Point3::from_homogeneous(h)
        };

        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;
        let direction = far - near;
        if direction.norm_squared() == 0.0 {
            return None;
        }
        Some(Ray::new(near, direction))
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::{Isometry3, Perspective3};

    #[test]
    fn test_ndc_corners() {
        let viewport = Viewport::new(800, 600);
        approx::assert_relative_eq!(viewport.to_ndc(0.0, 0.0), Point2::new(-1.0, 1.0));
        approx::assert_relative_eq!(viewport.to_ndc(800.0, 600.0), Point2::new(1.0, -1.0));
        approx::assert_relative_eq!(viewport.to_ndc(400.0, 300.0), Point2::new(0.0, 0.0));

        let px = Point2::new(123.0, 456.0);
        approx::assert_relative_eq!(
            viewport.to_pixel(&viewport.to_ndc(px.x, px.y)),
            px,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_ray_through_projection() {
        let viewport = Viewport::new(800, 600);
        let eye = Point3::new(0.0, 10.0, 40.0);
        let view = Isometry3::look_at_rh(&eye, &Point3::origin(), &Vector3::y());
        let proj = Perspective3::new(viewport.aspect(), 1.0, 0.1, 1000.0);
        let transformation = proj.into_inner() * view.to_homogeneous();
        let inverse = transformation.try_inverse().unwrap();

        // A point off to the side projects to some pixel; the ray through that pixel
        // has to pass through the point again.
        let target = Point3::new(7.0, -2.0, 3.0);
        let pixel = viewport.project(&transformation, &target).unwrap();
        let ray = Ray::from_ndc(&inverse, &viewport.to_ndc(pixel.x, pixel.y)).unwrap();

        let t = (target - ray.origin).dot(&ray.direction);
        approx::assert_relative_eq!(ray.at(t), target, epsilon = 1e-3);

        // Points behind the camera don't project
        assert!(viewport
            .project(&transformation, &Point3::new(0.0, 10.0, 80.0))
            .is_none());
    }
}
