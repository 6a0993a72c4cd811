use nalgebra::Point3;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// Circular orbit around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSpec {
    pub distance: f64,
    // Position in the registry's planet order, starting from 0
    pub index: usize,
    // When present, angular speed comes from the period instead of the index
    pub period_days: Option<f64>,
}

/// Text shown in the inspector. Everything but `info` is optional, and shows up as
/// "N/A" when missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DescriptiveFields {
    pub info: String,
    pub speed: Option<String>,
    pub radius: Option<String>,
    pub year: Option<String>,
    pub surface: Option<String>,
    pub volume: Option<String>,
    pub mass: Option<String>,
}

impl DescriptiveFields {
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// Labelled values in display order.
    pub fn labelled(&self) -> [(&'static str, &str); 6] {
        fn show(field: &Option<String>) -> &str {
            field.as_deref().unwrap_or(DescriptiveFields::NOT_AVAILABLE)
        }
        [
            ("Speed", show(&self.speed)),
            ("Radius", show(&self.radius)),
            ("Year", show(&self.year)),
            ("Surface", show(&self.surface)),
            ("Volume", show(&self.volume)),
            ("Mass", show(&self.mass)),
        ]
    }
}

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyID,
    pub name: String,
    pub display_size: f32,
    // None for the central body, which sits at the origin
    pub orbit: Option<OrbitSpec>,
    pub color: Point3<f32>,
    pub texture: Option<String>,
    pub fields: DescriptiveFields,
}

impl CelestialBody {
    pub fn is_fixed(&self) -> bool {
        self.orbit.is_none()
    }
}
