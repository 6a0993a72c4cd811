use std::collections::HashSet;
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use serde::Deserialize;

use super::body::{BodyID, CelestialBody, DescriptiveFields, OrbitSpec};
use crate::error::{ConfigError, RegistryError};

/// One body, as written in a registry file.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyEntry {
    pub name: String,
    pub size: f32,
    // Six hex digits, e.g. "1e90ff"
    pub color: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub period_days: Option<f64>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub fields: DescriptiveFields,
}

/// On-disk layout of a registry. Planets are listed innermost first.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryFile {
    pub sun: BodyEntry,
    pub planets: Vec<BodyEntry>,
}

/// Validated, read-only list of bodies. The central body always has ID 0, and planets
/// follow in orbit order.
#[derive(Debug, Clone)]
pub struct Registry {
    bodies: Vec<CelestialBody>,
}

impl Registry {
    pub fn from_entries(file: RegistryFile) -> Result<Self, RegistryError> {
        if file.planets.is_empty() {
            return Err(RegistryError::NoPlanets);
        }

        let mut names = HashSet::new();
        let mut bodies = Vec::with_capacity(file.planets.len() + 1);

        let sun = file.sun;
        check_common(&sun, &mut names)?;
        // The central body never moves
        if sun.distance.is_some() || sun.period_days.is_some() {
            return Err(RegistryError::FixedBodyWithOrbit(sun.name));
        }
        bodies.push(CelestialBody {
            id: BodyID(0),
            color: parse_color(&sun.name, &sun.color)?,
            name: sun.name,
            display_size: sun.size,
            orbit: None,
            texture: sun.texture,
            fields: sun.fields,
        });

        let mut previous_distance = 0.0;
        for (index, entry) in file.planets.into_iter().enumerate() {
            check_common(&entry, &mut names)?;

            let distance = entry
                .distance
                .ok_or_else(|| RegistryError::MissingDistance(entry.name.clone()))?;
            if !is_positive(distance) {
                return Err(RegistryError::NonPositiveDistance {
                    name: entry.name,
                    distance,
                });
            }
            // Rings would overlap otherwise
            if index > 0 && distance <= previous_distance {
                return Err(RegistryError::NonIncreasingDistance {
                    name: entry.name,
                    distance,
                    previous: previous_distance,
                });
            }
            previous_distance = distance;

            if let Some(days) = entry.period_days {
                if !is_positive(days) {
                    return Err(RegistryError::NonPositivePeriod {
                        name: entry.name,
                        days,
                    });
                }
            }

            bodies.push(CelestialBody {
                id: BodyID(index + 1),
                color: parse_color(&entry.name, &entry.color)?,
                name: entry.name,
                display_size: entry.size,
                orbit: Some(OrbitSpec {
                    distance,
                    index,
                    period_days: entry.period_days,
                }),
                texture: entry.texture,
                fields: entry.fields,
            });
        }

        Ok(Registry { bodies })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file: RegistryFile = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self::from_entries(file)?)
    }

    /// The Sun and the eight planets, with the stylized sizes and spacing used by
    /// the viewer. Angular speed is by orbit index.
    pub fn solar_system() -> Result<Self, RegistryError> {
        Self::from_entries(solar_system_entries())
    }

    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.bodies.iter()
    }

    pub fn planets(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.bodies.iter().filter(|b| !b.is_fixed())
    }

    pub fn get(&self, id: BodyID) -> &CelestialBody {
        &self.bodies[id.0]
    }

    pub fn find(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn outermost_distance(&self) -> f64 {
        self.planets()
            .filter_map(|b| b.orbit.map(|o| o.distance))
            .fold(0.0, f64::max)
    }
}

fn check_common(entry: &BodyEntry, names: &mut HashSet<String>) -> Result<(), RegistryError> {
    if !names.insert(entry.name.to_lowercase()) {
        return Err(RegistryError::DuplicateName(entry.name.clone()));
    }
    if !is_positive(entry.size as f64) {
        return Err(RegistryError::NonPositiveSize {
            name: entry.name.clone(),
            size: entry.size,
        });
    }
    Ok(())
}

// Rejects NaN and infinities along with zero and negatives
fn is_positive(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

fn parse_color(name: &str, s: &str) -> Result<Point3<f32>, RegistryError> {
    let invalid = || RegistryError::InvalidColor {
        name: name.to_owned(),
        color: s.to_owned(),
    };

    let s = s.trim_start_matches('#');
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|_| invalid())
    };

    Ok(Point3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn solar_system_entries() -> RegistryFile {
    fn entry(
        name: &str,
        size: f32,
        distance: Option<f64>,
        color: &str,
        fields: [&str; 7],
    ) -> BodyEntry {
        let [info, speed, radius, year, surface, volume, mass] = fields;
        let some = |s: &str| Some(s.to_owned());
        BodyEntry {
            name: name.to_owned(),
            size,
            color: color.to_owned(),
            distance,
            period_days: None,
            texture: Some(format!("{}.jpg", name.to_lowercase())),
            fields: DescriptiveFields {
                info: info.to_owned(),
                speed: some(speed),
                radius: some(radius),
                year: some(year),
                surface: some(surface),
                volume: some(volume),
                mass: some(mass),
            },
        }
    }

    let sun = entry(
        "Sun",
        5.0,
        None,
        "ffcc33",
        [
            "The Sun is a G-type main-sequence star holding 99.8% of the Solar System's mass. Its core fuses about 600 million tonnes of hydrogen every second.",
            "220 km/s (around the galactic center)",
            "696,340 km",
            "230 million years (galactic orbit)",
            "6.09 × 10^12 km²",
            "1.41 × 10^18 km³",
            "1.989 × 10^30 kg",
        ],
    );

    let planets = vec![
        entry(
            "Mercury",
            0.383,
            Some(10.0),
            "a9a9a9",
            [
                "Mercury is the smallest planet in the Solar System and closest to the Sun. It has no atmosphere, leading to extreme temperature variations.",
                "47.36 km/s",
                "2,439.7 km",
                "88 days",
                "7.48 × 10^7 km²",
                "6.083 × 10^10 km³",
                "3.301 × 10^23 kg",
            ],
        ),
        entry(
            "Venus",
            0.949,
            Some(15.0),
            "ffe4b5",
            [
                "Venus is the hottest planet due to its thick atmosphere of carbon dioxide. It rotates in the opposite direction of most planets.",
                "35.02 km/s",
                "6,051.8 km",
                "224.7 days",
                "4.60 × 10^8 km²",
                "9.28 × 10^11 km³",
                "4.867 × 10^24 kg",
            ],
        ),
        entry(
            "Earth",
            1.0,
            Some(20.0),
            "1e90ff",
            [
                "Earth is the only planet known to support life. Its surface is 71% water, and it has a single moon, the Moon.",
                "29.78 km/s",
                "6,371 km",
                "365.25 days",
                "5.10 × 10^8 km²",
                "1.083 × 10^12 km³",
                "5.972 × 10^24 kg",
            ],
        ),
        entry(
            "Mars",
            0.532,
            Some(25.0),
            "ff4500",
            [
                "Mars is known as the \"Red Planet\" due to its iron oxide-rich soil. It hosts the largest volcano in the Solar System, Olympus Mons.",
                "24.07 km/s",
                "3,389.5 km",
                "687 days",
                "1.44 × 10^8 km²",
                "1.6318 × 10^11 km³",
                "6.417 × 10^23 kg",
            ],
        ),
        entry(
            "Jupiter",
            2.0,
            Some(30.0),
            "ffa500",
            [
                "Jupiter is the largest planet in the Solar System. It has over 79 moons and features a giant storm known as the Great Red Spot.",
                "13.07 km/s",
                "69,911 km",
                "11.86 years",
                "6.14 × 10^10 km²",
                "1.4313 × 10^15 km³",
                "1.898 × 10^27 kg",
            ],
        ),
        entry(
            "Saturn",
            1.8,
            Some(35.0),
            "ffd700",
            [
                "Saturn is famous for its stunning ring system made of ice and rock. It has 83 moons, including the large moon Titan.",
                "9.68 km/s",
                "58,232 km",
                "29.46 years",
                "4.27 × 10^10 km²",
                "8.2713 × 10^14 km³",
                "5.683 × 10^26 kg",
            ],
        ),
        entry(
            "Uranus",
            0.8,
            Some(40.0),
            "00ffff",
            [
                "Uranus is a blue-green planet due to methane in its atmosphere. It rotates on its side, making its axis nearly horizontal.",
                "6.80 km/s",
                "25,362 km",
                "84.01 years",
                "8.08 × 10^9 km²",
                "6.833 × 10^13 km³",
                "8.681 × 10^25 kg",
            ],
        ),
        entry(
            "Neptune",
            0.8,
            Some(45.0),
            "4682b4",
            [
                "Neptune, the farthest planet from the Sun, has the fastest winds in the Solar System, reaching speeds of over 2,100 km/h.",
                "5.43 km/s",
                "24,622 km",
                "164.8 years",
                "7.62 × 10^9 km²",
                "6.254 × 10^13 km³",
                "1.024 × 10^26 kg",
            ],
        ),
    ];

    RegistryFile { sun, planets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(name: &str, distance: f64) -> BodyEntry {
        BodyEntry {
            name: name.to_owned(),
            size: 1.0,
            color: String::from("ffffff"),
            distance: Some(distance),
            period_days: None,
            texture: None,
            fields: DescriptiveFields::default(),
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::solar_system().unwrap();
        assert_eq!(registry.len(), 9);
        assert!(registry.get(BodyID(0)).is_fixed());

        let names: Vec<_> = registry.planets().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
        );

        // Distances strictly increase, and indices follow registry order
        let orbits: Vec<_> = registry.planets().map(|b| b.orbit.unwrap()).collect();
        for (i, pair) in orbits.windows(2).enumerate() {
            assert!(pair[0].distance < pair[1].distance);
            assert_eq!(pair[0].index, i);
        }
        approx::assert_relative_eq!(registry.outermost_distance(), 45.0);

        let earth = registry.find("earth").unwrap();
        assert_eq!(earth.orbit.unwrap().index, 2);
        approx::assert_relative_eq!(earth.color, Point3::new(30.0, 144.0, 255.0) / 255.0);
    }

    #[test]
    fn test_rejects_non_increasing_distance() {
        let file = RegistryFile {
            sun: BodyEntry {
                distance: None,
                ..planet("Sun", 0.0)
            },
            planets: vec![planet("A", 10.0), planet("B", 20.0), planet("C", 20.0)],
        };

        match Registry::from_entries(file) {
            Err(RegistryError::NonIncreasingDistance { name, .. }) => assert_eq!(name, "C"),
            other => panic!("Expected non-increasing distance error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_entries() {
        let sun = || BodyEntry {
            distance: None,
            ..planet("Sun", 0.0)
        };

        let duplicate = RegistryFile {
            sun: sun(),
            planets: vec![planet("A", 10.0), planet("a", 20.0)],
        };
        assert!(matches!(
            Registry::from_entries(duplicate),
            Err(RegistryError::DuplicateName(name)) if name == "a"
        ));

        let bad_color = RegistryFile {
            sun: sun(),
            planets: vec![BodyEntry {
                color: String::from("12345g"),
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(bad_color),
            Err(RegistryError::InvalidColor { name, .. }) if name == "A"
        ));

        let no_distance = RegistryFile {
            sun: sun(),
            planets: vec![BodyEntry {
                distance: None,
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(no_distance),
            Err(RegistryError::MissingDistance(name)) if name == "A"
        ));

        let bad_period = RegistryFile {
            sun: sun(),
            planets: vec![BodyEntry {
                period_days: Some(0.0),
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(bad_period),
            Err(RegistryError::NonPositivePeriod { name, .. }) if name == "A"
        ));

        let empty = RegistryFile {
            sun: sun(),
            planets: vec![],
        };
        assert!(matches!(
            Registry::from_entries(empty),
            Err(RegistryError::NoPlanets)
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let sun = || BodyEntry {
            distance: None,
            ..planet("Sun", 0.0)
        };

        // A NaN distance would otherwise let the next planet sit closer in
        let nan_distance = RegistryFile {
            sun: sun(),
            planets: vec![planet("A", 10.0), planet("B", f64::NAN), planet("C", 5.0)],
        };
        assert!(matches!(
            Registry::from_entries(nan_distance),
            Err(RegistryError::NonPositiveDistance { name, .. }) if name == "B"
        ));

        let inf_distance = RegistryFile {
            sun: sun(),
            planets: vec![planet("A", f64::INFINITY)],
        };
        assert!(matches!(
            Registry::from_entries(inf_distance),
            Err(RegistryError::NonPositiveDistance { name, .. }) if name == "A"
        ));

        let nan_size = RegistryFile {
            sun: sun(),
            planets: vec![BodyEntry {
                size: f32::NAN,
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(nan_size),
            Err(RegistryError::NonPositiveSize { name, .. }) if name == "A"
        ));

        let inf_period = RegistryFile {
            sun: sun(),
            planets: vec![BodyEntry {
                period_days: Some(f64::INFINITY),
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(inf_period),
            Err(RegistryError::NonPositivePeriod { name, .. }) if name == "A"
        ));

        let text = r#"(
            sun: (name: "Sun", size: NaN, color: "ffcc33"),
            planets: [(name: "A", size: 1.0, color: "ffffff", distance: Some(inf))],
        )"#;
        let file: RegistryFile = ron::from_str(text).unwrap();
        assert!(matches!(
            Registry::from_entries(file),
            Err(RegistryError::NonPositiveSize { name, .. }) if name == "Sun"
        ));
    }

    #[test]
    fn test_rejects_signed_color_digits() {
        let file = RegistryFile {
            sun: BodyEntry {
                distance: None,
                ..planet("Sun", 0.0)
            },
            planets: vec![BodyEntry {
                color: String::from("+f+f+f"),
                ..planet("A", 10.0)
            }],
        };
        assert!(matches!(
            Registry::from_entries(file),
            Err(RegistryError::InvalidColor { name, .. }) if name == "A"
        ));
    }

    #[test]
    fn test_rejects_orbit_on_sun() {
        let with_distance = RegistryFile {
            sun: planet("Sun", 3.0),
            planets: vec![planet("A", 10.0)],
        };
        assert!(matches!(
            Registry::from_entries(with_distance),
            Err(RegistryError::FixedBodyWithOrbit(name)) if name == "Sun"
        ));

        let with_period = RegistryFile {
            sun: BodyEntry {
                distance: None,
                period_days: Some(30.0),
                ..planet("Sun", 0.0)
            },
            planets: vec![planet("A", 10.0)],
        };
        assert!(matches!(
            Registry::from_entries(with_period),
            Err(RegistryError::FixedBodyWithOrbit(name)) if name == "Sun"
        ));
    }

    #[test]
    fn test_parse_ron() {
        let text = r##"(
            sun: (name: "Sol", size: 4.0, color: "#ffcc33"),
            planets: [
                (
                    name: "Inner",
                    size: 0.5,
                    color: "a9a9a9",
                    distance: Some(8.0),
                    period_days: Some(88.0),
                    fields: (info: "Hot.", mass: Some("a little")),
                ),
                (name: "Outer", size: 1.5, color: "4682b4", distance: Some(16.0)),
            ],
        )"##;

        let file: RegistryFile = ron::from_str(text).unwrap();
        let registry = Registry::from_entries(file).unwrap();

        let inner = registry.find("Inner").unwrap();
        assert_eq!(inner.id, BodyID(1));
        assert_eq!(inner.orbit.unwrap().period_days, Some(88.0));
        assert_eq!(inner.fields.info, "Hot.");
        assert_eq!(inner.fields.mass.as_deref(), Some("a little"));
        assert_eq!(inner.fields.speed, None);

        let outer = registry.find("Outer").unwrap();
        assert_eq!(outer.orbit.unwrap().index, 1);
        assert_eq!(outer.texture, None);
    }
}
