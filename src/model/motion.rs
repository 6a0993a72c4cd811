use std::f64::consts::TAU;
use std::fmt;

use nalgebra::{Point2, Point3};

use super::body::{BodyID, OrbitSpec};
use super::registry::Registry;
use crate::math::geometry::{
    planar_radius, planar_to_world, point_on_circle, renormalize, rotate_planar,
};

// Stylized speeds: the planet at orbit index i sweeps (BASE + STEP * i) * SCALE
// radians per millisecond.
pub const INDEX_SPEED_BASE: f64 = 0.01;
pub const INDEX_SPEED_STEP: f64 = 0.01;
pub const INDEX_SPEED_SCALE: f64 = 1e-4;

pub const MS_PER_DAY: f64 = 86_400_000.0;
// 2000-01-01T12:00:00Z
pub const J2000_UNIX_MS: f64 = 946_728_000_000.0;

// Incremental rotation snaps radii back onto their orbits this often
pub const RENORMALIZE_INTERVAL: u64 = 64;

/// How positions move from one tick to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MotionPolicy {
    /// Position is a pure function of simulated time.
    #[default]
    AbsolutePhase,
    /// Each tick rotates the previous position by a small angle.
    IncrementalRotation,
}

impl fmt::Display for MotionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionPolicy::AbsolutePhase => write!(f, "absolute-phase"),
            MotionPolicy::IncrementalRotation => write!(f, "incremental-rotation"),
        }
    }
}

pub fn index_angular_speed(index: usize) -> f64 {
    (INDEX_SPEED_BASE + INDEX_SPEED_STEP * index as f64) * INDEX_SPEED_SCALE
}

/// Starting angle for a body with the given period, as if it had been moving at
/// constant speed since J2000.
pub fn calendar_phase(epoch_ms: f64, period_days: f64) -> f64 {
    let days_since_j2000 = (epoch_ms - J2000_UNIX_MS) / MS_PER_DAY;
    TAU * days_since_j2000.rem_euclid(period_days) / period_days
}

/// Closed-form description of a circular orbit:
///   angle(t) = phase + speed * (t - reference)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitMotion {
    distance: f64,
    // radians per simulated millisecond
    angular_speed: f64,
    phase: f64,
    reference_ms: f64,
}

impl OrbitMotion {
    /// `days_per_ms` is the visual time scale for period-based orbits: how many days
    /// of orbit pass per simulated millisecond.
    pub fn new(orbit: &OrbitSpec, epoch_ms: f64, days_per_ms: f64) -> Self {
        match orbit.period_days {
            None => OrbitMotion {
                distance: orbit.distance,
                angular_speed: index_angular_speed(orbit.index),
                phase: 0.0,
                reference_ms: 0.0,
            },
            Some(period_days) => OrbitMotion {
                distance: orbit.distance,
                angular_speed: TAU / period_days * days_per_ms,
                phase: calendar_phase(epoch_ms, period_days),
                reference_ms: epoch_ms,
            },
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn angle_at(&self, now_ms: f64) -> f64 {
        self.phase + self.angular_speed * (now_ms - self.reference_ms)
    }

    pub fn position_at(&self, now_ms: f64) -> Point2<f64> {
        point_on_circle(self.distance, self.angle_at(now_ms))
    }
}

/// Where a body currently is. Lives as long as the scene does.
#[derive(Debug, Clone)]
pub struct BodyState {
    pub id: BodyID,
    // (x, z) on the orbital plane
    pub position: Point2<f64>,
    // None for bodies pinned at the origin
    motion: Option<OrbitMotion>,
}

impl BodyState {
    pub fn world_position(&self) -> Point3<f64> {
        planar_to_world(&self.position)
    }

    pub fn motion(&self) -> Option<&OrbitMotion> {
        self.motion.as_ref()
    }
}

pub struct MotionUpdater {
    policy: MotionPolicy,
    ticks: u64,
}

impl MotionUpdater {
    pub fn new(policy: MotionPolicy) -> Self {
        MotionUpdater { policy, ticks: 0 }
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    /// One state per registry body, in registry order, positioned at `now_ms`.
    pub fn initial_states(registry: &Registry, now_ms: f64, days_per_ms: f64) -> Vec<BodyState> {
        registry
            .bodies()
            .map(|body| {
                let motion = body
                    .orbit
                    .as_ref()
                    .map(|orbit| OrbitMotion::new(orbit, now_ms, days_per_ms));
                let position = match &motion {
                    Some(motion) => motion.position_at(now_ms),
                    None => Point2::origin(),
                };
                BodyState {
                    id: body.id,
                    position,
                    motion,
                }
            })
            .collect()
    }

    /// Moves every orbiting body. `now_ms` is the simulated time after this tick, and
    /// `delta_ms` is how much simulated time the tick covered.
    pub fn tick(&mut self, states: &mut [BodyState], now_ms: f64, delta_ms: f64) {
        self.ticks += 1;
        let renormalize_now = self.ticks % RENORMALIZE_INTERVAL == 0;

        for state in states.iter_mut() {
            let motion = match &state.motion {
                Some(m) => *m,
                None => continue,
            };

            state.position = match self.policy {
                MotionPolicy::AbsolutePhase => motion.position_at(now_ms),
                MotionPolicy::IncrementalRotation => {
                    let rotated =
                        rotate_planar(&state.position, motion.angular_speed() * delta_ms);
                    if renormalize_now {
                        renormalize(&rotated, motion.distance())
                    } else {
                        rotated
                    }
                }
            };
        }
    }
}

/// Largest relative deviation of any orbiting body from its nominal radius.
pub fn max_radius_error(states: &[BodyState]) -> f64 {
    states
        .iter()
        .filter_map(|s| {
            s.motion
                .map(|m| (planar_radius(&s.position) - m.distance()).abs() / m.distance())
        })
        .fold(0.0, f64::max)
}
