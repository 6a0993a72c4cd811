use std::time::Duration;

use nalgebra::Point3;

use super::body::{BodyID, CelestialBody};
use super::clock::SimulationClock;
use super::motion::{BodyState, MotionPolicy, MotionUpdater};
use super::picking::{pick, PickTarget};
use super::registry::Registry;
use crate::math::projection::Ray;

/// Everything that changes while the viewer runs: body positions, simulated time,
/// and which body is selected. Owned by the GUI and only touched between or during
/// frames, never concurrently.
pub struct Orrery {
    registry: Registry,
    // Indexed by BodyID
    states: Vec<BodyState>,
    clock: SimulationClock,
    updater: MotionUpdater,
    selection: Option<BodyID>,
}

impl Orrery {
    pub fn new(
        registry: Registry,
        clock: SimulationClock,
        policy: MotionPolicy,
        days_per_ms: f64,
    ) -> Self {
        let states = MotionUpdater::initial_states(&registry, clock.now_ms(), days_per_ms);
        Orrery {
            registry,
            states,
            clock,
            updater: MotionUpdater::new(policy),
            selection: None,
        }
    }

    /// Advances simulated time by a measured wall-clock delta, and moves the bodies.
    pub fn tick(&mut self, delta: Duration) {
        let simulated_ms = self.clock.advance(delta);
        if simulated_ms == 0.0 {
            return;
        }
        self.updater
            .tick(&mut self.states, self.clock.now_ms(), simulated_ms);
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    pub fn policy(&self) -> MotionPolicy {
        self.updater.policy()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (&CelestialBody, &BodyState)> + '_ {
        self.registry.bodies().zip(self.states.iter())
    }

    pub fn get_body(&self, id: BodyID) -> &CelestialBody {
        self.registry.get(id)
    }

    pub fn get_state(&self, id: BodyID) -> &BodyState {
        &self.states[id.0]
    }

    pub fn position(&self, id: BodyID) -> Point3<f32> {
        nalgebra::convert(self.get_state(id).world_position())
    }

    pub fn pick_targets(&self) -> impl Iterator<Item = PickTarget> + '_ {
        self.bodies().map(|(body, state)| PickTarget {
            id: body.id,
            center: nalgebra::convert(state.world_position()),
            radius: body.display_size,
        })
    }

    /// Selects whatever body the ray hits first. A miss leaves the selection alone.
    pub fn pick(&mut self, ray: &Ray) -> Option<BodyID> {
        let hit = pick(ray, self.pick_targets())?;
        self.select(hit.id);
        Some(hit.id)
    }

    pub fn select(&mut self, id: BodyID) {
        tracing::debug!(body = %self.registry.get(id).name, "selected");
        self.selection = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<BodyID> {
        self.selection
    }

    pub fn selected_body(&self) -> Option<&CelestialBody> {
        self.selection.map(|id| self.registry.get(id))
    }

    pub fn select_next(&mut self) -> BodyID {
        let n = self.registry.len();
        let id = match self.selection {
            Some(BodyID(i)) => BodyID((i + 1) % n),
            None => BodyID(0),
        };
        self.select(id);
        id
    }

    pub fn select_prev(&mut self) -> BodyID {
        let n = self.registry.len();
        let id = match self.selection {
            Some(BodyID(i)) => BodyID((i + n - 1) % n),
            None => BodyID(n - 1),
        };
        self.select(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::Vector3;

    fn orrery(policy: MotionPolicy) -> Orrery {
        let registry = Registry::solar_system().unwrap();
        Orrery::new(registry, SimulationClock::new(0.0, 1), policy, 0.001)
    }

    #[test]
    fn test_tick_moves_planets_only() {
        let mut orrery = orrery(MotionPolicy::AbsolutePhase);
        let before: Vec<_> = orrery.bodies().map(|(_, s)| s.position).collect();

        orrery.tick(Duration::from_millis(1000));
        let after: Vec<_> = orrery.bodies().map(|(_, s)| s.position).collect();

        assert_eq!(before[0], after[0]);
        for i in 1..before.len() {
            assert_ne!(before[i], after[i]);
        }
    }

    #[test]
    fn test_paused_clock_freezes_positions() {
        let mut orrery = orrery(MotionPolicy::IncrementalRotation);
        orrery.clock_mut().toggle_pause();
        let before = orrery.position(BodyID(3));
        orrery.tick(Duration::from_millis(500));
        assert_eq!(before, orrery.position(BodyID(3)));
    }

    #[test]
    fn test_selection_cycles() {
        let mut orrery = orrery(MotionPolicy::AbsolutePhase);
        assert_eq!(orrery.selection(), None);

        assert_eq!(orrery.select_prev(), BodyID(8));
        assert_eq!(orrery.select_next(), BodyID(0));
        assert_eq!(orrery.select_next(), BodyID(1));
        assert_eq!(orrery.selected_body().unwrap().name, "Mercury");

        orrery.clear_selection();
        assert_eq!(orrery.select_next(), BodyID(0));
    }

    #[test]
    fn test_pick_miss_keeps_selection() {
        let mut orrery = orrery(MotionPolicy::AbsolutePhase);
        orrery.select(BodyID(4));

        // Straight up from well outside the outermost orbit
        let ray = Ray::new(Point3::new(60.0, 0.0, 60.0), Vector3::y());
        assert_eq!(orrery.pick(&ray), None);
        assert_eq!(orrery.selection(), Some(BodyID(4)));

        // Straight down onto the Sun
        let ray = Ray::new(Point3::new(0.0, 100.0, 0.0), -Vector3::y());
        assert_eq!(orrery.pick(&ray), Some(BodyID(0)));
        assert_eq!(orrery.selection(), Some(BodyID(0)));
    }
}
