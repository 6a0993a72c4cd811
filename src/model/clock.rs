use std::time::Duration;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 50;

/// Simulated time, in milliseconds since the Unix epoch. Wall-clock time is fed in
/// tick by tick, scaled by the speed multiplier.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    // When the scene was built; period-based orbits take their phase from here
    epoch_ms: f64,
    now_ms: f64,
    speed: u32,
    paused: bool,
}

impl SimulationClock {
    pub fn new(epoch_ms: f64, speed: u32) -> Self {
        SimulationClock {
            epoch_ms,
            now_ms: epoch_ms,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            paused: false,
        }
    }

    /// Starts the clock at the current wall-clock time.
    pub fn starting_now(speed: u32) -> Self {
        let epoch_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        Self::new(epoch_ms, speed)
    }

    /// Advances by a wall-clock delta. Returns how many simulated milliseconds passed.
    pub fn advance(&mut self, delta: Duration) -> f64 {
        if self.paused {
            return 0.0;
        }
        let simulated = delta.as_secs_f64() * 1000.0 * self.speed as f64;
        self.now_ms += simulated;
        simulated
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn epoch_ms(&self) -> f64 {
        self.epoch_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.now_ms - self.epoch_ms
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Sets the multiplier, clamped to the slider range. Returns the value actually set.
    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.speed
    }

    pub fn speed_up(&mut self) -> u32 {
        self.set_speed(self.speed.saturating_add(1))
    }

    pub fn slow_down(&mut self) -> u32 {
        self.set_speed(self.speed.saturating_sub(1))
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_is_clamped() {
        let mut clock = SimulationClock::new(0.0, 0);
        assert_eq!(clock.speed(), MIN_SPEED);
        assert_eq!(clock.slow_down(), MIN_SPEED);

        assert_eq!(clock.set_speed(49), 49);
        assert_eq!(clock.speed_up(), 50);
        assert_eq!(clock.speed_up(), MAX_SPEED);
        assert_eq!(clock.set_speed(1000), MAX_SPEED);
    }

    #[test]
    fn test_advance_scales_by_speed() {
        let mut clock = SimulationClock::new(1000.0, 3);
        approx::assert_relative_eq!(clock.advance(Duration::from_millis(16)), 48.0);
        approx::assert_relative_eq!(clock.now_ms(), 1048.0);
        approx::assert_relative_eq!(clock.elapsed_ms(), 48.0);

        clock.toggle_pause();
        approx::assert_relative_eq!(clock.advance(Duration::from_millis(16)), 0.0);
        approx::assert_relative_eq!(clock.now_ms(), 1048.0);
    }
}
