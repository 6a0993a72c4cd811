/// Eases in fast and settles slowly. Maps [0, 1] onto [0, 1].
pub fn ease_out_quad(u: f32) -> f32 {
    let u = u.clamp(0.0, 1.0);
    1.0 - (1.0 - u) * (1.0 - u)
}

/// Tracks progress through a fixed-length transition. What's being interpolated is
/// up to the owner; this only hands out the eased fraction.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    elapsed: f32,
    duration: f32,
}

impl Tween {
    pub fn new(duration: f32) -> Self {
        Tween {
            elapsed: 0.0,
            duration,
        }
    }

    /// Moves the tween forward by `dt` seconds and returns the eased fraction.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.eased()
    }

    pub fn eased(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ease_out_quad(self.elapsed / self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
