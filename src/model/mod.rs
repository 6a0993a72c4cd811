pub mod body;
pub mod clock;
pub mod motion;
pub mod orrery;
pub mod picking;
pub mod registry;

pub use body::{BodyID, CelestialBody, DescriptiveFields, OrbitSpec};
pub use clock::SimulationClock;
pub use motion::{BodyState, MotionPolicy, MotionUpdater};
pub use orrery::Orrery;
pub use registry::Registry;
