//! Simulation orchestration: the tick context and the fixed-order pipeline.

pub mod context;
pub mod guns;
pub mod tick;

pub use context::{DamageTarget, MotorEntity, TickContext};
pub use tick::{run_tick, SimulationEvent};
