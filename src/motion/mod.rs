//! Per-tick motion systems: track animation and joint-motor control.

pub mod motor;
pub mod track;

pub use motor::{apply_motor_targets, update_motor_targets};
pub use track::{animate_tracks, quantize_step, wrap_longitudinal};
