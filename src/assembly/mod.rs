//! Composite-body assembly: world tables, slots, fillers, layouts, health.

pub mod filler;
pub mod health;
pub mod layout;
pub mod slots;
pub mod world;

pub use filler::{fill_slot, team_color, update_slot_brightness, FillOptions};
pub use health::vehicle_health;
pub use layout::{spawn_vehicle, SpawnOptions, TrackLayout, TurretLayout, VehicleLayout, WheelLayout};
pub use slots::{create_slot_entities, ChildList, SlotSpec};
pub use world::{AssemblyWorld, BodyOwner, ScoreBoard, SlotParent};
