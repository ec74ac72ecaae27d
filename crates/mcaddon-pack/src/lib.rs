//! Bedrock animation controller builder.
//!
//! Actors own controllers, controllers own states. States are built freely and
//! checked in one pass when the controller is validated or exported.

pub mod actor;
pub mod assets;
pub mod command;
pub mod controller;
pub mod error;
pub mod sink;
pub mod state;

pub use actor::{Actor, BehaviorActor, ResourceActor};
pub use assets::ActorAssetRegistry;
pub use command::Command;
pub use controller::{BehaviorController, Controller, ResourceController};
pub use error::ControllerError;
pub use sink::{DirectorySink, JsonSink};
pub use state::{BehaviorState, ControllerState, ParticleOptions, ResourceState};
