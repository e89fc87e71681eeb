//! Adventure engine core.
//!
//! - [`status`] - player status flags
//! - [`effects`] - effect descriptors and their timers
//! - [`player`] - health, status and inventory
//! - [`world`] - rooms, items and the world file
//! - [`commands`] - command registry, dispatcher and base verbs
//! - [`controller`] - session owner and read-eval loop
//! - [`session`] - finish latch and notification channel
//! - [`console`] - stdin/stdout transport

pub mod commands;
pub mod console;
pub mod controller;
pub mod effects;
pub mod errors;
pub mod player;
pub mod session;
pub mod status;
pub mod world;

pub use commands::{
    BaseCommands, CommandContext, CommandHandler, CommandModule, CommandRegistry, Dispatch,
};
pub use controller::{GameController, GameState};
pub use effects::{BleedSeverity, EffectDescriptor, EffectEngine, EffectEvent};
pub use errors::{GameError, WorldError};
pub use player::PlayerState;
pub use session::{FinishReason, Notifier, SessionHandle};
pub use status::StatusSet;
pub use world::{Item, Room, RoomGraph, WorldData};
