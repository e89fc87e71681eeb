//! # Manor - a text adventure engine with timed status effects
//!
//! Manor runs single-player text adventures: the player walks between rooms,
//! picks up items and uses them. Items carry effects that hurt, blind, slow
//! or bleed the player, and the timed ones wear off on their own while the
//! player keeps typing. The game ends when health drops below zero or the
//! player reaches an exit room.
//!
//! ## Features
//!
//! - **Timed effects**: blindness and slowness release after a delay, bleeding
//!   ticks damage in the background; all timers stop when the session ends.
//! - **Pluggable verbs**: command modules register handlers with a
//!   [`CommandRegistry`](game::CommandRegistry); last registration wins.
//! - **Data-driven worlds**: rooms, exits and items load from JSON and are
//!   validated before play starts.
//! - **Single writer**: timer tasks report back over a channel, so only the
//!   controller loop ever mutates the player.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use manor::game::{console, CommandRegistry, GameController, Notifier, WorldData};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let world = WorldData::load("data/manor.json").await?;
//!     let (notifier, output) = Notifier::channel();
//!     let printer = console::spawn_printer(output);
//!
//!     let mut game = GameController::new(world, CommandRegistry::with_base_commands(), notifier);
//!     game.start()?;
//!     game.run(console::spawn_stdin_reader()).await?;
//!
//!     drop(game);
//!     printer.await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - engine core: effects, player, world, commands, controller
//! - [`config`] - TOML configuration
//! - [`logutil`] - log sanitising helpers

pub mod config;
pub mod game;
pub mod logutil;
