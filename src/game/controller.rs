//! Game controller: owns the session state and drives the read-eval loop.
//!
//! ```text
//! input line ─► CommandRegistry::dispatch ─► handler ─► GameState / EffectEngine
//!                                                            │
//! timer task ─► EffectEvent ─► EffectEngine::resolve ◄───────┘
//! ```
//!
//! The loop in [`GameController::run`] is the only place state changes:
//! player input and timer events are taken from their channels one at a
//! time, and the session latch is watched in the same `select!` so a finish
//! from any source ends the loop immediately.

use log::{debug, info};
use tokio::sync::mpsc;

use crate::game::commands::{CommandRegistry, Dispatch};
use crate::game::effects::{EffectDescriptor, EffectEngine, EffectEvent};
use crate::game::errors::GameError;
use crate::game::player::PlayerState;
use crate::game::session::{wait_finished, FinishReason, Notifier, SessionHandle};
use crate::game::world::{Room, RoomGraph, WorldData};
use crate::logutil::{escape_log, INPUT_PREVIEW};

pub const DEFAULT_PROMPT: &str = "Make your choice";
pub const HELP_HINT: &str = "Use the command `help` to list available commands!";

/// Mutable world state shared with command handlers.
#[derive(Debug)]
pub struct GameState {
    pub player: PlayerState,
    pub rooms: RoomGraph,
    current_room: String,
}

impl GameState {
    pub fn new(player: PlayerState, rooms: RoomGraph, start_room: &str) -> Self {
        Self {
            player,
            rooms,
            current_room: start_room.to_string(),
        }
    }

    pub fn current_room_id(&self) -> &str {
        &self.current_room
    }

    pub fn current_room(&self) -> Result<&Room, GameError> {
        self.rooms
            .get(&self.current_room)
            .ok_or_else(|| missing_room(&self.current_room))
    }

    pub fn current_room_mut(&mut self) -> Result<&mut Room, GameError> {
        let id = &self.current_room;
        self.rooms.get_mut(id).ok_or_else(|| missing_room(id))
    }

    /// Walk into room `id` and describe it. Fails while the player is slowed.
    /// Entering an ending room finishes the session.
    pub fn enter_room(&mut self, id: &str) -> Result<(), GameError> {
        if self.player.status().is_slow() {
            return Err(GameError::domain("You are still locked inside this room."));
        }
        let room = self.rooms.get(id).ok_or_else(|| missing_room(id))?;
        self.player.notify(room.banner());
        self.player.notify(room.description.clone());
        self.player.notify(room.exits_line());
        if !self.player.status().is_blind() {
            self.player.notify(room.items_line());
        }
        let ending = room.ending_room;
        debug!("entered room {}", id);
        self.current_room = id.to_string();
        if ending {
            self.player.finish(FinishReason::ReachedExit);
        }
        Ok(())
    }
}

fn missing_room(id: &str) -> GameError {
    GameError::Internal(format!("room '{}' is not in the world", id))
}

pub struct GameController {
    state: GameState,
    registry: CommandRegistry,
    effects: EffectEngine,
    effect_rx: mpsc::UnboundedReceiver<EffectEvent>,
    session: SessionHandle,
    opening: String,
    prompt: String,
    show_help_hint: bool,
}

impl GameController {
    /// Build a session from a validated world. Player output goes to `notifier`.
    pub fn new(world: WorldData, registry: CommandRegistry, notifier: Notifier) -> Self {
        let (rooms, opening, start_room, basehp) = world.into_parts();
        let session = SessionHandle::new(notifier);
        let (effects, effect_rx) = EffectEngine::new(session.clone());
        let player = PlayerState::new(basehp, session.clone());
        Self {
            state: GameState::new(player, rooms, &start_room),
            registry,
            effects,
            effect_rx,
            session,
            opening,
            prompt: DEFAULT_PROMPT.to_string(),
            show_help_hint: true,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    pub fn with_help_hint(mut self, show: bool) -> Self {
        self.show_help_hint = show;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn player(&self) -> &PlayerState {
        &self.state.player
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn effects(&self) -> &EffectEngine {
        &self.effects
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn is_finished(&self) -> bool {
        !self.session.is_active()
    }

    /// End the session. Idempotent: only the first reason sticks.
    pub fn finish(&mut self, reason: FinishReason) -> bool {
        self.state.player.finish(reason)
    }

    /// Show the opening text and enter the start room.
    pub fn start(&mut self) -> Result<(), GameError> {
        if !self.opening.is_empty() {
            self.state.player.notify(self.opening.clone());
        }
        if self.show_help_hint {
            self.state.player.notify(HELP_HINT);
        }
        let start = self.state.current_room.clone();
        info!("session started in room {}", start);
        self.state.enter_room(&start)
    }

    pub fn dispatch(&mut self, line: &str) -> Result<Dispatch, GameError> {
        self.registry.dispatch(&mut self.state, &self.effects, line)
    }

    pub fn apply_effects(&mut self, effects: &[EffectDescriptor]) {
        self.effects.apply_effects(&mut self.state.player, effects);
    }

    pub fn resolve(&mut self, event: EffectEvent) {
        self.effects.resolve(&mut self.state.player, event);
    }

    /// Wait for the next timer event and apply it.
    pub async fn process_next_effect(&mut self) -> Option<EffectEvent> {
        let event = self.effect_rx.recv().await?;
        self.resolve(event);
        Some(event)
    }

    /// Apply every timer event that is already queued. Returns how many ran.
    pub fn drain_effects(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.effect_rx.try_recv() {
            self.resolve(event);
            applied += 1;
        }
        applied
    }

    /// Read-eval loop. Returns the finish reason, or `None` when input ended
    /// before the session did.
    pub async fn run(
        &mut self,
        mut lines: mpsc::UnboundedReceiver<String>,
    ) -> Result<Option<FinishReason>, GameError> {
        let mut finished = self.session.subscribe();
        let mut prompt_due = true;
        while self.session.is_active() {
            if prompt_due {
                self.state.player.notify(self.prompt.clone());
                prompt_due = false;
            }
            tokio::select! {
                biased;
                _ = wait_finished(&mut finished) => break,
                event = self.effect_rx.recv() => match event {
                    Some(event) => self.resolve(event),
                    None => return Err(GameError::Channel),
                },
                line = lines.recv() => match line {
                    Some(line) => {
                        debug!("input: {}", escape_log(&line, INPUT_PREVIEW));
                        self.dispatch(&line)?;
                        prompt_due = true;
                    }
                    None => {
                        info!("input closed before the session finished");
                        break;
                    }
                },
            }
        }
        if !self.session.is_active() {
            self.state.player.end_timed_status();
        }
        Ok(self.session.reason())
    }
}
