//! Command registry, dispatcher and the base command module.
//!
//! Verbs are contributed by [`CommandModule`]s as explicit lists of
//! [`CommandHandler`]s. The registry is an ordinary value owned by the
//! controller; registering a name twice replaces the earlier handler.
//!
//! Dispatch splits the input on the first whitespace into a verb and a raw
//! argument string. Domain errors from handlers are shown to the player and
//! swallowed; anything else bubbles up and ends the session.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::game::controller::GameState;
use crate::game::effects::EffectEngine;
use crate::game::errors::GameError;
use crate::logutil::{escape_log, INPUT_PREVIEW, VERB_PREVIEW};

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    pub state: &'a mut GameState,
    pub effects: &'a EffectEngine,
    pub commands: &'a CommandRegistry,
}

impl CommandContext<'_> {
    pub fn notify(&self, msg: impl Into<String>) {
        self.state.player.notify(msg);
    }
}

type CommandFn = dyn Fn(&mut CommandContext<'_>, &str) -> Result<(), GameError> + Send + Sync;

#[derive(Clone)]
pub struct CommandHandler {
    pub name: String,
    pub description: String,
    invoke: Arc<CommandFn>,
}

impl CommandHandler {
    pub fn new<F>(name: &str, description: &str, invoke: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &str) -> Result<(), GameError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            invoke: Arc::new(invoke),
        }
    }

    pub fn invoke(&self, ctx: &mut CommandContext<'_>, args: &str) -> Result<(), GameError> {
        (self.invoke)(ctx, args)
    }
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandler")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// A named bundle of verbs.
pub trait CommandModule {
    fn name(&self) -> &str;
    fn commands(&self) -> Vec<CommandHandler>;
}

/// Result of dispatching one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank input, nothing ran.
    Empty,
    /// The handler for this verb completed.
    Ran(String),
    /// A domain error was reported to the player.
    Rejected(String),
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with [`BaseCommands`].
    pub fn with_base_commands() -> Self {
        let mut registry = Self::new();
        registry.register_module(&BaseCommands);
        registry
    }

    /// Store `handler` under its name, returning whatever it replaced.
    pub fn register(&mut self, handler: CommandHandler) -> Option<CommandHandler> {
        let replaced = self.commands.insert(handler.name.clone(), handler);
        if let Some(old) = &replaced {
            debug!("command '{}' replaced", old.name);
        }
        replaced
    }

    pub fn register_module(&mut self, module: &dyn CommandModule) {
        let handlers = module.commands();
        info!(
            "registering command module {} ({} commands)",
            module.name(),
            handlers.len()
        );
        for handler in handlers {
            self.register(handler);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandHandler> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandHandler> {
        self.commands.values()
    }

    /// Resolve and run one line of player input.
    pub fn dispatch(
        &self,
        state: &mut GameState,
        effects: &EffectEngine,
        line: &str,
    ) -> Result<Dispatch, GameError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Dispatch::Empty);
        }
        let (verb, args) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        debug!(
            "dispatch verb={} args={}",
            escape_log(verb, VERB_PREVIEW),
            escape_log(args, INPUT_PREVIEW)
        );

        let outcome = match self.commands.get(verb) {
            Some(handler) => {
                let mut ctx = CommandContext {
                    state: &mut *state,
                    effects,
                    commands: self,
                };
                handler.invoke(&mut ctx, args)
            }
            None => Err(GameError::domain("Command not found")),
        };

        match outcome {
            Ok(()) => Ok(Dispatch::Ran(verb.to_string())),
            Err(GameError::Domain(msg)) => {
                state.player.notify(msg.clone());
                Ok(Dispatch::Rejected(msg))
            }
            Err(e) => Err(e),
        }
    }
}

/// The built-in verbs: move, use, collect, list, help.
pub struct BaseCommands;

impl CommandModule for BaseCommands {
    fn name(&self) -> &str {
        "base"
    }

    fn commands(&self) -> Vec<CommandHandler> {
        vec![
            CommandHandler::new("move", "Move to a location. use: move <direction>.", cmd_move),
            CommandHandler::new("use", "Use an item. use: use <item>.", cmd_use),
            CommandHandler::new("collect", "Collect an item.", cmd_collect),
            CommandHandler::new("list", "List your collected items.", cmd_list),
            CommandHandler::new("help", "Display the help.", cmd_help),
        ]
    }
}

fn required<'a>(args: &'a str, usage: &str) -> Result<&'a str, GameError> {
    if args.is_empty() {
        return Err(GameError::domain(format!("Usage: {}", usage)));
    }
    Ok(args)
}

fn cmd_move(ctx: &mut CommandContext<'_>, args: &str) -> Result<(), GameError> {
    let direction = required(args, "move <direction>")?;
    let target = ctx
        .state
        .rooms
        .exit_target(ctx.state.current_room_id(), direction)
        .map(str::to_string)
        .ok_or_else(|| GameError::domain("Cannot move in this direction"))?;
    ctx.state.enter_room(&target)
}

fn cmd_use(ctx: &mut CommandContext<'_>, args: &str) -> Result<(), GameError> {
    let name = required(args, "use <item>")?;
    let item = ctx
        .state
        .player
        .take_item(name)
        .ok_or_else(|| GameError::domain("This item does not exist"))?;
    ctx.effects.apply_effects(&mut ctx.state.player, &item.effects);
    Ok(())
}

fn cmd_collect(ctx: &mut CommandContext<'_>, args: &str) -> Result<(), GameError> {
    let name = required(args, "collect <item>")?;
    let item = ctx
        .state
        .current_room_mut()?
        .take_item(name)
        .ok_or_else(|| GameError::domain("This item does not exist"))?;
    ctx.state.player.add_item(item);
    Ok(())
}

fn cmd_list(ctx: &mut CommandContext<'_>, _args: &str) -> Result<(), GameError> {
    ctx.notify("You have the following items:");
    let inventory = ctx.state.player.inventory();
    if inventory.is_empty() {
        return Err(GameError::domain("You currently have no items"));
    }
    for item in inventory {
        ctx.notify(format!("\t{}", item));
    }
    Ok(())
}

fn cmd_help(ctx: &mut CommandContext<'_>, _args: &str) -> Result<(), GameError> {
    ctx.notify("Commands:");
    for handler in ctx.commands.iter() {
        ctx.notify(format!("{}: {}", handler.name, handler.description));
    }
    Ok(())
}
