//! Test utilities & fixtures.
//! Builds a small deterministic world and a controller wired to an output
//! channel the test can read back.

use manor::game::{
    CommandRegistry, EffectDescriptor, GameController, Item, Notifier, Room, RoomGraph, WorldData,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Hall with three exits and a key; the library leads west to the garden
/// (the exit). The kitchen holds one item per timed effect.
#[allow(dead_code)]
pub fn hall_world() -> WorldData {
    let rooms = RoomGraph::new()
        .with_room(
            "hall",
            Room::new("Hall", "A long hall.")
                .with_exit("north", "library")
                .with_exit("south", "cellar")
                .with_exit("east", "kitchen")
                .with_item(
                    Item::new("key", "A rusty key")
                        .with_effect(EffectDescriptor::Hurt { damage: 10 }),
                ),
        )
        .with_room(
            "library",
            Room::new("Library", "Rows of rotting books.")
                .with_exit("south", "hall")
                .with_exit("west", "garden")
                .with_item(Item::new("book", "A mouldy book")),
        )
        .with_room(
            "cellar",
            Room::new("Cellar", "Damp and dark.").with_exit("north", "hall"),
        )
        .with_room(
            "kitchen",
            Room::new("Kitchen", "Pots and pans.")
                .with_exit("west", "hall")
                .with_item(Item::new("knife", "A carving knife").with_effect(
                    EffectDescriptor::Bleed {
                        damage: 5,
                        tick: 1,
                        timeout: 3,
                    },
                ))
                .with_item(
                    Item::new("syrup", "Sticky syrup")
                        .with_effect(EffectDescriptor::Slow { timeout: 5 }),
                )
                .with_item(
                    Item::new("dust", "Glittering dust")
                        .with_effect(EffectDescriptor::Blind { timeout: 5 }),
                ),
        )
        .with_room("garden", Room::new("Garden", "Fresh air.").ending());

    WorldData::new(rooms, "hall")
        .with_opening("You wake up in a dusty manor.")
        .with_base_hp(100)
}

/// A started controller plus the player's output stream.
#[allow(dead_code)]
pub fn start_game(world: WorldData) -> (GameController, UnboundedReceiver<String>) {
    let (notifier, output) = Notifier::channel();
    let mut game = GameController::new(world, CommandRegistry::with_base_commands(), notifier);
    game.start().expect("start room exists");
    (game, output)
}

/// Everything printed so far.
#[allow(dead_code)]
pub fn drain(output: &mut UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = output.try_recv() {
        lines.push(line);
    }
    lines
}
