//! Rooms, items and the world file.
//!
//! The world is a JSON document:
//!
//! ```json
//! {
//!   "opening": "You wake up in a dusty manor...",
//!   "start_room": "hall",
//!   "basehp": 100,
//!   "rooms": {
//!     "hall": {
//!       "name": "Hall",
//!       "description": "A long hall.",
//!       "exits": { "north": "library" },
//!       "items": [
//!         { "name": "key", "description": "A rusty key",
//!           "effects": [{ "type": "hurt", "damage": 10 }] }
//!       ]
//!     },
//!     "library": { "name": "Library", "description": "Books.", "ending_room": true }
//!   }
//! }
//! ```
//!
//! Room topology is fixed once loaded; only item lists change while playing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::effects::EffectDescriptor;
use crate::game::errors::WorldError;

pub const DEFAULT_BASE_HP: i32 = 100;

/// Join names as `a, b and c`.
pub fn and_comma_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

impl Item {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: EffectDescriptor) -> Self {
        self.effects.push(effect);
        self
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.name, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub description: String,
    /// direction -> room id. `rooms` is the legacy key for this map.
    #[serde(default, alias = "rooms")]
    pub exits: BTreeMap<String, String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, alias = "endingRoom")]
    pub ending_room: bool,
}

impl Room {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            exits: BTreeMap::new(),
            items: Vec::new(),
            ending_room: false,
        }
    }

    pub fn with_exit(mut self, direction: &str, destination: &str) -> Self {
        self.exits
            .insert(direction.to_string(), destination.to_string());
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn ending(mut self) -> Self {
        self.ending_room = true;
        self
    }

    /// Room name centred in a 60-column rule of `*`.
    pub fn banner(&self) -> String {
        format!("{:*^60}", self.name)
    }

    pub fn exits_line(&self) -> String {
        let names: Vec<&str> = self.exits.keys().map(String::as_str).collect();
        format!("There are {} exits: {}", names.len(), and_comma_list(&names))
    }

    pub fn items_line(&self) -> String {
        let rendered: Vec<String> = self.items.iter().map(Item::to_string).collect();
        format!(
            "There are {} items: {}",
            rendered.len(),
            and_comma_list(&rendered)
        )
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    /// Remove and return the first item called `name`.
    pub fn take_item(&mut self, name: &str) -> Option<Item> {
        let pos = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(pos))
    }
}

/// All rooms of a world, keyed by stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomGraph {
    rooms: BTreeMap<String, Room>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_room(mut self, id: &str, room: Room) -> Self {
        self.rooms.insert(id.to_string(), room);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rooms.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Room)> {
        self.rooms.iter()
    }

    /// Room id reached by leaving `room_id` through `direction`.
    pub fn exit_target(&self, room_id: &str, direction: &str) -> Option<&str> {
        self.rooms
            .get(room_id)?
            .exits
            .get(direction)
            .map(String::as_str)
    }

    pub fn item_count(&self) -> usize {
        self.rooms.values().map(|room| room.items.len()).sum()
    }
}

fn default_base_hp() -> i32 {
    DEFAULT_BASE_HP
}

/// A complete, loadable world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldData {
    pub rooms: RoomGraph,
    #[serde(default)]
    pub opening: String,
    #[serde(alias = "startRoom")]
    pub start_room: String,
    #[serde(default = "default_base_hp", alias = "baseHp", alias = "base_hp")]
    pub basehp: i32,
}

impl WorldData {
    pub fn new(rooms: RoomGraph, start_room: &str) -> Self {
        Self {
            rooms,
            opening: String::new(),
            start_room: start_room.to_string(),
            basehp: DEFAULT_BASE_HP,
        }
    }

    pub fn with_opening(mut self, opening: &str) -> Self {
        self.opening = opening.to_string();
        self
    }

    pub fn with_base_hp(mut self, basehp: i32) -> Self {
        self.basehp = basehp;
        self
    }

    /// Split into room graph, opening text, start room id and base HP.
    pub fn into_parts(self) -> (RoomGraph, String, String, i32) {
        (self.rooms, self.opening, self.start_room, self.basehp)
    }

    /// Parse and validate a world document.
    pub fn from_json_str(contents: &str) -> Result<Self, WorldError> {
        let world: WorldData = serde_json::from_str(contents)?;
        world.validate()?;
        Ok(world)
    }

    /// Load and validate a world file.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), WorldError> {
        fs::write(path.as_ref(), self.to_json()?).await?;
        Ok(())
    }

    /// Reject worlds that would break mid-game: unknown start room, exits
    /// into rooms that do not exist, bleeds that could never tick.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !self.rooms.contains(&self.start_room) {
            return Err(WorldError::UnknownStartRoom(self.start_room.clone()));
        }
        for (id, room) in self.rooms.iter() {
            for (direction, target) in &room.exits {
                if !self.rooms.contains(target) {
                    return Err(WorldError::DanglingExit {
                        room: id.clone(),
                        direction: direction.clone(),
                        target: target.clone(),
                    });
                }
            }
            for item in &room.items {
                for effect in &item.effects {
                    if let EffectDescriptor::Bleed { tick: 0, .. } = effect {
                        return Err(WorldError::InvalidEffect {
                            room: id.clone(),
                            item: item.name.clone(),
                            reason: "bleed tick length must be positive".to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
