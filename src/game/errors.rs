use thiserror::Error;

/// Errors raised while a session is running.
///
/// Only [`GameError::Domain`] is recoverable: the dispatcher reports it to the
/// player and keeps going. Everything else is a bug and ends the session.
#[derive(Debug, Error)]
pub enum GameError {
    /// Expected failure caused by player input (unknown verb, missing item, ...).
    #[error("{0}")]
    Domain(String),

    /// The effect event channel closed while the controller still needed it.
    #[error("effect channel closed")]
    Channel,

    /// Unexpected state (room vanished from the graph, etc.).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    pub fn domain(msg: impl Into<String>) -> Self {
        GameError::Domain(msg.into())
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, GameError::Domain(_))
    }
}

/// Errors raised while loading or validating world content. All of these are
/// fatal: the engine refuses to start on corrupt data.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Wrapper around IO errors (reading or writing the world file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, missing required fields, or an unknown effect tag.
    #[error("malformed world data: {0}")]
    Json(#[from] serde_json::Error),

    /// `start_room` does not name a room in the graph.
    #[error("start room '{0}' does not exist")]
    UnknownStartRoom(String),

    /// An exit points at a room identifier that is not in the graph.
    #[error("room '{room}' exit '{direction}' leads to unknown room '{target}'")]
    DanglingExit {
        room: String,
        direction: String,
        target: String,
    },

    /// An effect descriptor decoded fine but its parameters are unusable.
    #[error("item '{item}' in room '{room}': {reason}")]
    InvalidEffect {
        room: String,
        item: String,
        reason: String,
    },
}
