use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomForgeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid rating for player {player}: {reason}")]
    InvalidRating { player: String, reason: String },

    #[error("Room sink closed: consumer dropped the receiver")]
    SinkClosed,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

pub type Result<T> = std::result::Result<T, RoomForgeError>;
