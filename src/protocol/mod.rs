//! Wire protocol shared with the coordinator.

mod messages;

pub use messages::{
    ClientMessage, DEFAULT_PORT, QuestionMessage, ServerMessage, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, validate_username,
};
