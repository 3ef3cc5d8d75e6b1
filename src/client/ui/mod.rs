//! Terminal screens for the client.

mod name_entry;
mod play;
mod render;
mod scoreboard;
mod stats;
mod waiting;

pub use render::render;
