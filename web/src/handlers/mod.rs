//! HTTP request handlers.

mod game;
mod health;
mod logs;

pub use game::*;
pub use health::*;
pub use logs::*;
