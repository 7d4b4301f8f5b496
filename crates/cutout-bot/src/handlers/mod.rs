//! Telegram update handlers.

mod commands;
mod schema;
mod sticker;
mod types;

pub use commands::Command;
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
