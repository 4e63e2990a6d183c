//! Payload types shared between the control transport and the application
//! loop.
//!
//! A [`Command`] is what the network side hands to the application side; a
//! list of [`Value`]s is what travels back. Neither type knows anything about
//! sockets or threads.

mod command;
mod value;

pub use command::{Command, CommandId};
pub use value::{Value, Values};
