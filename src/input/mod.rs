//! Keyboard input, turned into game commands

pub mod handler;

pub use handler::InputHandler;

use crossterm::event::{Event, KeyEventKind};
use futures::{Stream, StreamExt, future};
use tracing::warn;

use crate::game::Command;

/// Turn a stream of terminal events into the lazy sequence of commands the
/// play mode consumes. Only key presses count; releases, resizes and
/// unmapped keys produce nothing.
pub fn command_stream<S>(events: S, handler: InputHandler) -> impl Stream<Item = Command>
where
    S: Stream<Item = std::io::Result<Event>>,
{
    events.filter_map(move |event| {
        let command = match event {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                handler.handle_key_event(key)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "failed to read terminal event");
                None
            }
        };
        future::ready(command)
    })
}
