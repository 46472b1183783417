//! Event surface: the broadcast [`Bus`] and the [`Event`]/[`EventKind`]
//! metadata it carries.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
