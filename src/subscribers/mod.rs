//! Observer surface: the [`Subscribe`] trait, the non-blocking
//! [`SubscriberSet`] fan-out, and the built-in subscribers.

#[cfg(feature = "logging")]
mod log;
mod set;
mod status;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use status::StatusWriter;
pub use subscribe::Subscribe;
