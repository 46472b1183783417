//! # Supervisor configuration.
//!
//! Provides [`Config`], the centralized settings for the link supervisor.
//!
//! ## Sentinel values
//! - `join_grace = 0s` → `stop()` abandons the worker context immediately
//!   (no bounded wait)
//! - `bus_capacity` / `progress_capacity` are clamped to a minimum of 1

use std::borrow::Cow;
use std::time::Duration;

/// Configuration for the link supervisor.
///
/// ## Field semantics
/// - `capability`: permission name the gate is queried for before a
///   privileged worker spawn
/// - `start_value`: start parameter handed to the worker (e.g. the first
///   sequence number to stream)
/// - `join_grace`: bounded wait for the worker to observe cancellation
///   before its context is abandoned
/// - `bus_capacity`: broadcast ring size for runtime events
/// - `progress_capacity`: per-worker bounded progress queue; on overflow the
///   oldest pending report wins and newer ones are dropped
#[derive(Clone, Debug)]
pub struct Config {
    /// Capability the permission gate is asked about (e.g.
    /// `post-notifications`).
    pub capability: Cow<'static, str>,

    /// Start parameter passed to the worker on spawn.
    pub start_value: u64,

    /// Maximum wait for the worker to join after `stop()`.
    ///
    /// When the grace elapses the context is abandoned and reported as a
    /// non-fatal leak risk; the caller is never blocked on teardown.
    pub join_grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events will
    /// observe `Lagged` and skip older items. Minimum value is 1.
    pub bus_capacity: usize,

    /// Capacity of the per-spawn progress channel.
    pub progress_capacity: usize,
}

impl Config {
    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the progress capacity clamped to a minimum of 1.
    #[inline]
    pub fn progress_capacity_clamped(&self) -> usize {
        self.progress_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `capability = "post-notifications"`
    /// - `start_value = 10`
    /// - `join_grace = 1s`
    /// - `bus_capacity = 256`
    /// - `progress_capacity = 64`
    fn default() -> Self {
        Self {
            capability: Cow::Borrowed("post-notifications"),
            start_value: 10,
            join_grace: Duration::from_secs(1),
            bus_capacity: 256,
            progress_capacity: 64,
        }
    }
}
