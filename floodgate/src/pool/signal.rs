//! Generation stop signal.
//!
//! A [`StopSignal`] is a single-fire broadcast flag: before firing, every
//! observer sees "not fired"; after firing, every current and future clone
//! sees "fired", permanently. It is not reusable — the governor allocates a
//! fresh signal for each generation because a fired signal cannot be
//! un-fired.
//!
//! The broadcast property is what distinguishes this from a stop *message*:
//! a value sent on a channel reaches exactly one listener, leaving the rest
//! of the pool unaware. Every worker holds a clone of the generation's
//! signal and reads the same state.

use tokio_util::sync::CancellationToken;

/// Broadcast stop flag for one pool generation.
///
/// Clones share the same underlying state. Firing is idempotent at this
/// layer; the governor's state machine ensures `fire` is reached at most
/// once per generation.
#[derive(Debug, Clone)]
pub struct StopSignal {
    token: CancellationToken,
    generation: u64,
}

impl StopSignal {
    /// Creates an unfired signal for the given generation.
    pub fn new(generation: u64) -> Self {
        Self {
            token: CancellationToken::new(),
            generation,
        }
    }

    /// Returns the generation this signal belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fires the signal. Safe to call concurrently with any number of
    /// observers; once fired, no observer ever sees "not fired" again.
    pub fn fire(&self) {
        self.token.cancel();
    }

    /// Non-blocking broadcast read of the fired state.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes when the signal fires. Completes immediately if it
    /// already has.
    pub async fn fired(&self) {
        self.token.cancelled().await;
    }
}
