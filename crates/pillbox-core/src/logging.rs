#![forbid(unsafe_code)]

//! Event logging.
//!
//! Pillbox logs through three levels only:
//!
//! - `warn!` for recoverable input problems such as an unusable color token,
//! - `debug!` for pill activations and focus changes,
//! - `trace!` for focus traversal inside a list.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! swallow their arguments, so call sites read the same in both builds.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards a warning.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    #[test]
    fn disabled_macros_accept_tracing_syntax() {
        let label = "Test";
        crate::debug!(label, source = "pointer", "pill select");
        crate::trace!(from = 0usize, to = 1usize, "pill focus moved");
        crate::warn!(token = "nope", error = %"bad", "unusable pill color");
        assert_eq!(label, "Test");
    }
}
