//! Crate-internal logging macros.
//!
//! They forward to `tracing` in tests and with the `tracing` feature, and
//! expand to nothing otherwise. Exported only so submodules can `use
//! crate::trace`; not part of the public API.

#[doc(hidden)]
#[cfg(any(test, feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "annodiff", $($arg)*)
    };
}

#[doc(hidden)]
#[cfg(not(any(test, feature = "tracing")))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[doc(hidden)]
#[cfg(any(test, feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "annodiff", $($arg)*)
    };
}

#[doc(hidden)]
#[cfg(not(any(test, feature = "tracing")))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
