//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt
//! - Host runtimes (`log` feature): Uses the `log` facade
//! - Host tests: Uses println!
//! - Otherwise: No-op (arguments are still type-checked and used)
//!
//! The backend is selected by the features of *this* crate, so every
//! `log_*!` call inside `path_manager_core` follows the same routing.

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "log"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", feature = "log", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "log"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", feature = "log", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "log"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", feature = "log", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "log"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", feature = "log", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "defmt"), feature = "log"))]
        ::log::trace!($($arg)*);

        #[cfg(all(not(feature = "defmt"), not(feature = "log"), test))]
        println!("[TRACE] {}", format!($($arg)*));

        #[cfg(not(any(feature = "defmt", feature = "log", test)))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
