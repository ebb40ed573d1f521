//! Exit codes for gatectl
//!
//! Values follow sysexits.h where one fits.

use gate_common::GateError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the input log cannot be read (EX_NOINPUT)
pub const EXIT_INPUT_UNREADABLE: i32 = 66;

/// Exit code when the configuration is missing or invalid (EX_CONFIG)
pub const EXIT_CONFIG_INVALID: i32 = 78;

/// Map a command failure to its exit status
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<GateError>() {
        Some(GateError::Io { .. }) => EXIT_INPUT_UNREADABLE,
        Some(
            GateError::ConfigRead { .. } | GateError::Config { .. } | GateError::ConfigValue(_),
        ) => EXIT_CONFIG_INVALID,
        _ => EXIT_GENERAL_ERROR,
    }
}
