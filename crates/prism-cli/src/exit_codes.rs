//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const VARIANT_FAILED: i32 = 1; // At least one completion call failed
pub const CONFIG_ERROR: i32 = 2; // Invalid input or configuration, nothing was run
