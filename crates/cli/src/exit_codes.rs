//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `salesq` exit codes.
//! Scripts rely on them, so existing values never change meaning.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                    |
//! |---------|-----------|------------------------------------------------|
//! | 0       | Universal | Success (including "nothing matched" answers)  |
//! | 1       | Universal | General error (unspecified)                    |
//! | 2       | Universal | CLI usage error (bad args)                     |
//! | 3-9     | report    | Sales report could not be loaded               |
//! | 10-12   | ai        | Text generation for general questions          |
//! | 13-19   | plot      | Chart could not be written                     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use salesq_config::AIConfigStatus;
use salesq_engine::{GenerationError, LoadError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Report (3-9)
// =============================================================================

/// Report missing, unreadable, or not shaped like a sales report.
pub const EXIT_LOAD: u8 = 3;

// =============================================================================
// AI (10-12)
// =============================================================================

/// AI disabled (provider=none) and the question needed it.
pub const EXIT_AI_DISABLED: u8 = 10;

/// AI enabled but a setting is unusable.
pub const EXIT_AI_MISCONFIGURED: u8 = 11;

/// The model could not be reached or returned garbage.
pub const EXIT_AI_GENERATION: u8 = 12;

// =============================================================================
// Plot (13-19)
// =============================================================================

/// Chart file could not be written.
pub const EXIT_PLOT_EXPORT: u8 = 13;

/// Every load failure maps to the report range.
pub fn load_exit_code(_err: &LoadError) -> u8 {
    EXIT_LOAD
}

/// A disabled generator is reported as disabled or misconfigured depending
/// on why the CLI could not build a real one.
pub fn generation_exit_code(err: &GenerationError, status: AIConfigStatus) -> u8 {
    match err {
        GenerationError::Disabled(_) => match status {
            AIConfigStatus::Misconfigured => EXIT_AI_MISCONFIGURED,
            _ => EXIT_AI_DISABLED,
        },
        GenerationError::Unreachable(_)
        | GenerationError::Timeout(_)
        | GenerationError::Http { .. }
        | GenerationError::Malformed(_) => EXIT_AI_GENERATION,
    }
}
