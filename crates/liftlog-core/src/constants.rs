// ABOUTME: Application-wide limits and defaults for LiftLog
// ABOUTME: Paging bounds, text length limits and numeric ranges for entity fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

/// Paging defaults and bounds
pub mod paging {
    /// Page returned when the client does not ask for one
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when the client does not ask for one
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    /// Largest page size a client may request
    pub const MAX_PAGE_SIZE: u32 = 100;
    /// Longest accepted search term
    pub const MAX_SEARCH_LENGTH: usize = 100;
}

/// Text field limits (characters)
pub mod text {
    /// Names of reference entities and sessions
    pub const NAME_MAX: usize = 100;
    /// Descriptions of reference entities
    pub const DESCRIPTION_MAX: usize = 1000;
    /// Exercise instructions
    pub const INSTRUCTIONS_MAX: usize = 4000;
    /// Free-form notes on user-owned entities
    pub const NOTES_MAX: usize = 2000;
    /// Email addresses carried over from identity claims
    pub const EMAIL_MAX: usize = 320;
}

/// Numeric ranges for training data
pub mod training {
    /// Sets per exercise entry
    pub const SETS_MIN: i64 = 1;
    /// Sets per exercise entry
    pub const SETS_MAX: i64 = 100;
    /// Lower bound for configured target reps
    pub const TARGET_REPS_MIN: i64 = 1;
    /// Reps per set; a failed set records zero
    pub const REPS_MAX: i64 = 1000;
    /// Rate of perceived exertion scale
    pub const RPE_MIN: i64 = 1;
    /// Rate of perceived exertion scale
    pub const RPE_MAX: i64 = 10;
}
