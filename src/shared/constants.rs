/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 500;

// =============================================================================
// REPORT CONSTANTS
// =============================================================================

/// Maximum accepted photo size (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Maximum length of free-text report fields after sanitizing
pub const MAX_TEXT_LENGTH: usize = 500;

/// Confidence assumed when the vision assistant omits one
pub const DEFAULT_REFINEMENT_CONFIDENCE: f64 = 0.8;
