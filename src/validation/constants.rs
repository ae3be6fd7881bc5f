/// Minimum length for task titles, in characters.
pub const MIN_TITLE_LEN: usize = 2;

/// Maximum length for task titles, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Minimum length for task descriptions, in characters.
pub const MIN_DESCRIPTION_LEN: usize = 3;

/// Maximum length for task descriptions, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;
