//! Centralized rule constants for Worldle game logic.
//!
//! These values define the ruleset every player shares. Keeping them together
//! ensures the rules can only be adjusted via code changes reviewed in version
//! control, rather than through external JSON assets.

// Ruleset ------------------------------------------------------------------
/// Guesses allowed per daily puzzle.
pub const MAX_ATTEMPTS: u32 = 7;
/// Separator for composite values of the multi-valued attribute.
pub(crate) const MULTI_VALUE_DELIMITER: char = '/';

// Trophy ladders -----------------------------------------------------------
pub(crate) const STREAK_THRESHOLDS: [u32; 7] = [3, 7, 14, 30, 90, 180, 365];
pub(crate) const TOTAL_WIN_THRESHOLDS: [u32; 8] = [1, 3, 5, 10, 25, 50, 100, 250];

// Storage slots ------------------------------------------------------------
pub const SLOT_SESSION: &str = "worldle.session";
pub const SLOT_HISTORY: &str = "worldle.history";
pub const SLOT_PREFERENCES: &str = "worldle.preferences";
pub const SLOT_TROPHY_BASELINE: &str = "worldle.trophies.baseline";

// Share grid ---------------------------------------------------------------
pub(crate) const SHARE_MARK_CORRECT: &str = "🟩";
pub(crate) const SHARE_MARK_OTHER: &str = "⬜";
pub(crate) const SHARE_LOSS_MARK: &str = "X";

// Configuration defaults ---------------------------------------------------
pub(crate) const DEFAULT_TITLE: &str = "Wizarding Worldle";
pub(crate) const DEFAULT_RECENT_GAMES: usize = 10;
