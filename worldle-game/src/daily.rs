//! Calendar dates and deterministic daily puzzle selection.
//!
//! Every player sees the same mystery entity on the same calendar day: the
//! date's seed string is hashed and reduced modulo the catalog length. The
//! seed string is the UTC date in `YYYY-MM-DD` form unless a deployment opts
//! into [`SeedFormat::Legacy`] to keep answers published under the older
//! `"Www Mmm DD YYYY"` rendering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Catalog, Entity};

const ISO_FORMAT: &str = "%Y-%m-%d";
const LEGACY_FORMAT: &str = "%a %b %d %Y";

/// A canonical, timezone-stable calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameDate(NaiveDate);

impl GameDate {
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Calendar day of an instant, taken in UTC.
    #[must_use]
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    #[must_use]
    pub fn today_utc() -> Self {
        Self::from_utc(Utc::now())
    }

    #[must_use]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }

    /// The following calendar day, if representable.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The text fed to the daily hash.
    #[must_use]
    pub fn seed_string(self, format: SeedFormat) -> String {
        match format {
            SeedFormat::Iso => self.0.format(ISO_FORMAT).to_string(),
            SeedFormat::Legacy => self.0.format(LEGACY_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for GameDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), ISO_FORMAT).map(Self)
    }
}

/// Textual date rendering used as the selection seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedFormat {
    /// `2024-01-15`
    #[default]
    Iso,
    /// `Mon Jan 15 2024`, matching answers published before the ISO switch.
    Legacy,
}

/// 32-bit rolling hash `h = h * 31 + unit` over UTF-16 code units with
/// two's-complement wraparound.
#[must_use]
pub fn seed_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0_i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Reduce a hash to a catalog index as `abs(hash) mod len`.
pub(crate) fn index_from_hash(hash: i32, len: usize) -> Option<usize> {
    usize::try_from(hash.unsigned_abs()).ok()?.checked_rem(len)
}

/// Maps calendar days onto catalog entries.
#[derive(Debug, Clone, Copy)]
pub struct PuzzleSelector<'a> {
    catalog: &'a Catalog,
    format: SeedFormat,
}

impl<'a> PuzzleSelector<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog, format: SeedFormat) -> Self {
        Self { catalog, format }
    }

    #[must_use]
    pub const fn format(&self) -> SeedFormat {
        self.format
    }

    /// Catalog index of the mystery entity for `date`.
    #[must_use]
    pub fn index_for(&self, date: GameDate) -> usize {
        index_from_hash(seed_hash(&date.seed_string(self.format)), self.catalog.len()).unwrap_or(0)
    }

    /// Mystery entity for `date`.
    #[must_use]
    pub fn select(&self, date: GameDate) -> &'a Entity {
        &self.catalog.entities()[self.index_for(date)]
    }

    /// Mystery entity for an arbitrary seed string.
    #[must_use]
    pub fn select_seed(&self, seed: &str) -> Option<&'a Entity> {
        index_from_hash(seed_hash(seed), self.catalog.len()).and_then(|i| self.catalog.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_15() -> GameDate {
        GameDate::from_ymd(2024, 1, 15).unwrap()
    }

    #[test]
    fn seed_strings_follow_format() {
        assert_eq!(jan_15().seed_string(SeedFormat::Iso), "2024-01-15");
        assert_eq!(jan_15().seed_string(SeedFormat::Legacy), "Mon Jan 15 2024");
        let early = GameDate::from_ymd(2024, 3, 5).unwrap();
        assert_eq!(early.seed_string(SeedFormat::Legacy), "Tue Mar 05 2024");
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(seed_hash(""), 0);
        assert_eq!(seed_hash("a"), 97);
        assert_eq!(seed_hash("2024-01-15"), -613_341_597);
        assert_eq!(seed_hash("Mon Jan 15 2024"), 813_974_815);
    }

    #[test]
    fn index_handles_minimum_hash() {
        assert_eq!(index_from_hash(i32::MIN, 47), Some(21));
        assert_eq!(index_from_hash(-613_341_597, 47), Some(10));
        assert_eq!(index_from_hash(5, 0), None);
    }

    #[test]
    fn selection_is_deterministic() {
        let catalog = Catalog::bundled().unwrap();
        let selector = PuzzleSelector::new(&catalog, SeedFormat::Iso);
        let first = selector.select(jan_15());
        for _ in 0..5 {
            assert_eq!(selector.select(jan_15()), first);
        }
        assert_eq!(first.name, "Luna Lovegood");

        let legacy = PuzzleSelector::new(&catalog, SeedFormat::Legacy);
        assert_eq!(legacy.select(jan_15()).name, "Severus Snape");
        assert_eq!(
            legacy.select_seed("Mon Jan 15 2024").map(|e| e.name.as_str()),
            Some("Severus Snape")
        );
    }

    #[test]
    fn dates_parse_and_display_as_iso() {
        let parsed: GameDate = " 2024-01-15 ".parse().unwrap();
        assert_eq!(parsed, jan_15());
        assert_eq!(parsed.to_string(), "2024-01-15");
        assert_eq!(parsed.next().unwrap().to_string(), "2024-01-16");
        assert!("15/01/2024".parse::<GameDate>().is_err());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"2024-01-15\"");
    }
}
