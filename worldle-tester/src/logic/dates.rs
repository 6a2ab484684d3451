use anyhow::{Context, Result, bail, ensure};
use chrono::{Datelike, Days};
use std::collections::HashSet;
use worldle_game::GameDate;

/// Longest range accepted from a single `A..B` token.
pub const MAX_RANGE_DAYS: u64 = 3_660;

/// Date used when no usable token is supplied.
pub const DEFAULT_START: (i32, u32, u32) = (2024, 1, 1);

/// A resolved start date plus the CLI token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateInfo {
    pub date: GameDate,
    pub token: Option<String>,
}

impl DateInfo {
    #[must_use]
    pub const fn from_date(date: GameDate) -> Self {
        Self { date, token: None }
    }

    #[must_use]
    pub fn from_token(date: GameDate, token: &str) -> Self {
        Self {
            date,
            token: Some(token.to_string()),
        }
    }

    /// Stable RNG seed for strategies that need one.
    #[must_use]
    pub fn seed(&self) -> u64 {
        date_seed(self.date)
    }
}

/// Resolve CLI date arguments into start dates.
///
/// Supports ISO dates (`2024-01-15`), the keyword `today` (UTC), and inclusive
/// ranges `2024-01-01..2024-01-07`. Duplicates keep their first position.
pub fn resolve_date_inputs(tokens: &[String]) -> Result<Vec<DateInfo>> {
    let mut pending: Vec<DateInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("today") {
            pending.push(DateInfo::from_token(GameDate::today_utc(), token));
            continue;
        }

        if let Some((from, to)) = token.split_once("..") {
            let start = parse_date(from)?;
            let end = parse_date(to)?;
            ensure!(start <= end, "Date range runs backwards: {token}");
            let span = days_between(start, end);
            ensure!(
                span < MAX_RANGE_DAYS,
                "Date range {token} spans {} days; the limit is {MAX_RANGE_DAYS}",
                span + 1
            );
            let mut day = start;
            loop {
                pending.push(DateInfo::from_token(day, token));
                if day == end {
                    break;
                }
                day = day
                    .next()
                    .with_context(|| format!("date range overflowed after {day}"))?;
            }
            continue;
        }

        pending.push(DateInfo::from_token(parse_date(token)?, token));
    }

    let mut seen = HashSet::new();
    pending.retain(|info| seen.insert(info.date));

    if pending.is_empty() {
        let (year, month, day) = DEFAULT_START;
        let date = GameDate::from_ymd(year, month, day).context("default start date")?;
        pending.push(DateInfo::from_date(date));
    }

    Ok(pending)
}

/// `date` moved forward by `days`.
pub fn offset_date(date: GameDate, days: u64) -> Result<GameDate> {
    date.naive()
        .checked_add_days(Days::new(days))
        .map(GameDate::from_naive)
        .with_context(|| format!("{date} + {days} days is out of range"))
}

#[must_use]
pub fn date_seed(date: GameDate) -> u64 {
    u64::from(date.naive().num_days_from_ce().unsigned_abs())
}

fn parse_date(text: &str) -> Result<GameDate> {
    match text.trim().parse::<GameDate>() {
        Ok(date) => Ok(date),
        Err(err) => bail!("Unrecognized date token {text:?}: {err}"),
    }
}

fn days_between(start: GameDate, end: GameDate) -> u64 {
    (end.naive() - start.naive()).num_days().unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_iso_dates_and_ranges() {
        let raw = tokens(&["2024-02-28..2024-03-01", "2024-01-15"]);
        let dates = resolve_date_inputs(&raw).unwrap();
        let rendered: Vec<String> = dates.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["2024-02-28", "2024-02-29", "2024-03-01", "2024-01-15"]
        );
        assert_eq!(dates[0].token.as_deref(), Some("2024-02-28..2024-03-01"));
    }

    #[test]
    fn today_and_duplicates() {
        let today = GameDate::today_utc().to_string();
        let dates = resolve_date_inputs(&tokens(&["today", today.as_str(), "TODAY"])).unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].token.as_deref(), Some("today"));
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        let dates = resolve_date_inputs(&[]).unwrap();
        assert_eq!(dates, vec![DateInfo::from_date(GameDate::from_ymd(2024, 1, 1).unwrap())]);
    }

    #[test]
    fn rejects_garbage_and_backwards_ranges() {
        assert!(resolve_date_inputs(&tokens(&["1337"])).is_err());
        assert!(resolve_date_inputs(&tokens(&["2024-01-10..2024-01-01"])).is_err());
        assert!(resolve_date_inputs(&tokens(&["2000-01-01..2024-01-01"])).is_err());
    }

    #[test]
    fn offsets_cross_month_ends() {
        let start = GameDate::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(offset_date(start, 1).unwrap().to_string(), "2024-02-01");
        assert_eq!(offset_date(start, 0).unwrap(), start);
        assert_ne!(date_seed(start), date_seed(offset_date(start, 1).unwrap()));
    }
}
