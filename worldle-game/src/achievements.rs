//! Trophy rules evaluated against the completed-game history.
//!
//! Trophies are never stored as a source of truth; they are re-derived from a
//! [`HistoryAggregate`] whenever asked. The only persisted trophy state is the
//! snapshot taken before a session's first guess, which [`newly_unlocked`]
//! diffs against to find what the session earned.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::Attribute;
use crate::constants::{STREAK_THRESHOLDS, TOTAL_WIN_THRESHOLDS};
use crate::history::HistoryAggregate;
use crate::numbers::percent;

const GOLDEN_TRIO: &[&str] = &["Harry Potter", "Hermione Granger", "Ron Weasley"];
const WEASLEY_FAMILY: &[&str] = &[
    "Arthur Weasley",
    "Molly Weasley",
    "Bill Weasley",
    "Charlie Weasley",
    "Percy Weasley",
    "Fred Weasley",
    "George Weasley",
    "Ron Weasley",
    "Ginny Weasley",
];
const MARAUDERS: &[&str] = &["James Potter", "Sirius Black", "Remus Lupin", "Peter Pettigrew"];
const HEADS_OF_HOUSE: &[&str] = &[
    "Minerva McGonagall",
    "Severus Snape",
    "Filius Flitwick",
    "Pomona Sprout",
];
const MALFOY_FAMILY: &[&str] = &[
    "Lucius Malfoy",
    "Narcissa Malfoy",
    "Draco Malfoy",
    "Scorpius Malfoy",
];
const DARK_FORCES: &[&str] = &["Voldemort", "Bellatrix Lestrange", "Gellert Grindelwald"];
const HOGWARTS_HOUSES: &[&str] = &["Gryffindor", "Hufflepuff", "Ravenclaw", "Slytherin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophyCategory {
    Streak,
    TotalWins,
    Milestone,
}

impl TrophyCategory {
    pub const ALL: [Self; 3] = [Self::Streak, Self::TotalWins, Self::Milestone];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Streak => "Streaks",
            Self::TotalWins => "Victories",
            Self::Milestone => "Milestones",
        }
    }

    #[must_use]
    pub const fn is_ladder(self) -> bool {
        !matches!(self, Self::Milestone)
    }
}

/// Predicate over the won games, independent of any ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// Every named entity has been a won mystery.
    WonAll { members: &'static [&'static str] },
    /// At least `times` wins used exactly `attempts` guesses.
    WonInAttempts { attempts: u32, times: u32 },
    /// At least `times` wins used no more than `max_attempts` guesses.
    WonWithin { max_attempts: u32, times: u32 },
    /// Won mysteries cover every listed value of `attribute`.
    WonAcross {
        attribute: Attribute,
        values: &'static [&'static str],
    },
    /// Won mysteries show at least `count` distinct values of `attribute`.
    DistinctAcross { attribute: Attribute, count: u32 },
    /// At least `games` finished games, won or lost.
    Played { games: u32 },
}

/// Typed unlock rule for one trophy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrophyRule {
    /// `max_streak >= threshold`.
    Streak { threshold: u32 },
    /// `wins >= threshold`.
    TotalWins { threshold: u32 },
    Milestone(Milestone),
}

impl TrophyRule {
    #[must_use]
    pub const fn category(&self) -> TrophyCategory {
        match self {
            Self::Streak { .. } => TrophyCategory::Streak,
            Self::TotalWins { .. } => TrophyCategory::TotalWins,
            Self::Milestone(_) => TrophyCategory::Milestone,
        }
    }

    fn measure(&self, history: &HistoryAggregate) -> Progress {
        match *self {
            Self::Streak { threshold } => Progress::new(history.max_streak(), threshold),
            Self::TotalWins { threshold } => Progress::new(history.wins(), threshold),
            Self::Milestone(Milestone::WonAll { members }) => {
                let won = won_values(history, None);
                let hits = members.iter().filter(|m| won.contains(*m)).count();
                Progress::new(count_u32(hits), count_u32(members.len()))
            }
            Self::Milestone(Milestone::WonInAttempts { attempts, times }) => {
                let hits = history
                    .won_games()
                    .filter(|g| g.attempts == attempts)
                    .count();
                Progress::new(count_u32(hits), times)
            }
            Self::Milestone(Milestone::WonWithin {
                max_attempts,
                times,
            }) => {
                let hits = history
                    .won_games()
                    .filter(|g| g.attempts <= max_attempts)
                    .count();
                Progress::new(count_u32(hits), times)
            }
            Self::Milestone(Milestone::WonAcross { attribute, values }) => {
                let won = won_values(history, Some(attribute));
                let hits = values.iter().filter(|v| won.contains(*v)).count();
                Progress::new(count_u32(hits), count_u32(values.len()))
            }
            Self::Milestone(Milestone::DistinctAcross { attribute, count }) => {
                let distinct = won_values(history, Some(attribute)).len();
                Progress::new(count_u32(distinct), count)
            }
            Self::Milestone(Milestone::Played { games }) => {
                Progress::new(history.total_games(), games)
            }
        }
    }
}

/// Static description of a trophy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrophyDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub rule: TrophyRule,
}

impl TrophyDef {
    fn new(
        id: impl Into<String>,
        name: &str,
        description: impl Into<String>,
        emoji: &str,
        rule: TrophyRule,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            description: description.into(),
            emoji: emoji.to_string(),
            rule,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: u32,
    pub required: u32,
}

impl Progress {
    #[must_use]
    pub const fn new(current: u32, required: u32) -> Self {
        Self { current, required }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current >= self.required
    }
}

/// Derived state of one trophy for a history snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trophy {
    pub id: String,
    pub category: TrophyCategory,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
}

/// Unlocked/total counts for a group of trophies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrophySummary {
    pub unlocked: usize,
    pub total: usize,
    pub percent: u32,
}

impl TrophySummary {
    fn tally<'a>(trophies: impl IntoIterator<Item = &'a Trophy>) -> Self {
        let (unlocked, total) = trophies
            .into_iter()
            .fold((0, 0), |(u, t), trophy| (u + usize::from(trophy.unlocked), t + 1));
        Self {
            unlocked,
            total,
            percent: percent(unlocked, total),
        }
    }
}

/// Ordered set of trophy definitions.
#[derive(Debug, Clone)]
pub struct AchievementEngine {
    defs: Vec<TrophyDef>,
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl AchievementEngine {
    #[must_use]
    pub const fn new(defs: Vec<TrophyDef>) -> Self {
        Self { defs }
    }

    /// The shipped trophy book: both ladders followed by the milestones.
    #[must_use]
    pub fn standard() -> Self {
        let streak_names = [
            ("Hot Streak", "🔥"),
            ("Week of Wizardry", "🪄"),
            ("Fortnight Phoenix", "🐦‍🔥"),
            ("Moonlit Month", "🌕"),
            ("Seasoned Seer", "🔮"),
            ("Half-Year Hallows", "⏳"),
            ("Year of Magic", "👑"),
        ];
        let win_names = [
            ("First Victory", "🏆"),
            ("Hat Trick", "🎩"),
            ("High Five", "🖐️"),
            ("Perfect Ten", "🔟"),
            ("Quarter Century", "🥉"),
            ("Half Century", "🥈"),
            ("Centurion", "🥇"),
            ("Grandmaster", "🧙"),
        ];

        let mut defs = Vec::new();
        for (threshold, (name, emoji)) in STREAK_THRESHOLDS.into_iter().zip(streak_names) {
            defs.push(TrophyDef::new(
                format!("streak_{threshold}"),
                name,
                format!("Win {threshold} days in a row"),
                emoji,
                TrophyRule::Streak { threshold },
            ));
        }
        for (threshold, (name, emoji)) in TOTAL_WIN_THRESHOLDS.into_iter().zip(win_names) {
            let description = if threshold == 1 {
                "Win your first game".to_string()
            } else {
                format!("Win {threshold} games")
            };
            defs.push(TrophyDef::new(
                format!("wins_{threshold}"),
                name,
                description,
                emoji,
                TrophyRule::TotalWins { threshold },
            ));
        }

        let group = |members| TrophyRule::Milestone(Milestone::WonAll { members });
        defs.extend([
            TrophyDef::new(
                "golden_trio",
                "Golden Trio",
                "Solve Harry, Hermione and Ron",
                "⚡",
                group(GOLDEN_TRIO),
            ),
            TrophyDef::new(
                "weasley_family",
                "Burrow Regular",
                "Solve every Weasley",
                "🏠",
                group(WEASLEY_FAMILY),
            ),
            TrophyDef::new(
                "marauders",
                "Mischief Managed",
                "Solve all four Marauders",
                "🗺️",
                group(MARAUDERS),
            ),
            TrophyDef::new(
                "heads_of_house",
                "Staff Room",
                "Solve every Head of House",
                "🎓",
                group(HEADS_OF_HOUSE),
            ),
            TrophyDef::new(
                "malfoy_family",
                "Manor Guest",
                "Solve every Malfoy",
                "🐍",
                group(MALFOY_FAMILY),
            ),
            TrophyDef::new(
                "dark_forces",
                "Defence Against the Dark Arts",
                "Solve the darkest wizards",
                "💀",
                group(DARK_FORCES),
            ),
            TrophyDef::new(
                "perfect_game",
                "Perfect Game",
                "Win a game in 1 guess",
                "🎯",
                TrophyRule::Milestone(Milestone::WonInAttempts { attempts: 1, times: 1 }),
            ),
            TrophyDef::new(
                "photo_finish",
                "Photo Finish",
                "Win on the final guess 3 times",
                "😅",
                TrophyRule::Milestone(Milestone::WonInAttempts { attempts: 7, times: 3 }),
            ),
            TrophyDef::new(
                "efficient_solver",
                "Efficient Solver",
                "Win 5 games in 3 guesses or less",
                "⏱️",
                TrophyRule::Milestone(Milestone::WonWithin {
                    max_attempts: 3,
                    times: 5,
                }),
            ),
            TrophyDef::new(
                "master_detective",
                "Master Detective",
                "Win 10 games in 2 guesses or less",
                "🕵️",
                TrophyRule::Milestone(Milestone::WonWithin {
                    max_attempts: 2,
                    times: 10,
                }),
            ),
            TrophyDef::new(
                "house_explorer",
                "House Explorer",
                "Solve characters from all four Hogwarts houses",
                "🏰",
                TrophyRule::Milestone(Milestone::WonAcross {
                    attribute: Attribute::House,
                    values: HOGWARTS_HOUSES,
                }),
            ),
            TrophyDef::new(
                "species_expert",
                "Species Expert",
                "Solve characters of 5 different species",
                "🦄",
                TrophyRule::Milestone(Milestone::DistinctAcross {
                    attribute: Attribute::Species,
                    count: 5,
                }),
            ),
            TrophyDef::new(
                "first_game",
                "First Game",
                "Finish your first game",
                "🎮",
                TrophyRule::Milestone(Milestone::Played { games: 1 }),
            ),
            TrophyDef::new(
                "dedicated_player",
                "Dedicated Player",
                "Finish 50 games",
                "📅",
                TrophyRule::Milestone(Milestone::Played { games: 50 }),
            ),
            TrophyDef::new(
                "persistent_solver",
                "Persistent Solver",
                "Finish 100 games",
                "💪",
                TrophyRule::Milestone(Milestone::Played { games: 100 }),
            ),
        ]);
        Self::new(defs)
    }

    #[must_use]
    pub fn definitions(&self) -> &[TrophyDef] {
        &self.defs
    }

    /// Derive every trophy's state from `history`.
    ///
    /// Within each ladder only the lowest locked rung carries progress; every
    /// locked milestone carries its own.
    #[must_use]
    pub fn evaluate(&self, history: &HistoryAggregate) -> Vec<Trophy> {
        let mut progressed: HashSet<TrophyCategory> = HashSet::new();
        let mut ladder: Vec<&TrophyDef> = self.defs.iter().collect();
        ladder.sort_by_key(|def| match def.rule {
            TrophyRule::Streak { threshold } | TrophyRule::TotalWins { threshold } => threshold,
            TrophyRule::Milestone(_) => 0,
        });
        let mut exposes: HashSet<&str> = HashSet::new();
        for def in ladder {
            let category = def.rule.category();
            if !category.is_ladder() || def.rule.measure(history).is_complete() {
                continue;
            }
            if progressed.insert(category) {
                exposes.insert(def.id.as_str());
            }
        }

        self.defs
            .iter()
            .map(|def| {
                let category = def.rule.category();
                let measured = def.rule.measure(history);
                let unlocked = measured.is_complete();
                let progress = (!unlocked
                    && (!category.is_ladder() || exposes.contains(def.id.as_str())))
                .then_some(measured);
                Trophy {
                    id: def.id.clone(),
                    category,
                    unlocked,
                    progress,
                    name: def.name.clone(),
                    description: def.description.clone(),
                    emoji: def.emoji.clone(),
                }
            })
            .collect()
    }

    /// Named members of a group milestone paired with whether each has been
    /// won. `None` for unknown ids and non-group trophies.
    #[must_use]
    pub fn member_checklist(
        &self,
        id: &str,
        history: &HistoryAggregate,
    ) -> Option<Vec<(&'static str, bool)>> {
        let def = self.defs.iter().find(|d| d.id == id)?;
        let TrophyRule::Milestone(Milestone::WonAll { members }) = def.rule else {
            return None;
        };
        let won = won_values(history, None);
        Some(members.iter().map(|m| (*m, won.contains(*m))).collect())
    }
}

/// Trophies unlocked in `current` that were not unlocked in `previous`.
///
/// An empty `previous` means no baseline exists, so every unlocked trophy is
/// reported.
#[must_use]
pub fn newly_unlocked(previous: &[Trophy], current: &[Trophy]) -> Vec<Trophy> {
    let before: HashSet<&str> = previous
        .iter()
        .filter(|t| t.unlocked)
        .map(|t| t.id.as_str())
        .collect();
    current
        .iter()
        .filter(|t| t.unlocked && !before.contains(t.id.as_str()))
        .cloned()
        .collect()
}

/// Overall summary followed by one summary per category.
#[must_use]
pub fn summarize(trophies: &[Trophy]) -> (TrophySummary, Vec<(TrophyCategory, TrophySummary)>) {
    let overall = TrophySummary::tally(trophies);
    let per_category = TrophyCategory::ALL
        .into_iter()
        .map(|category| {
            (
                category,
                TrophySummary::tally(trophies.iter().filter(|t| t.category == category)),
            )
        })
        .collect();
    (overall, per_category)
}

/// Names of won mysteries, or their `attribute` values when given.
fn won_values(history: &HistoryAggregate, attribute: Option<Attribute>) -> HashSet<&str> {
    history
        .won_games()
        .map(|g| match attribute {
            Some(attr) => g.mystery.attribute(attr),
            None => g.mystery.name.as_str(),
        })
        .collect()
}

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::history::fixtures::{record, record_named};

    fn wins(n: u32) -> HistoryAggregate {
        // alternate losses in so streaks stay at 1
        HistoryAggregate::from_records((0..n * 2).map(|i| record(i, i % 2 == 0)))
    }

    fn trophy<'a>(trophies: &'a [Trophy], id: &str) -> &'a Trophy {
        trophies.iter().find(|t| t.id == id).unwrap()
    }

    fn stub(id: &str, unlocked: bool) -> Trophy {
        Trophy {
            id: id.to_string(),
            category: TrophyCategory::Milestone,
            unlocked,
            progress: None,
            name: String::new(),
            description: String::new(),
            emoji: String::new(),
        }
    }

    #[test]
    fn wins_ladder_boundary() {
        let engine = AchievementEngine::standard();
        let at_four = engine.evaluate(&wins(4));
        let five = trophy(&at_four, "wins_5");
        assert!(!five.unlocked);
        assert_eq!(five.progress, Some(Progress::new(4, 5)));
        assert!(trophy(&at_four, "wins_3").unlocked);
        assert_eq!(trophy(&at_four, "wins_10").progress, None);

        let at_five = engine.evaluate(&wins(5));
        assert!(trophy(&at_five, "wins_5").unlocked);
        assert_eq!(trophy(&at_five, "wins_5").progress, None);
        assert_eq!(trophy(&at_five, "wins_10").progress, Some(Progress::new(5, 10)));
    }

    #[test]
    fn only_lowest_locked_rung_reports_progress() {
        let engine = AchievementEngine::standard();
        let trophies = engine.evaluate(&HistoryAggregate::new());
        let streak_progress: Vec<&str> = trophies
            .iter()
            .filter(|t| t.category == TrophyCategory::Streak && t.progress.is_some())
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(streak_progress, vec!["streak_3"]);
        assert!(
            trophies
                .iter()
                .filter(|t| t.category == TrophyCategory::Milestone)
                .all(|t| t.progress.is_some())
        );
    }

    #[test]
    fn streak_ladder_uses_max_streak() {
        let history = HistoryAggregate::from_records((0..4).map(|i| record(i, i != 3)));
        let trophies = AchievementEngine::standard().evaluate(&history);
        assert!(trophy(&trophies, "streak_3").unlocked);
        assert_eq!(trophy(&trophies, "streak_7").progress, Some(Progress::new(3, 7)));
    }

    #[test]
    fn group_milestone_progress_and_checklist() {
        let engine = AchievementEngine::standard();
        let history = HistoryAggregate::from_records([
            record_named(0, "Harry Potter", "Gryffindor", 2, true),
            record_named(1, "Ron Weasley", "Gryffindor", 4, true),
            record_named(2, "Hermione Granger", "Gryffindor", 4, false),
        ]);
        let trophies = engine.evaluate(&history);
        let trio = trophy(&trophies, "golden_trio");
        assert!(!trio.unlocked);
        assert_eq!(trio.progress, Some(Progress::new(2, 3)));
        assert_eq!(
            engine.member_checklist("golden_trio", &history).unwrap(),
            vec![
                ("Harry Potter", true),
                ("Hermione Granger", false),
                ("Ron Weasley", true)
            ]
        );
        assert!(engine.member_checklist("perfect_game", &history).is_none());
        assert_eq!(
            trophy(&trophies, "weasley_family").progress,
            Some(Progress::new(1, 9))
        );
    }

    #[test]
    fn attempt_milestones_require_exact_counts() {
        let engine = AchievementEngine::standard();
        let history = HistoryAggregate::from_records([
            record_named(0, "Harry Potter", "Gryffindor", 1, true),
            record_named(1, "Draco Malfoy", "Slytherin", 7, true),
            record_named(2, "Luna Lovegood", "Ravenclaw", 7, true),
            record_named(3, "Cho Chang", "Ravenclaw", 7, false),
            record_named(4, "Cedric Diggory", "Hufflepuff", 6, true),
        ]);
        let trophies = engine.evaluate(&history);
        assert!(trophy(&trophies, "perfect_game").unlocked);
        assert_eq!(
            trophy(&trophies, "photo_finish").progress,
            Some(Progress::new(2, 3))
        );
        assert!(trophy(&trophies, "house_explorer").unlocked);
        assert_eq!(
            trophy(&trophies, "efficient_solver").progress,
            Some(Progress::new(1, 5))
        );
    }

    #[test]
    fn accuracy_milestones_count_wins_within_limit() {
        let engine = AchievementEngine::standard();
        let quick = |n: u32, attempts: u32| {
            HistoryAggregate::from_records(
                (0..n).map(|i| record_named(i, "Harry Potter", "Gryffindor", attempts, true)),
            )
        };

        let four = engine.evaluate(&quick(4, 2));
        assert_eq!(
            trophy(&four, "efficient_solver").progress,
            Some(Progress::new(4, 5))
        );
        assert_eq!(
            trophy(&four, "master_detective").progress,
            Some(Progress::new(4, 10))
        );

        let five = engine.evaluate(&quick(5, 3));
        assert!(trophy(&five, "efficient_solver").unlocked);
        assert_eq!(
            trophy(&five, "master_detective").progress,
            Some(Progress::new(0, 10))
        );

        let ten = engine.evaluate(&quick(10, 2));
        assert!(trophy(&ten, "master_detective").unlocked);
        assert_eq!(trophy(&ten, "master_detective").progress, None);
    }

    #[test]
    fn species_expert_counts_distinct_species() {
        let engine = AchievementEngine::standard();
        let game_of = |offset: u32, species: &str, won: bool| {
            let mut game = record_named(offset, "Harry Potter", "Gryffindor", 3, won);
            game.mystery.species = species.to_string();
            game
        };
        let mut records = vec![
            game_of(0, "Human", true),
            game_of(1, "Human", true),
            game_of(2, "Human/Giant", true),
            game_of(3, "Human/Goblin", true),
            game_of(4, "Part-veela", true),
            game_of(5, "Human/Werewolf", false),
        ];
        let four = engine.evaluate(&HistoryAggregate::from_records(records.clone()));
        assert_eq!(
            trophy(&four, "species_expert").progress,
            Some(Progress::new(4, 5))
        );

        records.push(game_of(6, "Human/Werewolf", true));
        let five = engine.evaluate(&HistoryAggregate::from_records(records));
        assert!(trophy(&five, "species_expert").unlocked);
    }

    #[test]
    fn played_milestones_count_losses_too() {
        let engine = AchievementEngine::standard();
        let history = HistoryAggregate::from_records((0..3).map(|i| record(i, false)));
        let trophies = engine.evaluate(&history);
        assert!(trophy(&trophies, "first_game").unlocked);
        assert_eq!(
            trophy(&trophies, "dedicated_player").progress,
            Some(Progress::new(3, 50))
        );
        assert!(!trophy(&trophies, "wins_1").unlocked);
    }

    #[test]
    fn newly_unlocked_uses_baseline() {
        let t1 = stub("t1", true);
        let t2_locked = stub("t2", false);
        let t2 = stub("t2", true);
        assert_eq!(
            newly_unlocked(&[], &[t1.clone(), t2_locked.clone()]),
            vec![t1.clone()]
        );
        assert_eq!(
            newly_unlocked(&[t1.clone()], &[t1.clone(), t2.clone()]),
            vec![t2]
        );
        assert!(newly_unlocked(&[t1.clone(), t2_locked.clone()], &[t1, t2_locked]).is_empty());
    }

    #[test]
    fn summaries_tally_by_category() {
        let trophies = AchievementEngine::standard().evaluate(&wins(5));
        let (overall, per_category) = summarize(&trophies);
        assert_eq!(overall.total, 30);
        // three win rungs, first_game and efficient_solver
        assert_eq!(overall.unlocked, 5);
        assert_eq!(overall.percent, 17);
        let victories = per_category
            .iter()
            .find(|(c, _)| *c == TrophyCategory::TotalWins)
            .unwrap()
            .1;
        assert_eq!(victories.unlocked, 3);
        assert_eq!(victories.total, 8);
    }

    #[test]
    fn group_members_exist_in_bundled_catalog() {
        let catalog = Catalog::bundled().unwrap();
        for group in [
            GOLDEN_TRIO,
            WEASLEY_FAMILY,
            MARAUDERS,
            HEADS_OF_HOUSE,
            MALFOY_FAMILY,
            DARK_FORCES,
        ] {
            for name in group {
                assert!(catalog.find(name).is_some(), "{name} missing from catalog");
            }
        }
        for house in HOGWARTS_HOUSES {
            assert!(catalog.entities().iter().any(|e| e.house == *house));
        }
    }

    #[test]
    fn ids_are_unique() {
        let engine = AchievementEngine::standard();
        let ids: HashSet<&str> = engine.definitions().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), engine.definitions().len());
    }
}
