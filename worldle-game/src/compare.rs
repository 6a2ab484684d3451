//! Per-attribute comparison between a guess and the mystery entity.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{Attribute, Entity};
use crate::constants::MULTI_VALUE_DELIMITER;

/// Outcome for one attribute of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Partial,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeVerdict {
    pub attribute: Attribute,
    pub verdict: Verdict,
}

/// Verdicts for all five attributes, in schema order.
pub type Verdicts = [AttributeVerdict; 5];

/// Compare every attribute of `guess` against `mystery`.
#[must_use]
pub fn compare(guess: &Entity, mystery: &Entity) -> Verdicts {
    Attribute::ALL.map(|attribute| AttributeVerdict {
        attribute,
        verdict: compare_attribute(
            attribute,
            guess.attribute(attribute),
            mystery.attribute(attribute),
        ),
    })
}

/// Compare a single attribute value.
#[must_use]
pub fn compare_attribute(attribute: Attribute, guess: &str, mystery: &str) -> Verdict {
    if guess == mystery {
        return Verdict::Correct;
    }
    if attribute.is_multi_valued() && components_overlap(guess, mystery) {
        return Verdict::Partial;
    }
    Verdict::Incorrect
}

/// A guess wins only on key equality; matching attributes are not enough.
#[must_use]
pub fn is_win(guess: &Entity, mystery: &Entity) -> bool {
    guess.same_key(mystery)
}

fn components(value: &str) -> SmallVec<[String; 2]> {
    value
        .split(MULTI_VALUE_DELIMITER)
        .map(str::to_lowercase)
        .collect()
}

fn components_overlap(guess: &str, mystery: &str) -> bool {
    let mystery_parts = components(mystery);
    components(guess)
        .iter()
        .any(|part| mystery_parts.contains(part))
}
