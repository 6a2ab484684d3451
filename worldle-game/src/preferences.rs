use serde::{Deserialize, Serialize};

/// Player-level display flags, persisted verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

impl Preferences {
    #[must_use]
    pub const fn toggled_dark_mode(self) -> Self {
        Self {
            dark_mode: !self.dark_mode,
        }
    }
}
