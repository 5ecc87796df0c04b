use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dhikr {
    SubhanAllah,
    Alhamdulillah,
    AllahuAkbar,
}

impl Dhikr {
    pub const ALL: [Dhikr; 3] = [Dhikr::SubhanAllah, Dhikr::Alhamdulillah, Dhikr::AllahuAkbar];

    pub fn id(&self) -> &'static str {
        match self {
            Dhikr::SubhanAllah => "subhanallah",
            Dhikr::Alhamdulillah => "alhamdulillah",
            Dhikr::AllahuAkbar => "allahuakbar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dhikr::SubhanAllah => "SubhanAllah",
            Dhikr::Alhamdulillah => "Alhamdulillah",
            Dhikr::AllahuAkbar => "Allahu Akbar",
        }
    }
}

impl std::fmt::Display for Dhikr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Dhikr {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Dhikr::ALL
            .into_iter()
            .find(|d| d.id() == normalized)
            .ok_or_else(|| EngineError::UnknownDhikr(s.to_string()))
    }
}

/// Persisted tally: the running count and which dhikr it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasbeehState {
    #[serde(default)]
    pub count: u32,
    #[serde(default = "default_dhikr", rename = "selectedDhikr")]
    pub selected: Dhikr,
}

fn default_dhikr() -> Dhikr {
    Dhikr::SubhanAllah
}

impl Default for TasbeehState {
    fn default() -> Self {
        Self {
            count: 0,
            selected: default_dhikr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_ids() {
        assert_eq!("Allahu Akbar".parse::<Dhikr>().unwrap(), Dhikr::AllahuAkbar);
        assert_eq!("alhamdulillah".parse::<Dhikr>().unwrap(), Dhikr::Alhamdulillah);
        assert!("astaghfirullah".parse::<Dhikr>().is_err());
    }

    #[test]
    fn state_defaults_when_fields_missing() {
        let state: TasbeehState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, TasbeehState::default());
    }
}
