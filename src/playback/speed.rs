use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RecorderError;

/// Supported playback rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Half,
    #[default]
    Normal,
    OneAndHalf,
    Double,
}

impl PlaybackSpeed {
    /// All speeds in the order the speed picker shows them
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::OneAndHalf,
        PlaybackSpeed::Double,
    ];

    pub fn rate(self) -> f32 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }
}

impl TryFrom<f32> for PlaybackSpeed {
    type Error = RecorderError;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|speed| speed.rate() == rate)
            .ok_or(RecorderError::InvalidSpeed(rate))
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_accepts_supported_rates() {
        for speed in PlaybackSpeed::ALL {
            assert_eq!(PlaybackSpeed::try_from(speed.rate()).ok(), Some(speed));
        }
    }

    #[test]
    fn test_try_from_rejects_other_rates() {
        for rate in [0.0, 0.75, 1.25, 3.0, -1.0] {
            assert!(matches!(
                PlaybackSpeed::try_from(rate),
                Err(RecorderError::InvalidSpeed(r)) if r == rate
            ));
        }
    }

    #[test]
    fn test_display_matches_picker_labels() {
        let labels: Vec<String> = PlaybackSpeed::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, ["0.5x", "1x", "1.5x", "2x"]);
    }
}
