//! Well-known storage keys and the media slots stored under them.

use crate::catalog::TierId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Prefix every stored media value must carry.
pub const DATA_URI_PREFIX: &str = "data:";

/// Durable key-value storage keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Tier inventory (`Vec<PrizeTier>`).
    Prizes,
    /// Drawn tickets in draw order (`DrawnSet`).
    DrawnNumbers,
    /// Ticket mapping for the current epoch (`TicketAssignment`).
    AssignedNumbers,
    Background,
    Music,
    Sound(TierId),
}

impl Key {
    /// Keys holding engine state. Cleared on reset.
    pub const ENGINE: [Key; 3] = [Key::Prizes, Key::DrawnNumbers, Key::AssignedNumbers];

    pub fn name(&self) -> String {
        match self {
            Key::Prizes => "draw_prizes".to_string(),
            Key::DrawnNumbers => "draw_drawn_numbers".to_string(),
            Key::AssignedNumbers => "draw_assigned_numbers".to_string(),
            Key::Background => "draw_bg".to_string(),
            Key::Music => "draw_music".to_string(),
            Key::Sound(tier) => format!("draw_sound_{}", tier.as_str()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// User-supplied media, kept as data URIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSlot {
    Background,
    Music,
    Sound(TierId),
}

impl MediaSlot {
    pub fn key(&self) -> Key {
        match self {
            MediaSlot::Background => Key::Background,
            MediaSlot::Music => Key::Music,
            MediaSlot::Sound(tier) => Key::Sound(*tier),
        }
    }
}

impl std::str::FromStr for MediaSlot {
    type Err = MediaError;

    /// Accepts `bg`, `music`, or a tier name for that tier's win sound.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bg" | "background" => Ok(MediaSlot::Background),
            "music" => Ok(MediaSlot::Music),
            other => other
                .parse::<TierId>()
                .map(MediaSlot::Sound)
                .map_err(|_| MediaError::UnknownSlot {
                    value: s.to_string(),
                }),
        }
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("unknown media slot: {value}")]
    UnknownSlot { value: String },
    #[error("media for {slot:?} must be a data URI")]
    NotDataUri { slot: MediaSlot },
}

/// Check a value is storable in a media slot.
pub fn validate_media(slot: MediaSlot, value: &str) -> Result<(), MediaError> {
    if value.starts_with(DATA_URI_PREFIX) {
        Ok(())
    } else {
        Err(MediaError::NotDataUri { slot })
    }
}
