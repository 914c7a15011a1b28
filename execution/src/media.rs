//! Custom media: background image, background music and per-tier win sounds.
//!
//! Values are data URIs stored verbatim (not JSON) under their slot's key.
//! Media is not engine state and survives a reset.

use anyhow::{Context as _, Result};
use luckywheel_types::{validate_media, MediaSlot, TierId};
use std::collections::BTreeMap;
use tracing::warn;

use crate::persistence::{Status, Store};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Media {
    background: Option<String>,
    music: Option<String>,
    sounds: BTreeMap<TierId, String>,
}

impl Media {
    /// Every slot that can hold media.
    pub fn slots() -> impl Iterator<Item = MediaSlot> {
        [MediaSlot::Background, MediaSlot::Music]
            .into_iter()
            .chain(TierId::ALL.into_iter().map(MediaSlot::Sound))
    }

    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let mut media = Media::default();
        for slot in Self::slots() {
            let key = slot.key();
            let Some(value) = store.get(&key).with_context(|| format!("read {key}"))? else {
                continue;
            };
            if let Err(err) = validate_media(slot, &value) {
                warn!(%key, %err, "ignoring stored media");
                continue;
            }
            media.set(slot, value);
        }
        Ok(media)
    }

    /// Delete every stored media value.
    pub fn clear<S: Store + ?Sized>(store: &mut S) -> Result<()> {
        store
            .apply(Self::slots().map(|slot| (slot.key(), Status::Delete)).collect())
            .context("clear media")
    }

    pub fn get(&self, slot: MediaSlot) -> Option<&str> {
        match slot {
            MediaSlot::Background => self.background.as_deref(),
            MediaSlot::Music => self.music.as_deref(),
            MediaSlot::Sound(tier) => self.sounds.get(&tier).map(String::as_str),
        }
    }

    /// Win sound to play when `tier` is revealed.
    pub fn sound_for(&self, tier: TierId) -> Option<&str> {
        self.get(MediaSlot::Sound(tier))
    }

    pub(crate) fn set(&mut self, slot: MediaSlot, value: String) {
        match slot {
            MediaSlot::Background => self.background = Some(value),
            MediaSlot::Music => self.music = Some(value),
            MediaSlot::Sound(tier) => {
                self.sounds.insert(tier, value);
            }
        }
    }

    pub(crate) fn unset(&mut self, slot: MediaSlot) {
        match slot {
            MediaSlot::Background => self.background = None,
            MediaSlot::Music => self.music = None,
            MediaSlot::Sound(tier) => {
                self.sounds.remove(&tier);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Memory;
    use luckywheel_types::Key;

    #[test]
    fn test_load_reads_every_slot() {
        let mut store = Memory::default();
        store
            .insert(Key::Background, "data:image/png;base64,AA".to_string())
            .unwrap();
        store
            .insert(Key::Sound(TierId::Third), "data:audio/wav;base64,BB".to_string())
            .unwrap();

        let media = Media::load(&store).unwrap();
        assert_eq!(
            media.get(MediaSlot::Background),
            Some("data:image/png;base64,AA")
        );
        assert_eq!(media.get(MediaSlot::Music), None);
        assert_eq!(
            media.sound_for(TierId::Third),
            Some("data:audio/wav;base64,BB")
        );
        assert_eq!(media.sound_for(TierId::First), None);
    }

    #[test]
    fn test_load_skips_non_data_uris() {
        let mut store = Memory::default();
        store.insert(Key::Music, "/tmp/song.mp3".to_string()).unwrap();
        let media = Media::load(&store).unwrap();
        assert_eq!(media, Media::default());
    }

    #[test]
    fn test_slots_cover_all_tiers() {
        assert_eq!(Media::slots().count(), 2 + TierId::ALL.len());
    }

    #[test]
    fn test_clear_removes_every_slot() {
        let mut store = Memory::default();
        for slot in Media::slots() {
            store
                .insert(slot.key(), "data:image/png;base64,AA".to_string())
                .unwrap();
        }
        store.insert(Key::Prizes, "[]".to_string()).unwrap();

        Media::clear(&mut store).unwrap();
        assert_eq!(Media::load(&store).unwrap(), Media::default());
        for slot in Media::slots() {
            assert_eq!(store.get(&slot.key()).unwrap(), None);
        }
        assert!(store.get(&Key::Prizes).unwrap().is_some());
    }

    #[test]
    fn test_unset_slot() {
        let mut media = Media::default();
        media.set(MediaSlot::Music, "data:audio/mpeg;base64,AA".to_string());
        media.set(MediaSlot::Sound(TierId::First), "data:audio/wav;base64,BB".to_string());
        media.unset(MediaSlot::Sound(TierId::First));
        assert_eq!(media.sound_for(TierId::First), None);
        assert!(media.get(MediaSlot::Music).is_some());
    }
}
