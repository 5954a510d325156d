use serde::{Deserialize, Serialize};

use crate::chart::arrangement::InstrumentalArrangement;
use crate::chart::xml::secs;
use crate::config::limits::TONE_SLOTS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneChange {
    #[serde(rename = "@time", with = "secs")]
    pub time: i32,
    #[serde(rename = "@id", default)]
    pub id: u8,
    #[serde(rename = "@name")]
    pub name: String,
}

impl ToneChange {
    pub fn new(name: impl Into<String>, time: i32, id: u8) -> Self {
        Self {
            time,
            id,
            name: name.into(),
        }
    }
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.is_empty())
}

impl InstrumentalArrangement {
    pub fn base_tone(&self) -> Option<&str> {
        non_empty(&self.tone_base)
    }

    /// The four alternate tone slots (A-D); empty names read as `None`.
    pub fn tone_slots(&self) -> [Option<&str>; TONE_SLOTS] {
        [
            non_empty(&self.tone_a),
            non_empty(&self.tone_b),
            non_empty(&self.tone_c),
            non_empty(&self.tone_d),
        ]
    }

    pub(crate) fn tone_slot_mut(&mut self, slot: usize) -> &mut Option<String> {
        match slot {
            0 => &mut self.tone_a,
            1 => &mut self.tone_b,
            2 => &mut self.tone_c,
            _ => &mut self.tone_d,
        }
    }

    pub fn tone_slot_of(&self, name: &str) -> Option<usize> {
        self.tone_slots().iter().position(|slot| *slot == Some(name))
    }

    /// Slot holding `name`, claiming the first empty slot if needed.
    ///
    /// Returns `None` when the name is new and every slot is taken.
    pub fn claim_tone_slot(&mut self, name: &str) -> Option<usize> {
        if let Some(slot) = self.tone_slot_of(name) {
            return Some(slot);
        }
        let free = self.tone_slots().iter().position(Option::is_none)?;
        *self.tone_slot_mut(free) = Some(name.to_string());
        Some(free)
    }

    /// Name of the tone in effect at the end of the arrangement.
    pub fn current_tone(&self) -> Option<&str> {
        self.tone_changes
            .last()
            .map(|t| t.name.as_str())
            .or_else(|| self.base_tone())
    }
}
