use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ArrangementEntry, ArrangementType, Track};

/// Base tone plus the four alternate tones.
pub const COMMON_TONE_COUNT: usize = 5;

/// Common tone names shared by every track of one arrangement kind.
///
/// Index 0 is the base tone. Owned by a `Project` and passed to whatever
/// needs it during one combination session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneContext {
    tones: BTreeMap<ArrangementType, [String; COMMON_TONE_COUNT]>,
}

impl ToneContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common_tones(&self, kind: ArrangementType) -> Option<&[String; COMMON_TONE_COUNT]> {
        self.tones.get(&kind)
    }

    /// Common base tone of `kind`, if one is set.
    pub fn base_tone(&self, kind: ArrangementType) -> Option<&str> {
        self.tones
            .get(&kind)
            .map(|names| names[0].as_str())
            .filter(|name| !name.is_empty())
    }

    /// Replace the common tones of `kind`.
    ///
    /// Every tone replacement in `tracks` that pointed at a renamed common
    /// tone is updated to the new name.
    pub fn set_common_tones(
        &mut self,
        kind: ArrangementType,
        names: [String; COMMON_TONE_COUNT],
        tracks: &mut [Track],
    ) {
        if let Some(old) = self.tones.get(&kind).cloned() {
            for (old, new) in old.iter().zip(&names) {
                if old != new && !old.is_empty() {
                    rename_replacements(kind, old, new, tracks);
                }
            }
        }
        self.tones.insert(kind, names);
    }

    /// Rename one common tone of `kind` and every replacement targeting it.
    ///
    /// Returns false when `old` is not a common tone of `kind`.
    pub fn rename_common_tone(
        &mut self,
        kind: ArrangementType,
        old: &str,
        new: &str,
        tracks: &mut [Track],
    ) -> bool {
        let Some(slot) = self
            .tones
            .get_mut(&kind)
            .and_then(|names| names.iter_mut().find(|n| n.as_str() == old))
        else {
            return false;
        };
        *slot = new.to_string();
        rename_replacements(kind, old, new, tracks);
        true
    }
}

fn rename_replacements(kind: ArrangementType, old: &str, new: &str, tracks: &mut [Track]) {
    let entries = tracks.iter_mut().flat_map(|t| t.arrangements.iter_mut());
    for entry in entries {
        if let ArrangementEntry::Instrumental {
            kind: entry_kind,
            tone_replacements,
            ..
        } = entry
            && *entry_kind == kind
        {
            for target in tone_replacements.values_mut() {
                if target == old {
                    *target = new.to_string();
                }
            }
        }
    }
}
