//! Tone palette reconciliation across segments.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::CombineWarning;
use crate::chart::{InstrumentalArrangement, ToneChange};

/// Append `next`'s tone timeline to `combined`, shifted by `start_time`.
///
/// A change to `next`'s base tone is synthesized at its first beat whenever
/// the segment switches tones or starts on a different tone than the one
/// in effect at the join point. New names claim free palette slots; names
/// that do not fit are kept in the timeline and reported as warnings.
pub fn merge_tone_timeline(
    combined: &mut InstrumentalArrangement,
    next: &mut InstrumentalArrangement,
    start_time: i32,
    warnings: &mut Vec<CombineWarning>,
) {
    let current = combined.current_tone().map(str::to_owned);
    let next_base = next.base_tone().map(str::to_owned);

    if next.tone_changes.is_empty() && current == next_base {
        return;
    }

    if let Some(base) = &next_base {
        next.tone_changes
            .insert(0, ToneChange::new(base.clone(), next.start_beat, 0));
    }

    // A tone switch needs the tone in effect before it to be switchable back to.
    if combined.tone_changes.is_empty()
        && let Some(base) = combined.base_tone().map(str::to_owned)
    {
        claim_or_warn(combined, &base, start_time, warnings);
    }

    for mut change in next.tone_changes.drain(..) {
        change.time += start_time;
        let slot = claim_or_warn(combined, &change.name, change.time, warnings);
        change.id = slot.unwrap_or(0) as u8;
        combined.tone_changes.push(change);
    }
}

fn claim_or_warn(
    combined: &mut InstrumentalArrangement,
    name: &str,
    time: i32,
    warnings: &mut Vec<CombineWarning>,
) -> Option<usize> {
    let slot = combined.claim_tone_slot(name);
    if slot.is_none() {
        warn!("Too many tones, cannot fit tone '{}' into the palette", name);
        warnings.push(CombineWarning::ToneCapacity {
            tone: name.to_string(),
            time,
        });
    }
    slot
}

/// Drop changes to tones outside the palette and collapse consecutive
/// changes to the same tone.
pub fn cleanup_tone_changes(arr: &mut InstrumentalArrangement) {
    let slots: Vec<String> = arr
        .tone_slots()
        .iter()
        .flatten()
        .map(|s| s.to_string())
        .collect();

    let before = arr.tone_changes.len();
    arr.tone_changes.retain(|t| slots.contains(&t.name));
    arr.tone_changes.dedup_by(|b, a| a.name == b.name);

    let removed = before - arr.tone_changes.len();
    if removed > 0 {
        debug!("Removed {} redundant tone changes", removed);
    }
}

/// Rename tones through `replacements` (old name to new name).
///
/// The base tone, the palette and every tone change are renamed. Slots B-D
/// are then repacked so that each name appears once and none repeats slot A.
pub fn replace_tone_names(
    arr: &mut InstrumentalArrangement,
    replacements: &BTreeMap<String, String>,
) {
    let rename = |name: &mut Option<String>| {
        if let Some(new) = name.as_deref().and_then(|n| replacements.get(n)) {
            *name = Some(new.clone());
        }
    };
    rename(&mut arr.tone_base);
    rename(&mut arr.tone_a);
    rename(&mut arr.tone_b);
    rename(&mut arr.tone_c);
    rename(&mut arr.tone_d);

    for change in &mut arr.tone_changes {
        if let Some(new) = replacements.get(&change.name) {
            change.name = new.clone();
        }
    }

    let slot_a = arr.tone_a.clone();
    let mut unique: Vec<String> = Vec::new();
    for name in [arr.tone_b.take(), arr.tone_c.take(), arr.tone_d.take()]
        .into_iter()
        .flatten()
    {
        if !name.is_empty() && Some(&name) != slot_a.as_ref() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    let mut unique = unique.into_iter();
    arr.tone_b = unique.next();
    arr.tone_c = unique.next();
    arr.tone_d = unique.next();

    let ids: Vec<Option<usize>> = arr
        .tone_changes
        .iter()
        .map(|t| arr.tone_slot_of(&t.name))
        .collect();
    for (change, slot) in arr.tone_changes.iter_mut().zip(ids) {
        if let Some(slot) = slot {
            change.id = slot as u8;
        }
    }
}

/// Override the base tone of an arrangement that has no tone changes.
pub fn set_base_tone(arr: &mut InstrumentalArrangement, name: &str) {
    if arr.tone_changes.is_empty() && !name.is_empty() {
        arr.tone_base = Some(name.to_string());
    }
}
