//! Flattening of a segment's difficulty structure into one phrase.

use tracing::debug;

use crate::chart::{
    COUNT_PHRASE, END_PHRASE, HeroLevel, InstrumentalArrangement, Level, NOGUITAR, Phrase,
    PhraseId, PhraseIteration, Section,
};

/// Where the condensed segment sits in the combined performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPosition {
    pub is_first: bool,
    pub is_last: bool,
    /// 1-based index of the segment, used to name its phrase.
    pub number: usize,
}

/// Condense `arr` into a single phrase spanning the whole segment.
///
/// Content of each phrase's hardest level is first copied into every higher
/// level so that the top level holds the complete chart.
pub fn condense_into_one_phrase(
    arr: &mut InstrumentalArrangement,
    song_length: i32,
    position: SegmentPosition,
) {
    fill_higher_levels(arr, song_length);

    let end_time = arr
        .find_phrase(END_PHRASE)
        .and_then(|end| arr.phrase_iterations.iter().find(|pi| pi.phrase_id == end))
        .map(|pi| pi.time);
    let count_time = arr
        .phrase_iterations
        .first()
        .map(|pi| pi.time)
        .unwrap_or(arr.start_beat);
    let first_phrase_time = arr
        .phrase_iterations
        .get(1)
        .map(|pi| pi.time)
        .unwrap_or(count_time);

    arr.new_linked_diffs.clear();
    arr.linked_diffs.clear();
    arr.phrase_properties.clear();
    arr.phrases.clear();
    arr.phrase_iterations.clear();
    arr.sections.clear();

    if position.is_first {
        push_phrase(arr, Phrase::new(COUNT_PHRASE, 0), count_time);
    }

    let phrase_time = if position.is_first {
        first_phrase_time
    } else {
        arr.first_beat_time()
    };
    let top = arr.levels.len().saturating_sub(1) as u8;
    let id = push_phrase(
        arr,
        Phrase::new(format!("track{}", position.number), top),
        phrase_time,
    );
    if let Some(pi) = arr.phrase_iterations.iter_mut().find(|pi| pi.phrase_id == id) {
        pi.hero_levels = hero_levels(top);
    }
    arr.sections.push(Section::new("riff", phrase_time, 1));

    if position.is_last
        && let Some(end_time) = end_time
    {
        push_phrase(arr, Phrase::new(END_PHRASE, 0), end_time);
        arr.sections.push(Section::new(NOGUITAR, end_time, 1));
    }

    debug!(
        "Condensed segment {} into one phrase ({} levels)",
        position.number,
        arr.levels.len()
    );
}

fn push_phrase(arr: &mut InstrumentalArrangement, phrase: Phrase, time: i32) -> PhraseId {
    arr.phrases.push(phrase);
    let id = PhraseId(arr.phrases.len() - 1);
    arr.phrase_iterations.push(PhraseIteration::new(time, id));
    id
}

fn hero_levels(top: u8) -> Vec<HeroLevel> {
    [top / 3, top / 2, top]
        .into_iter()
        .zip(1..)
        .map(|(difficulty, hero)| HeroLevel { hero, difficulty })
        .collect()
}

/// Copy each phrase window from the phrase's max difficulty into every
/// level above it, then restore time order.
fn fill_higher_levels(arr: &mut InstrumentalArrangement, song_length: i32) {
    let level_count = arr.levels.len();

    for i in 1..arr.phrase_iterations.len() {
        let pi = &arr.phrase_iterations[i];
        let Some(phrase) = arr.phrases.get(pi.phrase_id.index()) else {
            continue;
        };
        if phrase.is_named(END_PHRASE) {
            break;
        }

        let max_diff = phrase.max_difficulty as usize;
        if max_diff + 1 >= level_count {
            continue;
        }

        let start = pi.time;
        let end = arr
            .phrase_iterations
            .get(i + 1)
            .map(|next| next.time)
            .unwrap_or(song_length);
        let window = arr.levels[max_diff].window(start, end);

        for level in &mut arr.levels[max_diff + 1..] {
            let mut copy: Level = window.clone();
            level.append(&mut copy);
        }
    }

    for level in &mut arr.levels {
        level.sort_by_time();
    }
}
