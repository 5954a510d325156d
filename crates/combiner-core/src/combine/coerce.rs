//! Greedy reduction of sections and phrase iterations down to the engine's
//! phrase iteration ceiling.

use tracing::{debug, warn};

use crate::chart::{InstrumentalArrangement, NOGUITAR};
use crate::config::limits::MAX_PHRASE_ITERATIONS;

/// Reduce phrase iterations to at most [`MAX_PHRASE_ITERATIONS`].
///
/// The first section and the last two sections are never removed.
pub fn coerce_phrases_and_sections(arr: &mut InstrumentalArrangement) {
    if arr.phrase_iterations.len() <= MAX_PHRASE_ITERATIONS {
        return;
    }

    let before = arr.phrase_iterations.len();
    collapse_iterations_within_sections(arr);

    while arr.phrase_iterations.len() > MAX_PHRASE_ITERATIONS {
        let Some(smallest) = find_smallest_section(arr) else {
            warn!(
                "Cannot merge sections any further, {} phrase iterations remain",
                arr.phrase_iterations.len()
            );
            break;
        };
        let remove = section_to_remove(arr, smallest);
        let time = arr.sections.remove(remove).time;
        if let Some(pi) = arr.phrase_iterations.iter().position(|pi| pi.time == time) {
            arr.phrase_iterations.remove(pi);
        }
    }

    arr.renumber_sections();
    debug!(
        "Coerced phrase iterations from {} to {}",
        before,
        arr.phrase_iterations.len()
    );
}

/// Keep only the phrase iteration that starts each inner section.
fn collapse_iterations_within_sections(arr: &mut InstrumentalArrangement) {
    let inner_end = arr.sections.len().saturating_sub(2);
    for i in 1..inner_end {
        let start = arr.sections[i].time;
        let Some(pi_index) = arr.phrase_iterations.iter().position(|pi| pi.time == start) else {
            continue;
        };
        let next = pi_index + 1;
        while next < arr.phrase_iterations.len() {
            let time = arr.phrase_iterations[next].time;
            if arr.sections.iter().any(|s| s.time == time) {
                break;
            }
            arr.phrase_iterations.remove(next);
        }
    }
}

/// Index of the shortest inner section that may be merged away.
fn find_smallest_section(arr: &InstrumentalArrangement) -> Option<usize> {
    let sections = &arr.sections;
    let inner_end = sections.len().saturating_sub(2);

    (1..inner_end)
        .filter(|&i| {
            let flanked = sections[i - 1].name == NOGUITAR && sections[i + 1].name == NOGUITAR;
            sections[i].name != NOGUITAR && !flanked
        })
        .min_by_key(|&i| sections[i + 1].time - sections[i].time)
}

/// Which section disappears when `smallest` is merged into a neighbor.
fn section_to_remove(arr: &InstrumentalArrangement, smallest: usize) -> usize {
    let sections = &arr.sections;
    let last_candidate = sections.len() - 3;

    if smallest == last_candidate {
        // Merge into the previous section.
        return smallest;
    }
    if smallest == 1 {
        // The next section is absorbed.
        return smallest + 1;
    }

    let prev_len = sections[smallest].time - sections[smallest - 1].time;
    let next_len = sections[smallest + 2].time - sections[smallest + 1].time;
    let prev_is_noguitar = sections[smallest - 1].name == NOGUITAR;
    let next_is_noguitar = sections[smallest + 1].name == NOGUITAR;

    if (prev_len < next_len && !prev_is_noguitar) || next_is_noguitar {
        smallest
    } else {
        smallest + 1
    }
}
