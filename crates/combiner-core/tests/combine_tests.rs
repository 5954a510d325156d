//! End-to-end combination scenarios and invariants of combined documents.

use std::collections::HashMap;

use combiner_core::chart::{
    Chord, ChordId, ChordTemplate, Ebeat, HandShape, Level, NewLinkedDiff, Note, Phrase, PhraseId,
    PhraseIteration, Section, ToneChange,
};
use combiner_core::chart::Vocal;
use combiner_core::{
    ArrangementType, CombineWarning, Error, InstrumentalArrangement, InstrumentalCombiner, Project,
    Vocals, run_project, validate_single_level,
};

fn template(name: &str, fret: i8) -> ChordTemplate {
    ChordTemplate {
        name: name.into(),
        display_name: name.into(),
        fingers: [1, -1, -1, -1, -1, -1],
        frets: [fret, -1, -1, -1, -1, -1],
    }
}

/// COUNT at 0, one main phrase at 5 s, END 5 s before the end.
fn segment(length: i32, tone: &str, levels: usize) -> InstrumentalArrangement {
    let levels = (0..levels)
        .map(|d| {
            let mut level = Level::new(d as i8);
            level.notes.push(Note {
                time: 5000,
                fret: d as i8,
                ..Default::default()
            });
            level.chords.push(Chord {
                time: 6000,
                chord_id: ChordId(1),
                ..Default::default()
            });
            level.hand_shapes.push(HandShape {
                chord_id: ChordId(0),
                start_time: 6000,
                end_time: 7000,
            });
            level
        })
        .collect();

    InstrumentalArrangement {
        arrangement: "Lead".into(),
        song_length: length,
        average_tempo: 100.0,
        tone_base: Some(tone.into()),
        phrases: vec![
            Phrase::new("COUNT", 0),
            Phrase::new("main", 0),
            Phrase::new("END", 0),
        ],
        phrase_iterations: vec![
            PhraseIteration::new(0, PhraseId(0)),
            PhraseIteration::new(5000, PhraseId(1)),
            PhraseIteration::new(length - 5000, PhraseId(2)),
        ],
        new_linked_diffs: vec![NewLinkedDiff {
            level_break: -1,
            ratio: "1.000".into(),
            phrase_ids: vec![PhraseId(1)],
        }],
        chord_templates: vec![template("A", 0), template("C", 3)],
        ebeats: (0..length / 500)
            .map(|i| Ebeat {
                time: i * 500,
                measure: if i % 4 == 0 { (i / 4 + 1) as i16 } else { -1 },
            })
            .collect(),
        sections: vec![
            Section::new("verse", 5000, 1),
            Section::new("noguitar", length - 5000, 1),
        ],
        levels,
        ..Default::default()
    }
}

fn assert_references_valid(arr: &InstrumentalArrangement) {
    for pi in &arr.phrase_iterations {
        assert!(pi.phrase_id.index() < arr.phrases.len(), "dangling phrase id");
    }
    for nld in &arr.new_linked_diffs {
        for id in &nld.phrase_ids {
            assert!(id.index() < arr.phrases.len(), "dangling linked diff id");
        }
    }
    for level in &arr.levels {
        for chord in &level.chords {
            assert!(chord.chord_id.index() < arr.chord_templates.len());
        }
        for hs in &level.hand_shapes {
            assert!(hs.chord_id.index() < arr.chord_templates.len());
        }
    }
    for (i, level) in arr.levels.iter().enumerate() {
        assert_eq!(level.difficulty as usize, i);
    }
}

fn assert_section_numbers(arr: &InstrumentalArrangement) {
    let mut seen: HashMap<&str, i16> = HashMap::new();
    for section in &arr.sections {
        let expected = seen.entry(section.name.as_str()).or_insert(0);
        *expected += 1;
        assert_eq!(section.number, *expected, "section {}", section.name);
    }
}

fn combine(segments: &[(i32, i32, usize)], condense: bool) -> InstrumentalCombiner {
    let mut combiner = InstrumentalCombiner::new();
    for (i, &(length, trim, levels)) in segments.iter().enumerate() {
        combiner.add_next(
            segment(length, "Clean", levels),
            length,
            trim,
            condense,
            i + 1 == segments.len(),
        );
    }
    combiner
}

#[test]
fn test_two_segment_scenario() {
    let mut combiner = InstrumentalCombiner::new();
    combiner.add_next(segment(100_000, "Clean", 1), 100_000, 0, false, false);
    combiner.add_next(segment(80_000, "Clean", 1), 80_000, 5000, false, true);

    let combined = combiner.finalize(false).unwrap();
    assert_eq!(combined.song_length, 175_000);

    let names: Vec<&str> = combined.phrases.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.iter().filter(|n| **n == "COUNT").count(), 1);
    assert_eq!(names.iter().filter(|n| **n == "END").count(), 1);
    assert!(names.contains(&"noguitar"));

    // B's main phrase and note land 95 s later.
    let main_times: Vec<i32> = combined
        .phrase_iterations
        .iter()
        .filter(|pi| combined.phrases[pi.phrase_id.index()].name == "main")
        .map(|pi| pi.time)
        .collect();
    assert_eq!(main_times, vec![5000, 100_000]);
    assert_eq!(combined.levels[0].notes[1].time, 100_000);

    assert_references_valid(&combined);
    assert_section_numbers(&combined);
}

#[test]
fn test_length_is_sum_minus_later_trims() {
    let segments = [(60_000, 3000, 1), (45_500, 1500, 1), (30_250, 250, 1), (20_000, 0, 1)];
    let combined = combine(&segments, false).finalize(false).unwrap();

    let expected: i32 = segments.iter().map(|s| s.0).sum::<i32>()
        - segments[1..].iter().map(|s| s.1).sum::<i32>();
    assert_eq!(combined.song_length, expected);
}

#[test]
fn test_invariants_hold_for_many_segments() {
    for condense in [false, true] {
        let segments: Vec<(i32, i32, usize)> = (0..6)
            .map(|i| (30_000 + i * 1000, (i % 3) * 500, if condense { 3 } else { 1 }))
            .collect();
        let combined = combine(&segments, condense).finalize(false).unwrap();

        assert_references_valid(&combined);
        assert_section_numbers(&combined);
        for level in &combined.levels {
            assert!(level.notes.windows(2).all(|w| w[0].time <= w[1].time));
        }
        assert_eq!(combined.chord_templates.len(), 2);
    }
}

#[test]
fn test_dd_segments_keep_distinct_phrases() {
    let combined = combine(&[(30_000, 0, 3), (30_000, 0, 3)], false)
        .finalize(false)
        .unwrap();
    assert_eq!(combined.levels.len(), 3);

    let names: Vec<&str> = combined.phrases.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"main"));
    assert!(names.contains(&"arr2main"));

    // Linked diffs of the second segment point at its own phrase.
    let linked: Vec<&str> = combined
        .new_linked_diffs
        .iter()
        .flat_map(|nld| nld.phrase_ids.iter())
        .map(|&id| combined.phrases[id.index()].name.as_str())
        .collect();
    assert_eq!(linked, vec!["main", "arr2main"]);
    assert_references_valid(&combined);
}

#[test]
fn test_tone_overflow_scenario() {
    let mut first = segment(20_000, "T1", 1);
    first.tone_a = Some("T1".into());
    first.tone_b = Some("T2".into());
    first.tone_c = Some("T3".into());
    first.tone_d = Some("T4".into());
    first.tone_changes = vec![
        ToneChange::new("T2", 6000, 1),
        ToneChange::new("T3", 7000, 2),
        ToneChange::new("T4", 8000, 3),
    ];

    let mut combiner = InstrumentalCombiner::new();
    combiner.add_next(first, 20_000, 0, false, false);
    combiner.add_next(segment(20_000, "T5", 1), 20_000, 0, false, false);
    combiner.add_next(segment(20_000, "T6", 1), 20_000, 0, false, true);

    let combined = combiner.combined().unwrap();
    let names: Vec<&str> = combined.tone_changes.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["T2", "T3", "T4", "T5", "T6"]);
    assert_eq!(combined.tone_slot_of("T5"), None);

    let warned: Vec<&str> = combiner
        .warnings()
        .iter()
        .map(|w| match w {
            CombineWarning::ToneCapacity { tone, .. } => tone.as_str(),
        })
        .collect();
    assert_eq!(warned, vec!["T5", "T6"]);
}

#[test]
fn test_save_empty_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Combined_Lead_RS2.xml");
    let result = InstrumentalCombiner::new().save(&path, true);
    assert!(matches!(result, Err(Error::EmptyArrangement)));
    assert!(!path.exists());
}

#[test]
fn test_dedup_is_idempotent() {
    use combiner_core::combine::dedup::{combine_chords, combine_phrases};

    let mut combined = combine(&[(30_000, 0, 1), (30_000, 0, 1), (30_000, 0, 1)], false)
        .combined()
        .cloned()
        .unwrap();
    combine_phrases(&mut combined);
    combine_chords(&mut combined);
    let once = combined.clone();

    assert_eq!(combine_phrases(&mut combined), 0);
    assert_eq!(combine_chords(&mut combined), 0);
    assert_eq!(combined, once);
}

#[test]
fn test_coerce_respects_ceiling() {
    let mut arr = segment(400_000, "Clean", 1);
    arr.phrases = vec![
        Phrase::new("COUNT", 0),
        Phrase::new("riff", 0),
        Phrase::new("END", 0),
    ];
    arr.phrase_iterations = vec![PhraseIteration::new(0, PhraseId(0))];
    arr.sections.clear();
    for i in 0..150 {
        let time = 1000 + i * 2500;
        arr.sections.push(Section::new("riff", time, 0));
        arr.phrase_iterations.push(PhraseIteration::new(time, PhraseId(1)));
    }
    arr.sections.push(Section::new("noguitar", 390_000, 0));
    arr.phrase_iterations.push(PhraseIteration::new(390_000, PhraseId(2)));
    let first = arr.sections[0].clone();
    let last_two = arr.sections[arr.sections.len() - 2..].to_vec();

    let mut combiner = InstrumentalCombiner::new();
    combiner.add_next(arr, 400_000, 0, false, true);
    let combined = combiner.finalize(true).unwrap();

    assert!(combined.phrase_iterations.len() <= 100);
    assert_eq!(combined.sections[0].time, first.time);
    let n = combined.sections.len();
    assert_eq!(combined.sections[n - 2].time, last_two[0].time);
    assert_eq!(combined.sections[n - 1].time, last_two[1].time);
    assert_section_numbers(&combined);
}

#[test]
fn test_project_run_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracks = Vec::new();
    for (i, length) in [(1, 30_000), (2, 25_000)] {
        let lead = dir.path().join(format!("lead{i}.xml"));
        segment(length, "Clean", 1).save(&lead).unwrap();
        let lights = dir.path().join(format!("sl{i}.xml"));
        std::fs::write(
            &lights,
            r#"<showlights count="1"><showlight time="0.000" note="24" /></showlights>"#,
        )
        .unwrap();
        tracks.push(serde_json::json!({
            "title": format!("Song {i}"),
            "trimAmount": 1.0,
            "songLength": length as f64 / 1000.0,
            "arrangements": [
                { "type": "instrumental", "kind": "Lead", "file": lead },
                { "type": "showLights", "file": lights }
            ]
        }));
    }
    let project: Project =
        serde_json::from_value(serde_json::json!({ "combinedTitle": "Medley", "tracks": tracks }))
            .unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let reports = run_project(&project, &out);

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_ok()), "{reports:?}");

    let lead = InstrumentalArrangement::load(out.join("Combined_Lead_RS2.xml")).unwrap();
    assert_eq!(lead.title, "Medley");
    assert_eq!(lead.song_length, 54_000);
    assert!(out.join("Combined_Showlights_RS2.xml").exists());
}

#[test]
fn test_single_level_check_rejects_difficulty_levels() {
    let dir = tempfile::tempdir().unwrap();
    let flat = dir.path().join("flat.xml");
    let dd = dir.path().join("dd.xml");
    segment(20_000, "Clean", 1).save(&flat).unwrap();
    segment(20_000, "Clean", 3).save(&dd).unwrap();

    assert_eq!(validate_single_level(&[&flat]).unwrap().len(), 1);
    match validate_single_level(&[&flat, &dd]) {
        Err(Error::UnsupportedDifficulty { file, levels }) => {
            assert_eq!(file, dd);
            assert_eq!(levels, 3);
        }
        other => panic!("expected UnsupportedDifficulty, got {other:?}"),
    }
}

#[test]
fn test_vocals_only_in_later_track_are_combined() {
    let dir = tempfile::tempdir().unwrap();
    let vocals = dir.path().join("vocals2.xml");
    Vocals::new(vec![Vocal::new(2000, 500, "la")])
        .save(&vocals)
        .unwrap();

    let mut tracks = Vec::new();
    for i in 1..=2 {
        let lead = dir.path().join(format!("lead{i}.xml"));
        segment(20_000, "Clean", 1).save(&lead).unwrap();
        let mut arrangements = vec![serde_json::json!(
            { "type": "instrumental", "kind": "Lead", "file": lead }
        )];
        if i == 2 {
            arrangements.push(serde_json::json!({ "type": "vocals", "file": vocals }));
        }
        tracks.push(serde_json::json!({
            "title": format!("Song {i}"),
            "songLength": 20.0,
            "arrangements": arrangements
        }));
    }
    let project: Project = serde_json::from_value(serde_json::json!({
        "options": { "addTrackNamesToLyrics": false },
        "tracks": tracks
    }))
    .unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let reports = run_project(&project, &out);

    let kinds: Vec<ArrangementType> = reports.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![ArrangementType::Lead, ArrangementType::Vocals]);
    assert!(reports.iter().all(|r| r.is_ok()), "{reports:?}");

    let combined = Vocals::load(out.join("Combined_Vocals_RS2.xml")).unwrap();
    assert_eq!(combined.vocals, vec![Vocal::new(22_000, 500, "la")]);
}

#[test]
fn test_project_lengths_drive_every_timeline() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracks = Vec::new();
    // Chart files declare 30 s and 25 s; the project says 32 s and 20 s.
    for (i, chart_length, project_length) in [(1, 30_000, 32.0), (2, 25_000, 20.0)] {
        let lead = dir.path().join(format!("lead{i}.xml"));
        segment(chart_length, "Clean", 1).save(&lead).unwrap();
        let vocals = dir.path().join(format!("vocals{i}.xml"));
        Vocals::new(vec![Vocal::new(5000, 500, format!("v{i}"))])
            .save(&vocals)
            .unwrap();
        tracks.push(serde_json::json!({
            "title": format!("Song {i}"),
            "trimAmount": 1.0,
            "songLength": project_length,
            "arrangements": [
                { "type": "instrumental", "kind": "Lead", "file": lead },
                { "type": "vocals", "file": vocals }
            ]
        }));
    }
    let project: Project = serde_json::from_value(serde_json::json!({
        "options": { "addTrackNamesToLyrics": false, "coercePhrases": false },
        "tracks": tracks
    }))
    .unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let reports = run_project(&project, &out);
    assert!(reports.iter().all(|r| r.is_ok()), "{reports:?}");

    let lead = InstrumentalArrangement::load(out.join("Combined_Lead_RS2.xml")).unwrap();
    assert_eq!(lead.song_length, 32_000 + 20_000 - 1000);

    let vocals = Vocals::load(out.join("Combined_Vocals_RS2.xml")).unwrap();
    let second_vocal = vocals.vocals[1].time;
    assert_eq!(second_vocal, 31_000 + 5000);

    // The second segment's first phrase and note land where its lyrics do.
    let second_main = lead
        .phrase_iterations
        .iter()
        .filter(|pi| lead.phrases[pi.phrase_id.index()].name == "main")
        .nth(1)
        .map(|pi| pi.time);
    assert_eq!(second_main, Some(second_vocal));
    assert_eq!(lead.levels[0].notes[1].time, second_vocal);
}
