use osumap_rs::beatmap::prelude::*;
use osumap_rs::studio::{
    LookupMode, SampleSetEvent, Timeline, build_hitsound_timeline, derive_combo_indices,
    find_patterns, prune_redundant_timing_points,
};
use pretty_assertions::assert_eq;

fn fixture() -> Beatmap {
    decode(include_str!("files/v14.osu")).expect("v14.osu must decode")
}

#[test]
fn combo_derivation_is_deterministic() {
    let beatmap = fixture();
    let first = derive_combo_indices(&beatmap);
    let second = derive_combo_indices(&beatmap);
    assert_eq!(first, second);
    // slider (new combo), spinner skipped, circle (new combo): two entries
    let indices: Vec<usize> = first.iter().map(|combo| combo.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn combo_offsets_cycle_through_the_palette() {
    // offsets 0, 0, 1, 0 over the 4-colour palette must yield 0, 1, 3, 0
    let mut source = String::from(
        "osu file format v14\r\n[General]\r\nMode: 0\r\n[Metadata]\r\n[Difficulty]\r\n[Colours]\r\nCombo1 : 1,1,1\r\nCombo2 : 2,2,2\r\nCombo3 : 3,3,3\r\nCombo4 : 4,4,4\r\n[HitObjects]\r\n",
    );
    for (time, type_bits) in [(100, 5), (200, 5), (300, 21), (400, 5)] {
        source.push_str(&format!("0,0,{time},{type_bits},0\r\n"));
    }
    let beatmap = decode(&source).expect("must decode");
    let indices: Vec<usize> = derive_combo_indices(&beatmap)
        .iter()
        .map(|combo| combo.index)
        .collect();
    assert_eq!(indices, vec![0, 1, 3, 0]);
}

#[test]
fn pattern_matcher_covers_the_run_and_drops_the_tail() {
    let patterns = find_patterns(&[0, 1, 0, 1, 0, 1, 2]);
    assert_eq!(patterns.len(), 1, "the trailing 2 must not become a pattern");
    let pattern = &patterns[0];
    assert_eq!(pattern.sequence, vec![0, 1]);
    assert_eq!(pattern.length, 6);
    assert_eq!(pattern.repetitions, 3.0);
}

#[test]
fn pattern_matcher_quirks_are_intentional() {
    // a lone non-repeating element between runs vanishes instead of being
    // reported as a length-1 pattern
    let patterns = find_patterns(&[4, 4, 9, 7, 7]);
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[0].sequence, vec![4]);
    assert_eq!(patterns[1].sequence, vec![7]);

    // equal scores fall to the first (shortest) window length: for
    // [3,3,3,3] both L=1 (3 repeats) and L=2 (1 repeat) score below the
    // single-element run, which must win
    let patterns = find_patterns(&[3, 3, 3, 3]);
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].sequence, vec![3]);
    assert_eq!(patterns[0].repetitions, 4.0);
}

#[test]
fn pruning_twice_equals_pruning_once() {
    let beatmap = fixture();
    let once = prune_redundant_timing_points(beatmap.timing_points());
    let twice = prune_redundant_timing_points(&once);
    assert_eq!(once, twice);
    // the final -100 point repeats the first green line's sample fields but
    // sits after a velocity change, so it must be kept
    assert_eq!(once.len(), beatmap.timing_points().len());
}

#[test]
fn derived_fixture_prunes_true_duplicates() {
    let source = include_str!("files/v14.osu").replace(
        "85318,-100,4,2,1,60,0,0",
        "85318,-83.33333333333,4,2,1,70,0,1",
    );
    let beatmap = decode(&source).expect("must decode");
    let pruned = prune_redundant_timing_points(beatmap.timing_points());
    // the edited point now mirrors its predecessor at 43993 exactly
    assert_eq!(pruned.len(), beatmap.timing_points().len() - 1);
}

#[test]
fn timeline_lookup_prefers_later_event_within_window() {
    // two sample set events 5ms apart; an exact lookup between them with
    // leniency 5 sees both and must take the later one
    let timeline = Timeline {
        sounds: Vec::new(),
        sample_sets: vec![
            SampleSetEvent {
                time: 100.0,
                sample_set: SampleSet::Normal,
                sample_index: 1,
                volume: 70,
            },
            SampleSetEvent {
                time: 105.0,
                sample_set: SampleSet::Drum,
                sample_index: 2,
                volume: 55,
            },
        ],
    };
    let found = timeline
        .lookup_sample_set(102.0, 5.0, LookupMode::Exact)
        .expect("within window");
    assert_eq!(found.time, 105.0);
    assert_eq!(found.sample_set, SampleSet::Drum);
    assert_eq!(found.sample_index, 2);
}

#[test]
fn timeline_from_fixture_spaces_slider_edges_evenly() {
    let beatmap = fixture();
    let timeline = build_hitsound_timeline(&beatmap);
    // slider at 2338: length 112.5, velocity 1.0, multiplier 1.8, beat 331.125
    let HitObject::Slider(slider) = &beatmap.hit_objects[2] else {
        panic!("expected slider");
    };
    let span = beatmap
        .slider_span_duration(slider)
        .expect("timing context exists");
    let tail = timeline
        .sounds
        .iter()
        .find(|event| {
            event.kind == osumap_rs::studio::SoundEventKind::SliderTail
                && event.time > 2338.0
                && event.time < 2338.0 + 2.0 * span
        })
        .expect("tail event exists");
    assert!((tail.time - (2338.0 + span)).abs() < 1e-9);
    assert!(tail.sounds.clap());
}

#[test]
fn sample_set_events_merge_sample_identical_points() {
    let beatmap = fixture();
    let timeline = build_hitsound_timeline(&beatmap);
    // 1343 uninherited and 1343 inherited carry identical sample data and
    // merge; 43993 changes volume; 85318 restores the original context
    let times: Vec<f64> = timeline
        .sample_sets
        .iter()
        .map(|event| event.time)
        .collect();
    assert_eq!(times, vec![1343.0, 43993.0, 85318.0]);
}
