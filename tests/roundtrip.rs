use std::collections::BTreeMap;

use osumap_rs::beatmap::prelude::*;
use pretty_assertions::assert_eq;

const FIXTURES: [(&str, &str); 5] = [
    ("v14.osu", include_str!("files/v14.osu")),
    ("v14_storyboard.osu", include_str!("files/v14_storyboard.osu")),
    ("v12.osu", include_str!("files/v12.osu")),
    ("v9.osu", include_str!("files/v9.osu")),
    ("v5.osu", include_str!("files/v5.osu")),
];

/// Known sections mapped to their payload lines, with blank and comment
/// lines excluded, for order-insensitive section comparison.
fn sections_of(source: &str) -> BTreeMap<String, Vec<String>> {
    let doc = split_sections(source, CommentPolicy::Strip).expect("must split");
    doc.blocks
        .iter()
        .filter_map(|block| {
            block.section.map(|section| {
                (
                    section.to_string(),
                    block
                        .lines
                        .iter()
                        .map(|line| line.text.to_owned())
                        .collect(),
                )
            })
        })
        .collect()
}

#[test]
fn canonical_fixture_round_trips_byte_identically() {
    let source = include_str!("files/v14.osu");
    let beatmap = decode(source).expect("v14.osu must decode");
    assert_eq!(encode(&beatmap), source);
}

#[test]
fn storyboard_fixture_round_trips_byte_identically() {
    let source = include_str!("files/v14_storyboard.osu");
    let beatmap = decode(source).expect("v14_storyboard.osu must decode");
    assert_eq!(encode(&beatmap), source);
}

#[test]
fn every_revision_round_trips_section_by_section() {
    for (name, source) in FIXTURES {
        let beatmap = decode(source).unwrap_or_else(|error| panic!("{name}: {error}"));
        let encoded = encode(&beatmap);
        assert_eq!(
            sections_of(&encoded),
            sections_of(source),
            "section mismatch in {name}",
        );
    }
}

#[test]
fn decoded_model_is_stable_under_reencoding() {
    for (name, source) in FIXTURES {
        let first = decode(source).unwrap_or_else(|error| panic!("{name}: {error}"));
        let second = decode(&encode(&first)).unwrap_or_else(|error| panic!("{name}: {error}"));
        assert_eq!(second, first, "model drift in {name}");
    }
}

#[test]
fn versions_survive_the_round_trip() {
    for (name, source) in FIXTURES {
        let beatmap = decode(source).unwrap_or_else(|error| panic!("{name}: {error}"));
        let expected = parse_format_version(source.lines().next().unwrap_or_default());
        assert_eq!(Some(beatmap.version), expected, "version mismatch in {name}");
        assert!(
            encode(&beatmap).starts_with(&format!("osu file format v{}", beatmap.version)),
            "missing preamble in {name}",
        );
    }
}

#[test]
fn v14_model_spot_checks() {
    let beatmap = decode(include_str!("files/v14.osu")).expect("must decode");
    assert_eq!(beatmap.version, 14);
    assert_eq!(beatmap.general.sample_set, Some(SampleSet::Soft));
    assert_eq!(beatmap.metadata.title.as_deref(), Some("Night Sky Dance"));
    assert_eq!(beatmap.metadata.source.as_deref(), Some(""));
    assert_eq!(beatmap.combo_colours().len(), 4);
    assert_eq!(beatmap.timing_points().len(), 4);
    assert_eq!(beatmap.hit_objects.len(), 5);

    let TimingPoint::Uninherited(tempo) = &beatmap.timing_points()[0] else {
        panic!("first point must be uninherited");
    };
    assert!((tempo.bpm() - 60000.0 / 331.125).abs() < 1e-9);

    let HitObject::Slider(slider) = &beatmap.hit_objects[0] else {
        panic!("first object must be a slider");
    };
    assert_eq!(slider.slides, 1);
    assert!(slider.sounds.as_ref().is_some_and(|s| s.head.sounds.whistle()));
}

#[test]
fn v5_objects_without_samples_stay_bare() {
    let beatmap = decode(include_str!("files/v5.osu")).expect("must decode");
    assert!(beatmap.editor.is_none());
    for object in &beatmap.hit_objects {
        assert_eq!(object.common().sample, None);
    }
    let encoded = encode(&beatmap);
    assert!(encoded.contains("160,120,970,1,0\r\n"));
    assert!(!encoded.contains("160,120,970,1,0,"));
}

#[test]
fn keep_policy_exposes_comment_lines_for_diffing() {
    let source = include_str!("files/v12.osu");
    let doc = split_sections(source, CommentPolicy::Keep).expect("must split");
    let events = doc.block(SectionName::Events).expect("events present");
    assert!(
        events
            .lines
            .iter()
            .any(|line| line.text.starts_with("//Break Periods"))
    );
}
