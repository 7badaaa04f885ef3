use osumap_rs::beatmap::prelude::*;

fn minimal_with(section: &str, payload: &str) -> String {
    let mut source = String::from(
        "osu file format v14\r\n[General]\r\nMode: 0\r\n[Metadata]\r\nTitle:t\r\n[Difficulty]\r\nCircleSize:4\r\n",
    );
    source.push_str(&format!("[{section}]\r\n{payload}\r\n"));
    if section != "HitObjects" {
        source.push_str("[HitObjects]\r\n");
    }
    source
}

#[test]
fn plain_text_is_malformed() {
    assert_eq!(
        decode("this is not a beatmap"),
        Err(DecodeError::MalformedDocument)
    );
}

#[test]
fn each_required_section_is_checked() {
    let source = "osu file format v14\r\n[General]\r\n[Metadata]\r\n[Difficulty]\r\n";
    assert_eq!(
        decode(source),
        Err(DecodeError::MissingRequiredSection {
            section: SectionName::HitObjects,
        })
    );
    let source = "osu file format v14\r\n[General]\r\n[HitObjects]\r\n";
    assert_eq!(
        decode(source),
        Err(DecodeError::MissingRequiredSection {
            section: SectionName::Metadata,
        })
    );
}

#[test]
fn invalid_field_value_names_section_key_and_raw() {
    let source = minimal_with("Editor", "BeatDivisor: x7");
    let Err(DecodeError::Section {
        section,
        source: error,
        ..
    }) = decode(&source)
    else {
        panic!("expected section error");
    };
    assert_eq!(section, SectionName::Editor);
    assert_eq!(
        error,
        SectionError::InvalidFieldValue {
            key: "BeatDivisor".into(),
            raw: "x7".into(),
        }
    );
}

#[test]
fn timing_point_arity_error_carries_the_raw_line() {
    let source = minimal_with("TimingPoints", "1000,500,4");
    let Err(DecodeError::Section { section, source: error, .. }) = decode(&source) else {
        panic!("expected section error");
    };
    assert_eq!(section, SectionName::TimingPoints);
    assert_eq!(
        error,
        SectionError::InvalidTimingPoint {
            raw: "1000,500,4".into(),
        }
    );
}

#[test]
fn unsupported_hit_object_type_reports_the_bits() {
    let source = minimal_with("HitObjects", "0,0,1000,64,0");
    let Err(DecodeError::Section { source: error, .. }) = decode(&source) else {
        panic!("expected section error");
    };
    assert_eq!(error, SectionError::UnsupportedHitObjectType { bits: 64 });
}

#[test]
fn malformed_hit_object_reports_the_line() {
    let source = minimal_with("HitObjects", "12,34,notatime,1,0");
    let Err(DecodeError::Section { source: error, .. }) = decode(&source) else {
        panic!("expected section error");
    };
    assert_eq!(
        error,
        SectionError::InvalidHitObject {
            raw: "12,34,notatime,1,0".into(),
        }
    );
}

#[test]
fn unknown_event_type_and_command_code() {
    let source = minimal_with("Events", "Firework,0,0");
    let Err(DecodeError::Section { source: error, .. }) = decode(&source) else {
        panic!("expected section error");
    };
    assert_eq!(
        error,
        SectionError::UnknownEventType {
            token: "Firework".into(),
        }
    );

    let source = minimal_with("Events", "Sprite,Pass,Centre,\"x.png\",0,0\r\n Z,0,0,100");
    let Err(DecodeError::Section { source: error, .. }) = decode(&source) else {
        panic!("expected section error");
    };
    assert_eq!(error, SectionError::UnknownCommandCode { code: "Z".into() });
}

#[test]
fn the_first_failure_wins() {
    // both the timing point and the hit object are broken; timing points
    // are dispatched first, so their error surfaces
    let source = "osu file format v14\r\n[General]\r\n[Metadata]\r\n[Difficulty]\r\n[TimingPoints]\r\nbroken\r\n[HitObjects]\r\nbroken\r\n";
    let Err(DecodeError::Section { section, .. }) = decode(source) else {
        panic!("expected section error");
    };
    assert_eq!(section, SectionName::TimingPoints);
}

#[test]
fn error_spans_point_into_the_source() {
    let source = minimal_with("TimingPoints", "oops,1,2,3,4,5,6");
    let error = decode(&source).unwrap_err();
    let span = error.span().expect("line-level error has a span");
    assert_eq!(&source[span.start..span.end], "oops,1,2,3,4,5,6");
}
