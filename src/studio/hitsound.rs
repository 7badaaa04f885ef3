//! Hitsound event timelines.
//!
//! Builds two time-ordered streams from a document: discrete sound events
//! (circle hits, slider head/body/repeat/tail edges) and the sample bank
//! context established by timing points. An external hitsound-copy tool walks
//! one document's timeline and transplants sounds onto another's objects at
//! matching times within a caller-supplied leniency.

use crate::beatmap::command::sample::{SampleSet, Sounds};
use crate::beatmap::model::hit_object::EdgeSound;
use crate::beatmap::model::{Beatmap, HitObject};

/// What produced a [`SoundEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundEventKind {
    /// A circle hit.
    Hit,
    /// A slider head edge.
    SliderHead,
    /// The slider body sound that follows the whole path.
    SliderBody,
    /// A slider repeat edge.
    SliderRepeat,
    /// A slider tail edge.
    SliderTail,
}

/// A discrete sound at a point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundEvent {
    /// When the sound plays, in milliseconds.
    pub time: f64,
    /// What produced it.
    pub kind: SoundEventKind,
    /// Hit sound flags played.
    pub sounds: Sounds,
    /// Bank of the normal sound.
    pub normal_set: SampleSet,
    /// Bank of the addition sounds.
    pub addition_set: SampleSet,
    /// Custom sample index, 0 for the skin default.
    pub index: u32,
    /// Volume percentage, 0 to inherit the timing point volume.
    pub volume: u32,
    /// Custom sample file, overriding bank lookup.
    pub filename: Option<String>,
}

/// The sample bank context effective from a point in time onward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSetEvent {
    /// When the context starts, in milliseconds.
    pub time: f64,
    /// The default bank.
    pub sample_set: SampleSet,
    /// The custom sample index.
    pub sample_index: u32,
    /// The default volume percentage.
    pub volume: u32,
}

/// How [`Timeline`] lookups treat the query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// The latest event within `leniency` milliseconds of the query time.
    Exact,
    /// The latest event at or before `time + leniency`.
    Current,
}

/// The two event streams of one document, each ordered by time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    /// Discrete sounds, ordered by time.
    pub sounds: Vec<SoundEvent>,
    /// Sample bank contexts, ordered by time, consecutive duplicates merged.
    pub sample_sets: Vec<SampleSetEvent>,
}

impl Timeline {
    /// Finds a sound event near `time`. Ties between events inside the
    /// window resolve to the later-timestamped one.
    #[must_use]
    pub fn lookup_sound(&self, time: f64, leniency: f64, mode: LookupMode) -> Option<&SoundEvent> {
        lookup(&self.sounds, |event| event.time, time, leniency, mode)
    }

    /// Finds the sample bank context near `time`. Ties between events inside
    /// the window resolve to the later-timestamped one.
    #[must_use]
    pub fn lookup_sample_set(
        &self,
        time: f64,
        leniency: f64,
        mode: LookupMode,
    ) -> Option<&SampleSetEvent> {
        lookup(&self.sample_sets, |event| event.time, time, leniency, mode)
    }
}

fn lookup<'a, T>(
    events: &'a [T],
    event_time: impl Fn(&T) -> f64,
    time: f64,
    leniency: f64,
    mode: LookupMode,
) -> Option<&'a T> {
    let mut found = None;
    for event in events {
        let event_time = event_time(event);
        let hit = match mode {
            LookupMode::Exact => (event_time - time).abs() <= leniency,
            LookupMode::Current => event_time <= time + leniency,
        };
        // scanning in time order, the last hit is the latest one
        if hit {
            found = Some(event);
        }
    }
    found
}

/// Builds both event streams from a document.
#[must_use]
pub fn build_hitsound_timeline(beatmap: &Beatmap) -> Timeline {
    let mut sounds = Vec::new();
    for object in &beatmap.hit_objects {
        match object {
            HitObject::Circle(circle) => {
                sounds.push(object_event(
                    circle.common.time,
                    SoundEventKind::Hit,
                    &circle.common,
                ));
            }
            HitObject::Slider(slider) => {
                let span = beatmap.slider_span_duration(slider).unwrap_or(0.0);
                let start = slider.common.time;
                sounds.push(object_event(start, SoundEventKind::SliderBody, &slider.common));
                let edge = |index: u32| -> EdgeSound {
                    slider.sounds.as_ref().map_or(
                        EdgeSound {
                            sounds: slider.common.sounds,
                            sample: Default::default(),
                        },
                        |edge_sounds| {
                            if index == 0 {
                                edge_sounds.head
                            } else if index == slider.slides {
                                edge_sounds.tail
                            } else {
                                edge_sounds
                                    .repeats
                                    .get(index as usize - 1)
                                    .copied()
                                    .unwrap_or_default()
                            }
                        },
                    )
                };
                for index in 0..=slider.slides {
                    let kind = if index == 0 {
                        SoundEventKind::SliderHead
                    } else if index == slider.slides {
                        SoundEventKind::SliderTail
                    } else {
                        SoundEventKind::SliderRepeat
                    };
                    let edge = edge(index);
                    sounds.push(SoundEvent {
                        time: start + span * f64::from(index),
                        kind,
                        sounds: edge.sounds,
                        normal_set: edge.sample.normal_set,
                        addition_set: edge.sample.addition_set,
                        index: slider.common.sample.as_ref().and_then(|s| s.index).unwrap_or(0),
                        volume: slider.common.sample.as_ref().and_then(|s| s.volume).unwrap_or(0),
                        filename: None,
                    });
                }
            }
            HitObject::Spinner(_) | HitObject::Hold(_) => {}
        }
    }
    sounds.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut sample_sets: Vec<SampleSetEvent> = Vec::new();
    for point in beatmap.timing_points() {
        let event = SampleSetEvent {
            time: point.time(),
            sample_set: point.sample_set(),
            sample_index: point.sample_index(),
            volume: point.volume(),
        };
        // a point that only changes non-sample fields merges into the run
        let duplicate = sample_sets.last().is_some_and(|previous| {
            previous.sample_set == event.sample_set
                && previous.sample_index == event.sample_index
                && previous.volume == event.volume
        });
        if !duplicate {
            sample_sets.push(event);
        }
    }
    sample_sets.sort_by(|a, b| a.time.total_cmp(&b.time));

    Timeline {
        sounds,
        sample_sets,
    }
}

fn object_event(
    time: f64,
    kind: SoundEventKind,
    common: &crate::beatmap::model::hit_object::HitObjectCommon,
) -> SoundEvent {
    let sample = common.sample.as_ref();
    SoundEvent {
        time,
        kind,
        sounds: common.sounds,
        normal_set: sample.map_or(SampleSet::Default, |s| s.normal_set),
        addition_set: sample.map_or(SampleSet::Default, |s| s.addition_set),
        index: sample.and_then(|s| s.index).unwrap_or(0),
        volume: sample.and_then(|s| s.volume).unwrap_or(0),
        filename: sample.and_then(|s| s.filename.clone()),
    }
}
