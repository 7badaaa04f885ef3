//! Prelude module for the beatmap codec.
//!
//! Re-exports the public types for convenient access. You can use
//! `use osumap_rs::beatmap::prelude::*;` to import them all at once.

pub use super::{
    DecodeError, LATEST_FORMAT_VERSION, SectionError, SectionName, Span, decode, encode,
    command::{
        Effects, GameMode, OverlayPosition,
        graphics::{Colour, Position},
        sample::{HitSample, SamplePair, SampleSet, Sounds},
    },
    lex::{CommentPolicy, DocumentBlocks, Line, SectionBlock, parse_format_version, split_sections},
    model::{
        Beatmap, ComboColour, Colours, Difficulty, Editor, General, Metadata,
        events::{
            Animate, AnimationElement, AnimationEvent, BackgroundEvent, BreakEvent, Command,
            Easing, Event, EventLayer, LoopCommand, LoopType, Origin, Parameter,
            ParameterCommand, SampleEvent, SpriteEvent, TriggerCommand, VideoEvent,
        },
        hit_object::{
            Circle, CurveType, EdgeSound, HitObject, HitObjectCommon, Hold, Slider,
            SliderSounds, Spinner,
        },
        timing::{
            InheritedTimingPoint, TimingPoint, UninheritedTimingPoint, beat_length_from_bpm,
            bpm_from_beat_length, effective_slider_velocity, governing_signature,
            governing_uninherited,
        },
    },
};
