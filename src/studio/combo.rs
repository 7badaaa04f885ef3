//! Combo colour index derivation.

use crate::beatmap::model::{Beatmap, HitObject};

/// The palette index a new combo starts with, at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboIndex {
    /// Hit time of the object starting the combo.
    pub time: f64,
    /// Index into the palette, in order of appearance in `[Colours]`.
    pub index: usize,
}

/// Derives the palette index of every combo start.
///
/// Objects with the new-combo flag advance the index by one plus their combo
/// colour offset, modulo the palette size; spinners never affect colours and
/// are skipped. With an empty palette the derivation is undefined, so the
/// result short-circuits to empty and callers must not rely on it.
#[must_use]
pub fn derive_combo_indices(beatmap: &Beatmap) -> Vec<ComboIndex> {
    let palette_len = beatmap.combo_colours().len();
    if palette_len == 0 {
        return Vec::new();
    }
    let mut last: i64 = -1;
    let mut indices = Vec::new();
    for object in &beatmap.hit_objects {
        let common = object.common();
        if !common.new_combo || matches!(object, HitObject::Spinner(_)) {
            continue;
        }
        let index =
            (last + 1 + i64::from(common.combo_offset)).rem_euclid(palette_len as i64);
        indices.push(ComboIndex {
            time: common.time,
            index: index as usize,
        });
        last = index;
    }
    indices
}
