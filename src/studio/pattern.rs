//! Generic repeating-subsequence matcher.

/// A repeating subsequence found in a source sequence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    /// The repeated window.
    pub sequence: Vec<usize>,
    /// Occurrences of the window, counting the first one; fractional when a
    /// trailing occurrence matches only a prefix.
    pub repetitions: f64,
    /// Total number of source elements the pattern covers.
    pub length: usize,
    /// Start index of the pattern in the source sequence.
    pub position: usize,
}

/// Finds repeating windows greedily, left to right.
///
/// At each uncovered position every window length is scored by
/// `full_repeats * length`; the first length reaching the maximum wins, so
/// ties fall to the shortest window. A position whose best window never
/// repeats produces no pattern at all: the scan just advances one element,
/// silently dropping isolated values instead of reporting length-1 patterns.
/// Both behaviours are pinned by tests; changing either is a semantic break
/// for consumers aligning two derivations.
#[must_use]
pub fn find_patterns(sequence: &[usize]) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    let mut position = 0;
    while position < sequence.len() {
        let remaining = sequence.len() - position;
        let mut best: Option<(usize, usize, usize)> = None;
        let mut best_score = 0;
        for window_len in 1..=remaining {
            let window = &sequence[position..position + window_len];
            let mut cursor = position + window_len;
            let mut full = 0;
            while cursor + window_len <= sequence.len()
                && sequence[cursor..cursor + window_len] == *window
            {
                full += 1;
                cursor += window_len;
            }
            let mut partial = 0;
            while cursor + partial < sequence.len()
                && partial < window_len
                && sequence[cursor + partial] == window[partial]
            {
                partial += 1;
            }
            let score = full * window_len;
            if best.is_none() || score > best_score {
                best = Some((window_len, full, partial));
                best_score = score;
            }
        }
        let Some((window_len, full, partial)) = best else {
            break;
        };
        if full == 0 {
            position += 1;
            continue;
        }
        let covered = (full + 1) * window_len + partial;
        patterns.push(Pattern {
            sequence: sequence[position..position + window_len].to_vec(),
            repetitions: (full + 1) as f64 + partial as f64 / window_len as f64,
            length: covered,
            position,
        });
        position += covered;
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_full_run_and_drops_trailing_singleton() {
        let patterns = find_patterns(&[0, 1, 0, 1, 0, 1, 2]);
        assert_eq!(patterns.len(), 1);
        let pattern = &patterns[0];
        assert_eq!(pattern.sequence, vec![0, 1]);
        assert_eq!(pattern.repetitions, 3.0);
        assert_eq!(pattern.length, 6);
        assert_eq!(pattern.position, 0);
    }

    #[test]
    fn partial_trailing_match_is_fractional() {
        let patterns = find_patterns(&[1, 2, 3, 1, 2, 3, 1, 2]);
        assert_eq!(patterns.len(), 1);
        let pattern = &patterns[0];
        assert_eq!(pattern.sequence, vec![1, 2, 3]);
        assert_eq!(pattern.length, 8);
        assert!((pattern.repetitions - (2.0 + 2.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn smaller_window_wins_score_ties() {
        // [5,5,5,5]: window 1 scores 3, window 2 scores 2; the run of single
        // fives wins outright, but for [7,7,7,7,7,7] window 1 (score 5) beats
        // window 2 (score 4) and window 3 (score 3) as well.
        let patterns = find_patterns(&[7, 7, 7, 7, 7, 7]);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].sequence, vec![7]);
        assert_eq!(patterns[0].repetitions, 6.0);
    }

    #[test]
    fn non_repeating_elements_vanish_between_patterns() {
        let patterns = find_patterns(&[9, 0, 1, 0, 1, 8, 2, 2]);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].sequence, vec![0, 1]);
        assert_eq!(patterns[0].position, 1);
        assert_eq!(patterns[1].sequence, vec![2]);
        assert_eq!(patterns[1].position, 6);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(find_patterns(&[]).is_empty());
    }
}
