//! "Did you mean" lookup over the command index.

use crate::index::CommandIndex;

/// Inputs shorter than this never get a suggestion.
const MIN_INPUT_LEN: usize = 2;
/// Candidates whose length differs from the input by more than this are skipped.
const MAX_LEN_DIFF: usize = 2;

/// Levenshtein edit distance: the minimum number of single-character
/// insertions, deletions and substitutions turning `a` into `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut matrix = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }
    matrix[m][n]
}

/// Largest distance still accepted for an input of `len` characters.
fn max_distance(len: usize) -> usize {
    len / 3 + 1
}

/// Return the indexed name closest to `input`, or `None` if nothing is close
/// enough.
///
/// A candidate is accepted when its distance is at most `len(input) / 3 + 1`
/// and strictly smaller than the best found so far, so among equally close
/// names the one met first in index order wins.
pub fn closest(input: &str, index: &CommandIndex) -> Option<String> {
    let input_len = input.chars().count();
    if input_len < MIN_INPUT_LEN {
        return None;
    }
    let limit = max_distance(input_len);

    let mut best: Option<(usize, &str)> = None;
    for candidate in index.iter() {
        if input_len.abs_diff(candidate.chars().count()) > MAX_LEN_DIFF {
            continue;
        }
        let distance = levenshtein(input, candidate);
        if distance > limit {
            continue;
        }
        match best {
            Some((best_distance, _)) if distance >= best_distance => {}
            _ => best = Some((distance, candidate)),
        }
    }

    log::debug!("closest({:?}) = {:?}", input, best);
    best.map(|(_, name)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> CommandIndex {
        names.iter().copied().collect()
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("sl", "ls"), 2);
        assert_eq!(levenshtein("gerp", "grep"), 2);
    }

    #[test]
    fn test_levenshtein_identity_and_symmetry() {
        let words = ["", "a", "ls", "cat", "kitten", "sitting", "nonexistentcmd"];
        for a in words {
            assert_eq!(levenshtein(a, a), 0);
            for b in words {
                assert_eq!(levenshtein(a, b), levenshtein(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_single_char_input_never_matches() {
        let idx = index(&["g", "gi", "ls", "ps", "cat"]);
        assert_eq!(closest("g", &idx), None);
        assert_eq!(closest("l", &idx), None);
        assert_eq!(closest("", &idx), None);
    }

    #[test]
    fn test_threshold_for_two_char_input_is_one() {
        // "sl" -> "ls" and "sl" -> "ps" are both distance 2, over 2 / 3 + 1 = 1.
        let idx = index(&["ls", "ps", "cat"]);
        assert_eq!(closest("sl", &idx), None);
        // "lx" -> "ls" is distance 1.
        assert_eq!(closest("lx", &idx), Some("ls".to_string()));
    }

    #[test]
    fn test_picks_smallest_distance() {
        let idx = index(&["grep", "egrep", "gre"]);
        // "grepp": grep = 1, egrep = 2, gre = 2.
        assert_eq!(closest("grepp", &idx), Some("grep".to_string()));
    }

    #[test]
    fn test_tie_goes_to_first_candidate() {
        assert_eq!(closest("cst", &index(&["cat", "cut"])), Some("cat".to_string()));
        assert_eq!(closest("cst", &index(&["cut", "cat"])), Some("cut".to_string()));
    }

    #[test]
    fn test_length_prefilter_skips_far_lengths() {
        // Distance 3 would pass the limit of 9 / 3 + 1 = 4, but length differs by 3.
        let idx = index(&["abcdefghijkl"]);
        assert_eq!(closest("abcdefghi", &idx), None);
    }

    #[test]
    fn test_one_edit_away_is_suggested() {
        let idx = index(&["ls", "nonexistentcmd2"]);
        assert_eq!(
            closest("nonexistentcmd", &idx),
            Some("nonexistentcmd2".to_string())
        );
    }

    #[test]
    fn test_empty_index_has_no_suggestion() {
        assert_eq!(closest("ls", &CommandIndex::default()), None);
    }
}
