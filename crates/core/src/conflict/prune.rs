//! Multiset pruning of lines shared by both sides of a hunk.

use std::collections::HashMap;

/// Cancel lines present on both sides, one occurrence at a time.
///
/// Each side is treated as a multiset: a line that appears `n` times in
/// `ours` and `m` times in `theirs` survives `n - min(n, m)` times on the
/// ours side and `m - min(n, m)` times on the theirs side. Order among the
/// surviving lines is preserved; position of the cancelled lines is ignored,
/// so pure reorderings prune to nothing.
pub fn prune_common_lines<S: AsRef<str>>(ours: &[S], theirs: &[S]) -> (Vec<String>, Vec<String>) {
    (
        residual(ours, counts(theirs)),
        residual(theirs, counts(ours)),
    )
}

fn counts<S: AsRef<str>>(lines: &[S]) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for line in lines {
        *map.entry(line.as_ref()).or_insert(0) += 1;
    }
    map
}

fn residual<S: AsRef<str>>(lines: &[S], mut other: HashMap<&str, usize>) -> Vec<String> {
    let mut unique = Vec::new();
    for line in lines {
        match other.get_mut(line.as_ref()) {
            Some(n) if *n > 0 => *n -= 1,
            _ => unique.push(line.as_ref().to_string()),
        }
    }
    unique
}
