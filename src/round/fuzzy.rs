//! Bounded edit distance for grading free-text answers.
//!
//! Only a diagonal band of the Levenshtein table is filled in, so the work is
//! proportional to `cutoff` times the input length instead of the product of
//! both lengths.

/// Largest edit distance at which an open answer still counts as a match.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Levenshtein distance between `a` and `b`, or `None` once it is known to
/// exceed `cutoff`.
pub fn distance(a: &str, b: &str, cutoff: usize) -> Option<usize> {
    bounded(a, b, cutoff).0
}

/// Whether `submitted` is within [`MAX_EDIT_DISTANCE`] edits of `canonical`.
///
/// An empty submission never matches.
pub fn is_close_enough(canonical: &str, submitted: &str) -> bool {
    !submitted.is_empty() && distance(canonical, submitted, MAX_EDIT_DISTANCE).is_some()
}

/// Returns the bounded distance together with the number of table cells
/// that were evaluated.
fn bounded(a: &str, b: &str, cutoff: usize) -> (Option<usize>, usize) {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let (n, m) = (short.len(), long.len());

    if m - n > cutoff {
        return (None, 0);
    }
    if n == 0 {
        return (Some(m), 0);
    }
    // The distance never exceeds the longer length; keeps the band arithmetic
    // below overflow for huge cutoffs.
    let cutoff = cutoff.min(m);

    // Any value above the cutoff is as good as infinity.
    let big = cutoff + 1;
    let mut prev: Vec<usize> = (0..=n).map(|i| i.min(big)).collect();
    let mut curr = vec![big; n + 1];
    let mut cells = 0;

    for j in 1..=m {
        let lo = j.saturating_sub(cutoff).max(1);
        let hi = (j + cutoff).min(n);

        curr[0] = j.min(big);
        let mut row_min = if lo == 1 { curr[0] } else { big };
        if lo > 1 {
            curr[lo - 1] = big;
        }

        for i in lo..=hi {
            let cost = usize::from(short[i - 1] != long[j - 1]);
            let value = (prev[i - 1] + cost)
                .min(prev[i] + 1)
                .min(curr[i - 1] + 1)
                .min(big);
            curr[i] = value;
            row_min = row_min.min(value);
            cells += 1;
        }
        if hi < n {
            curr[hi + 1] = big;
        }

        if row_min > cutoff {
            return (None, cells);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let result = prev[n];
    ((result <= cutoff).then_some(result), cells)
}
