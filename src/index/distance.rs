//! Bounded edit distance
//!
//! Levenshtein distance (unit cost insert/delete/substitute) computed over a
//! diagonal band of width `2 * max + 1`. Cells outside the band can never
//! lead to a distance within `max`, so they are treated as unreachable.

/// Edit distance between `a` and `b` if it is at most `max`.
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    bounded_levenshtein_chars(&a, &b, max)
}

/// Character-slice variant of [`bounded_levenshtein`].
pub fn bounded_levenshtein_chars(a: &[char], b: &[char], max: usize) -> Option<usize> {
    let (n, m) = (a.len(), b.len());
    if n.abs_diff(m) > max {
        return None;
    }
    if n == 0 || m == 0 {
        return Some(n.max(m));
    }

    let unreachable = max + 1;
    let mut prev = vec![unreachable; m + 1];
    let mut curr = vec![unreachable; m + 1];
    for (j, cell) in prev.iter_mut().enumerate().take(max.min(m) + 1) {
        *cell = j;
    }

    for i in 1..=n {
        let lo = i.saturating_sub(max).max(1);
        let hi = (i + max).min(m);

        curr.fill(unreachable);
        if i <= max {
            curr[0] = i;
        }

        let mut row_min = curr[0];
        for j in lo..=hi {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let value = (prev[j - 1] + cost)
                .min(prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(unreachable);
            curr[j] = value;
            row_min = row_min.min(value);
        }

        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[m];
    (distance <= max).then_some(distance)
}
