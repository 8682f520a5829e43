//! Bucket sizing: the live bucket count is the smallest prime not below the
//! requested count.

/// Smallest bucket count handed out, used for requests of 0 and 1.
pub const MIN_BUCKETS: usize = 2;

/// Trial division over `6k ± 1` candidates.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5usize;
    // d <= n / d avoids overflowing d * d near usize::MAX.
    while d <= n / d {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Returns the smallest prime `>= max(n, MIN_BUCKETS)`, or `None` when no
/// such prime fits in `usize`.
pub fn next_prime_at_least(n: usize) -> Option<usize> {
    let mut candidate = n.max(MIN_BUCKETS);
    if candidate > 2 && candidate % 2 == 0 {
        candidate = candidate.checked_add(1)?;
    }
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = if candidate == 2 {
            3
        } else {
            candidate.checked_add(2)?
        };
    }
}
