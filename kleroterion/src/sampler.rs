use rand::{Rng, SeedableRng, rngs::StdRng};
use rustc_hash::FxHashSet;

#[derive(Debug)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller { rng }
    }

    /// Creates a new `Roller` with a seed drawn from this one, so derived
    /// generators (e.g. one per confetti batch) stay independent.
    pub fn fork(&mut self) -> Self {
        let mut seed = [0u8; 32];
        self.rng.fill(&mut seed);
        let rng = StdRng::from_seed(seed);
        Roller { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller { rng }
    }

    /// Uniform index into a collection of `len` elements. `len` must be
    /// non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Uniform float in `[low, high)`.
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        self.rng.random_range(low..high)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

/// Returns one element chosen uniformly. `items` must be non-empty; callers
/// are required to apply the fallback rule (`eligible_pool`) first.
pub fn pick_uniform<'a, T>(roller: &mut Roller, items: &'a [T]) -> &'a T {
    debug_assert!(!items.is_empty(), "pick_uniform requires a non-empty pool");
    &items[roller.index(items.len())]
}

/// The filtered-or-fallback candidate pool: `items` minus excluded keys,
/// or the full unfiltered `items` when the filter would empty the pool.
/// This fallback is what keeps every draw total even when a user excludes
/// an entire category.
fn eligible_pool<'a, T>(
    items: &'a [T],
    excluded: &FxHashSet<String>,
    key: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let filtered: Vec<&T> = items
        .iter()
        .filter(|&t| !excluded.contains(key(t)))
        .collect();
    if filtered.is_empty() {
        items.iter().collect()
    } else {
        filtered
    }
}

/// Uniform pick from `items` minus excluded keys, falling back to the full
/// unfiltered slice when exclusion empties the pool. Never stalls.
pub fn pick_filtered<'a, T>(
    roller: &mut Roller,
    items: &'a [T],
    excluded: &FxHashSet<String>,
    key: impl Fn(&T) -> &str,
) -> &'a T {
    let pool = eligible_pool(items, excluded, key);
    pool[roller.index(pool.len())]
}

/// Two draws with distinct keys from the filtered-or-fallback pool. When
/// the eligible pool holds fewer than two distinct keys the pair
/// degenerates to a duplicate rather than looping.
pub fn pick_distinct_pair<'a, T>(
    roller: &mut Roller,
    items: &'a [T],
    excluded: &FxHashSet<String>,
    key: impl Fn(&T) -> &str,
) -> (&'a T, &'a T) {
    let pool = eligible_pool(items, excluded, &key);
    let first = pool[roller.index(pool.len())];
    if !pool.iter().any(|&t| key(t) != key(first)) {
        return (first, first);
    }
    loop {
        let second = pool[roller.index(pool.len())];
        if key(second) != key(first) {
            return (first, second);
        }
    }
}

/// Like `pick_filtered`, but redraws while the result's key equals
/// `avoid`. When the eligible pool's only distinct key is `avoid` itself,
/// that key is returned once instead of looping.
pub fn pick_avoiding<'a, T>(
    roller: &mut Roller,
    items: &'a [T],
    excluded: &FxHashSet<String>,
    key: impl Fn(&T) -> &str,
    avoid: &str,
) -> &'a T {
    let pool = eligible_pool(items, excluded, &key);
    if !pool.iter().any(|&t| key(t) != avoid) {
        return pool[roller.index(pool.len())];
    }
    loop {
        let candidate = pool[roller.index(pool.len())];
        if key(candidate) != avoid {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn excluded(items: &[&str]) -> FxHashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_uniform_membership() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let picked = pick_uniform(&mut roller, &pool);
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn test_pick_uniform_covers_pool() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let mut roller = Roller::test_rng();
        let mut seen = FxHashSet::default();
        for _ in 0..10000 {
            seen.insert(pick_uniform(&mut roller, &pool).clone());
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_pick_filtered_skips_excluded() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let skip = excluded(&["Scarf"]);
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let picked = pick_filtered(&mut roller, &pool, &skip, |s| s.as_str());
            assert_ne!(picked, "Scarf");
        }
    }

    #[test]
    fn test_pick_filtered_falls_back_to_full_pool() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let skip = excluded(&["Hat", "Scarf", "Badge"]);
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let picked = pick_filtered(&mut roller, &pool, &skip, |s| s.as_str());
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn test_pick_distinct_pair() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let skip = FxHashSet::default();
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let (a, b) = pick_distinct_pair(&mut roller, &pool, &skip, |s| s.as_str());
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_pick_distinct_pair_degenerates_to_duplicate() {
        // A single accessory that is also excluded: the draw falls back to
        // the unfiltered one-entry pool, and the pair must not hang.
        let pool = names(&["Hat"]);
        let skip = excluded(&["Hat"]);
        let mut roller = Roller::test_rng();
        let (a, b) = pick_distinct_pair(&mut roller, &pool, &skip, |s| s.as_str());
        assert_eq!(a, "Hat");
        assert_eq!(b, "Hat");
    }

    #[test]
    fn test_pick_distinct_pair_duplicate_keys_one_identity() {
        // Two entries sharing a key count as one identity.
        let pool = names(&["Hat", "Hat"]);
        let skip = FxHashSet::default();
        let mut roller = Roller::test_rng();
        let (a, b) = pick_distinct_pair(&mut roller, &pool, &skip, |s| s.as_str());
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_avoiding_never_returns_avoided() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let skip = FxHashSet::default();
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let picked = pick_avoiding(&mut roller, &pool, &skip, |s| s.as_str(), "Hat");
            assert_ne!(picked, "Hat");
        }
    }

    #[test]
    fn test_pick_avoiding_single_key_escape() {
        let pool = names(&["Hat"]);
        let skip = FxHashSet::default();
        let mut roller = Roller::test_rng();
        let picked = pick_avoiding(&mut roller, &pool, &skip, |s| s.as_str(), "Hat");
        assert_eq!(picked, "Hat");
    }

    #[test]
    fn test_pick_avoiding_respects_exclusions() {
        let pool = names(&["Hat", "Scarf", "Badge"]);
        let skip = excluded(&["Badge"]);
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            let picked = pick_avoiding(&mut roller, &pool, &skip, |s| s.as_str(), "Hat");
            assert_eq!(picked, "Scarf");
        }
    }

    #[test]
    fn test_fork_diverges() {
        let mut roller = Roller::from_seed(7);
        let mut forked = roller.fork();
        let a: Vec<usize> = (0..16).map(|_| roller.index(1000)).collect();
        let b: Vec<usize> = (0..16).map(|_| forked.index(1000)).collect();
        assert_ne!(a, b);
    }
}
