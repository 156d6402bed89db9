use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Picks an index into a reply pool
pub trait ReplySelector: Send + Sync {
    /// Index in `0..len`; `len` is never zero
    fn select(&self, len: usize) -> usize;
}

/// Draws from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl ReplySelector for RandomSelector {
    fn select(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible sequence from a fixed seed
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ReplySelector for SeededSelector {
    fn select(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }
}

/// Always the same slot, clamped to the pool size
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl ReplySelector for FixedSelector {
    fn select(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// Pick one reply from a non-empty pool
pub fn pick<'a>(selector: &dyn ReplySelector, pool: &[&'a str]) -> &'a str {
    match pool.len() {
        0 => "",
        len => pool[selector.select(len).min(len - 1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: &[&str] = &["a", "b", "c"];

    #[test]
    fn test_fixed_selector_is_clamped() {
        assert_eq!(pick(&FixedSelector(1), POOL), "b");
        assert_eq!(pick(&FixedSelector(10), POOL), "c");
    }

    #[test]
    fn test_seeded_selectors_agree() {
        let first = SeededSelector::new(42);
        let second = SeededSelector::new(42);
        let a: Vec<_> = (0..10).map(|_| pick(&first, POOL)).collect();
        let b: Vec<_> = (0..10).map(|_| pick(&second, POOL)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_selector_stays_in_pool() {
        for _ in 0..50 {
            assert!(POOL.contains(&pick(&RandomSelector, POOL)));
        }
    }
}
