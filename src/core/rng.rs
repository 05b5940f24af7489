//! Random Number Generation
//!
//! Xorshift128+ behind every probabilistic outcome in the game: mining
//! yield, event rolls, consequence picks, shop greetings. Seeded once per
//! session so a session can be replayed from its seed when debugging.

use sha2::{Digest, Sha256};

/// Session PRNG using the Xorshift128+ algorithm.
///
/// Given the same seed, produces the identical sequence on any platform,
/// which keeps tests reproducible and lets a reported session be replayed
/// from the seed logged at startup.
///
/// # Example
///
/// ```
/// use oreminer::core::rng::GameRng;
///
/// let mut rng = GameRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug)]
pub struct GameRng {
    state: [u64; 2],
}

impl GameRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create the RNG for one play session.
    ///
    /// The seed is derived from the player name and the session start
    /// time, so two sessions never share loot pools or event rolls.
    pub fn for_session(player_name: &str, unix_millis: i64) -> Self {
        Self::new(derive_session_seed(player_name, unix_millis))
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a uniform f64 in [0, 1).
    ///
    /// Uses the upper 53 bits, the standard mantissa-filling construction.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / 9007199254740992.0)
    }

    /// Generate a random integer in range [0, max).
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple modulo - slight bias for very large max, but acceptable
        (self.next_u64() % max as u64) as u32
    }

    /// Generate a random integer in the inclusive range [min, max].
    #[inline]
    pub fn next_int_range(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i64
    }

    /// Bernoulli trial: true with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Select a random element from a slice, uniformly.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_int(slice.len() as u32) as usize;
            Some(&slice[idx])
        }
    }

    /// Select an index with probability proportional to its weight.
    ///
    /// Weights need not sum to 1: the draw renormalizes by the total, so
    /// five weights of 0.1 each select every index with probability 0.2.
    /// Returns `None` when the slice is empty or no weight is positive.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let roll = self.next_f64() * total;
        let mut acc = 0.0;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            acc += w;
            if roll < acc {
                return Some(i);
            }
        }
        // Floating-point accumulation can leave roll == total; last
        // positive weight takes it.
        weights.iter().rposition(|w| *w > 0.0)
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a session seed from the player name and session start time.
///
/// Hashed rather than used raw so that similar names and close start
/// times still land far apart in seed space.
pub fn derive_session_seed(player_name: &str, unix_millis: i64) -> u64 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"OREMINER_SEED_V1");

    hasher.update(player_name.as_bytes());
    hasher.update(unix_millis.to_le_bytes());

    let hash = hasher.finalize();

    // Take first 8 bytes as seed
    u64::from_le_bytes(hash[0..8].try_into().unwrap())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = GameRng::new(12345);
        let mut rng2 = GameRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_known_values() {
        // Verify specific output for regression testing
        let mut rng = GameRng::new(42);
        let val1 = rng.next_u64();
        let val2 = rng.next_u64();
        let val3 = rng.next_u64();

        // These values must never change!
        // If they do, seed-based session replay breaks.
        assert_eq!(val1, 16629283624882167704);
        assert_eq!(val2, 1420492921613871959);
        assert_eq!(val3, 9768315062676884790);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_int() {
        let mut rng = GameRng::new(1234);

        for _ in 0..1000 {
            let val = rng.next_int(100);
            assert!(val < 100);
        }

        // Edge case: max = 0
        assert_eq!(rng.next_int(0), 0);

        // Edge case: max = 1
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_next_int_range() {
        let mut rng = GameRng::new(5678);

        for _ in 0..1000 {
            let val = rng.next_int_range(1, 2);
            assert!(val == 1 || val == 2);
        }

        // Edge case: min = max
        assert_eq!(rng.next_int_range(5, 5), 5);

        // Edge case: inverted range collapses to min
        assert_eq!(rng.next_int_range(9, 3), 9);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::new(31337);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(2024);
        let items = [10, 20, 30];

        for _ in 0..100 {
            let picked = rng.choose(&items).unwrap();
            assert!(items.contains(picked));
        }

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_weighted_index_renormalizes() {
        // Five equal weights of 0.1 sum to 0.5; the draw must renormalize
        // so each index is picked with effective probability 0.2.
        let mut rng = GameRng::new(99);
        let weights = [0.1; 5];
        let mut counts = [0u32; 5];

        for _ in 0..10_000 {
            let idx = rng.weighted_index(&weights).unwrap();
            counts[idx] += 1;
        }

        for count in counts {
            // 0.2 +/- generous tolerance at n=10k
            assert!((1500..=2500).contains(&count), "skewed count: {count}");
        }
    }

    #[test]
    fn test_weighted_index_degenerate() {
        let mut rng = GameRng::new(1);

        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(rng.weighted_index(&[-1.0, 0.0]), None);

        // Single positive weight always wins, zero/negative are skipped
        for _ in 0..100 {
            assert_eq!(rng.weighted_index(&[0.0, 3.0, 0.0]), Some(1));
            assert_eq!(rng.weighted_index(&[-0.5, 0.0, 2.0]), Some(2));
        }
    }

    #[test]
    fn test_derive_session_seed() {
        let seed1 = derive_session_seed("Dusty", 1_700_000_000_000);
        let seed2 = derive_session_seed("Dusty", 1_700_000_000_000);

        // Same inputs = same seed
        assert_eq!(seed1, seed2);
        assert_eq!(seed1, 6077737236396741678);

        // Different name or start time = different seed
        assert_ne!(seed1, derive_session_seed("Rusty", 1_700_000_000_000));
        assert_ne!(seed1, derive_session_seed("Dusty", 1_700_000_000_001));
    }

    #[test]
    fn test_determinism_holds_for_arbitrary_seeds() {
        // Fuzz: any seed replays identically.
        for _ in 0..50 {
            let seed: u64 = rand::random();
            let mut a = GameRng::new(seed);
            let mut b = GameRng::new(seed);
            for _ in 0..100 {
                assert_eq!(a.next_u64(), b.next_u64());
            }
        }
    }

    #[test]
    fn test_session_rng_matches_derived_seed() {
        let seed = derive_session_seed("", 0);
        assert_eq!(seed, 11878203237805440973);

        let mut a = GameRng::for_session("", 0);
        let mut b = GameRng::new(seed);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }
}
