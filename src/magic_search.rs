//! Magpie - Magic Number Search
//!
//! Offline discovery of the magic multipliers stored in `magics.rs`.
//! Nothing on the move generation or search path calls into this module;
//! only the `find_magics` binary and tests do.
//!
//! The search is a Las Vegas loop: draw a sparse random candidate, index
//! every occupancy subset of the square's relevant mask through it, and
//! accept the candidate if no two subsets with different attack sets share
//! an index.

use rand::{Error, RngCore, SeedableRng};

use crate::attacks::{magic_index, set_occupancy, Slider};
use crate::bitboard::count_bits;
use crate::types::Square;

/// Initial generator state
pub const DEFAULT_SEED: u32 = 1804289383;

/// Candidates tried per square before giving up
pub const MAX_ATTEMPTS: u64 = 100_000_000;

// ============================================================================
// XORSHIFT GENERATOR
// ============================================================================

/// 32-bit xorshift generator (13, 17, 5).
///
/// Deterministic and self-contained: the same seed always yields the same
/// magic numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// A zero state would only ever produce zeros, so it falls back to the
    /// default seed.
    pub fn new(seed: u32) -> Self {
        XorShift32 {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        XorShift32::new(DEFAULT_SEED)
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Built from the low 16 bits of four successive 32-bit draws
    fn next_u64(&mut self) -> u64 {
        let n1 = (self.next_u32() & 0xFFFF) as u64;
        let n2 = (self.next_u32() & 0xFFFF) as u64;
        let n3 = (self.next_u32() & 0xFFFF) as u64;
        let n4 = (self.next_u32() & 0xFFFF) as u64;
        n1 | (n2 << 16) | (n3 << 32) | (n4 << 48)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        XorShift32::new(u32::from_le_bytes(seed))
    }
}

// ============================================================================
// MAGIC DISCOVERY
// ============================================================================

/// Sparse 64-bit candidate: the AND of three draws leaves about eight bits
/// set, which succeeds far more often than a dense value.
pub fn magic_candidate<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Search for a magic multiplier for `slider` on `sq`.
///
/// Returns `None` if `max_attempts` candidates all collide.
pub fn find_magic_number<R: RngCore>(
    sq: Square,
    slider: Slider,
    rng: &mut R,
    max_attempts: u64,
) -> Option<u64> {
    let mask = slider.relevant_mask(sq);
    let bits = count_bits(mask);
    let subsets = 1usize << bits;

    let occupancies: Vec<u64> = (0..subsets).map(|i| set_occupancy(i, bits, mask)).collect();
    let attacks: Vec<u64> = occupancies
        .iter()
        .map(|&occ| slider.attacks_on_the_fly(sq, occ))
        .collect();

    let mut used: Vec<Option<u64>> = vec![None; subsets];

    for _ in 0..max_attempts {
        let magic = magic_candidate(rng);

        // too few high bits cannot spread the index space
        if count_bits(mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000) < 6 {
            continue;
        }

        used.fill(None);
        let collides = occupancies.iter().zip(&attacks).any(|(&occ, &attack)| {
            let slot = &mut used[magic_index(occ, magic, bits)];
            match *slot {
                None => {
                    *slot = Some(attack);
                    false
                }
                Some(existing) => existing != attack,
            }
        });

        if !collides {
            return Some(magic);
        }
    }

    None
}

/// Every square's magics for one generator run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicSet {
    pub rook: [u64; 64],
    pub bishop: [u64; 64],
}

/// Rook squares 0..63 first, then bishop squares 0..63, from one generator.
///
/// Returns the first square that exhausted its attempts as the error.
pub fn find_all_magics<R: RngCore>(
    rng: &mut R,
    max_attempts: u64,
) -> Result<MagicSet, (Slider, Square)> {
    let mut set = MagicSet {
        rook: [0; 64],
        bishop: [0; 64],
    };

    for (slider, out) in [(Slider::Rook, &mut set.rook), (Slider::Bishop, &mut set.bishop)] {
        for (sq, slot) in out.iter_mut().enumerate() {
            *slot = find_magic_number(sq, slider, rng, max_attempts).ok_or((slider, sq))?;
        }
    }

    Ok(set)
}

/// Render a `MagicSet` as the `ROOK_MAGICS` and `BISHOP_MAGICS` arrays of `magics.rs`
pub fn render_magics(set: &MagicSet) -> String {
    let mut out = String::new();

    let mut push_table = |name: &str, values: &[u64; 64]| {
        out.push_str(&format!("pub const {}: [u64; 64] = [\n", name));
        for pair in values.chunks(2) {
            let line: Vec<String> = pair.iter().map(|v| format!("0x{:016x},", v)).collect();
            out.push_str(&format!("    {}\n", line.join(" ")));
        }
        out.push_str("];\n\n");
    };

    push_table("ROOK_MAGICS", &set.rook);
    push_table("BISHOP_MAGICS", &set.bishop);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magics::{BISHOP_MAGICS, ROOK_MAGICS};
    use rand::rngs::StdRng;

    fn is_valid_magic(sq: Square, slider: Slider, magic: u64) -> bool {
        let mask = slider.relevant_mask(sq);
        let bits = count_bits(mask);
        let mut used = vec![None; 1 << bits];
        (0..1usize << bits).all(|i| {
            let occ = set_occupancy(i, bits, mask);
            let attack = slider.attacks_on_the_fly(sq, occ);
            let slot = &mut used[magic_index(occ, magic, bits)];
            match *slot {
                None => {
                    *slot = Some(attack);
                    true
                }
                Some(existing) => existing == attack,
            }
        })
    }

    #[test]
    fn xorshift_sequence_is_fixed() {
        let mut rng = XorShift32::default();
        let first = rng.next_u32();
        let second = rng.next_u32();
        assert_ne!(first, second);

        let mut again = XorShift32::default();
        assert_eq!(again.next_u32(), first);
        assert_eq!(again.next_u32(), second);

        assert_eq!(XorShift32::new(0), XorShift32::default());
        assert_eq!(XorShift32::from_seed(DEFAULT_SEED.to_le_bytes()), XorShift32::default());
    }

    #[test]
    fn fill_bytes_handles_partial_chunks() {
        let mut rng = XorShift32::default();
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn fresh_generator_reproduces_first_rook_magic() {
        let mut rng = XorShift32::default();
        let magic = find_magic_number(0, Slider::Rook, &mut rng, MAX_ATTEMPTS);
        assert_eq!(magic, Some(ROOK_MAGICS[0]));
    }

    #[test]
    fn stored_magics_are_collision_free() {
        for sq in 0..64 {
            assert!(is_valid_magic(sq, Slider::Rook, ROOK_MAGICS[sq]), "rook {}", sq);
            assert!(is_valid_magic(sq, Slider::Bishop, BISHOP_MAGICS[sq]), "bishop {}", sq);
        }
    }

    #[test]
    fn search_works_with_any_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        for sq in [0, 27, 63] {
            let magic = find_magic_number(sq, Slider::Bishop, &mut rng, MAX_ATTEMPTS)
                .expect("bishop magic");
            assert!(is_valid_magic(sq, Slider::Bishop, magic));
        }
    }

    #[test]
    fn zero_attempts_gives_up() {
        let mut rng = XorShift32::default();
        assert_eq!(find_magic_number(0, Slider::Bishop, &mut rng, 0), None);
    }

    #[test]
    fn rendered_tables_contain_constants() {
        let set = MagicSet {
            rook: ROOK_MAGICS,
            bishop: BISHOP_MAGICS,
        };
        let text = render_magics(&set);
        assert!(text.contains("pub const ROOK_MAGICS: [u64; 64] = ["));
        assert!(text.contains("0x8a80104000800020,"));
        assert!(text.contains("pub const BISHOP_MAGICS"));
    }
}
