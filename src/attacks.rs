//! Magpie - Attack Tables Module
//!
//! Precomputed attack sets for every piece type:
//! - pawn, knight and king tables are built at compile time,
//! - bishop and rook tables use magic bitboards and are built once at
//!   startup behind a `OnceLock`.
//!
//! Queen attacks are the union of the bishop and rook lookups.

use std::sync::OnceLock;

use crate::bitboard::*;
use crate::magics::{BISHOP_MAGICS, BISHOP_RELEVANT_BITS, ROOK_MAGICS, ROOK_RELEVANT_BITS};
use crate::types::{Color, Square};

// ============================================================================
// LEAPER ATTACK TABLES
// ============================================================================

/// Pawn attack table - [color][square] where 0=white, 1=black
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = init_pawn_attacks();

/// Knight attack table - attacks from each square
pub static KNIGHT_ATTACKS: [Bitboard; 64] = init_knight_attacks();

/// King attack table - attacks from each square
pub static KING_ATTACKS: [Bitboard; 64] = init_king_attacks();

const fn pawn_attacks_from(color: Color, sq: Square) -> Bitboard {
    let bb = square_bb(sq);
    let mut attacks = 0u64;

    match color {
        // White pawns capture towards rank 8 (lower indices)
        Color::White => {
            if (bb >> 7) & NOT_FILE_A != 0 {
                attacks |= bb >> 7;
            }
            if (bb >> 9) & NOT_FILE_H != 0 {
                attacks |= bb >> 9;
            }
        }
        Color::Black => {
            if (bb << 7) & NOT_FILE_H != 0 {
                attacks |= bb << 7;
            }
            if (bb << 9) & NOT_FILE_A != 0 {
                attacks |= bb << 9;
            }
        }
    }

    attacks
}

const fn knight_attacks_from(sq: Square) -> Bitboard {
    let bb = square_bb(sq);
    let mut attacks = 0u64;

    // Towards rank 8
    if (bb >> 17) & NOT_FILE_H != 0 {
        attacks |= bb >> 17;
    }
    if (bb >> 15) & NOT_FILE_A != 0 {
        attacks |= bb >> 15;
    }
    if (bb >> 10) & NOT_FILE_GH != 0 {
        attacks |= bb >> 10;
    }
    if (bb >> 6) & NOT_FILE_AB != 0 {
        attacks |= bb >> 6;
    }

    // Towards rank 1
    if (bb << 17) & NOT_FILE_A != 0 {
        attacks |= bb << 17;
    }
    if (bb << 15) & NOT_FILE_H != 0 {
        attacks |= bb << 15;
    }
    if (bb << 10) & NOT_FILE_AB != 0 {
        attacks |= bb << 10;
    }
    if (bb << 6) & NOT_FILE_GH != 0 {
        attacks |= bb << 6;
    }

    attacks
}

const fn king_attacks_from(sq: Square) -> Bitboard {
    let bb = square_bb(sq);
    let mut attacks = 0u64;

    // Vertical steps fall off the board on their own
    attacks |= bb >> 8;
    attacks |= bb << 8;

    if (bb >> 9) & NOT_FILE_H != 0 {
        attacks |= bb >> 9;
    }
    if (bb >> 7) & NOT_FILE_A != 0 {
        attacks |= bb >> 7;
    }
    if (bb >> 1) & NOT_FILE_H != 0 {
        attacks |= bb >> 1;
    }
    if (bb << 9) & NOT_FILE_A != 0 {
        attacks |= bb << 9;
    }
    if (bb << 7) & NOT_FILE_H != 0 {
        attacks |= bb << 7;
    }
    if (bb << 1) & NOT_FILE_A != 0 {
        attacks |= bb << 1;
    }

    attacks
}

const fn init_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[0u64; 64]; 2];
    let mut sq = 0usize;

    while sq < 64 {
        attacks[0][sq] = pawn_attacks_from(Color::White, sq);
        attacks[1][sq] = pawn_attacks_from(Color::Black, sq);
        sq += 1;
    }

    attacks
}

const fn init_knight_attacks() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        attacks[sq] = knight_attacks_from(sq);
        sq += 1;
    }

    attacks
}

const fn init_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        attacks[sq] = king_attacks_from(sq);
        sq += 1;
    }

    attacks
}

// ============================================================================
// SLIDER MASKS AND RAY WALKS
// ============================================================================

const BISHOP_RAYS: [(i32, i32); 4] = [(1, 1), (-1, -1), (-1, 1), (1, -1)];
const ROOK_RAYS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// The two sliding piece shapes that own a magic table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    fn rays(self) -> &'static [(i32, i32); 4] {
        match self {
            Slider::Bishop => &BISHOP_RAYS,
            Slider::Rook => &ROOK_RAYS,
        }
    }

    /// Squares whose occupancy can change this slider's attacks from `sq`.
    ///
    /// Each ray stops one square short of the board edge: an edge square
    /// never shadows anything behind it.
    pub fn relevant_mask(self, sq: Square) -> Bitboard {
        let mut mask = 0u64;
        let rank = rank_of(sq) as i32;
        let file = file_of(sq) as i32;

        for &(dr, df) in self.rays() {
            let (mut r, mut f) = (rank + dr, file + df);
            loop {
                let next_r = r + dr;
                let next_f = f + df;
                // rook rays only hit the edge along their own axis
                let inside_r = if dr == 0 { true } else { (0..8).contains(&next_r) };
                let inside_f = if df == 0 { true } else { (0..8).contains(&next_f) };
                if !(0..8).contains(&r) || !(0..8).contains(&f) || !inside_r || !inside_f {
                    break;
                }
                set_bit(&mut mask, (r * 8 + f) as Square);
                r = next_r;
                f = next_f;
            }
        }

        mask
    }

    /// Attack set from `sq` computed by walking every ray until it leaves
    /// the board or crosses the first blocker (which is included).
    pub fn attacks_on_the_fly(self, sq: Square, blockers: Bitboard) -> Bitboard {
        let mut attacks = 0u64;
        let rank = rank_of(sq) as i32;
        let file = file_of(sq) as i32;

        for &(dr, df) in self.rays() {
            let (mut r, mut f) = (rank + dr, file + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let target = (r * 8 + f) as Square;
                set_bit(&mut attacks, target);
                if get_bit(blockers, target) {
                    break;
                }
                r += dr;
                f += df;
            }
        }

        attacks
    }

    pub fn magic(self, sq: Square) -> u64 {
        match self {
            Slider::Bishop => BISHOP_MAGICS[sq],
            Slider::Rook => ROOK_MAGICS[sq],
        }
    }

    pub fn relevant_bits(self, sq: Square) -> u32 {
        match self {
            Slider::Bishop => BISHOP_RELEVANT_BITS[sq],
            Slider::Rook => ROOK_RELEVANT_BITS[sq],
        }
    }
}

/// Map the low `bits` bits of `index` onto the set bits of `mask`,
/// lowest mask bit first. Enumerating `index` over `0..1 << bits` yields
/// every subset of `mask` exactly once.
pub fn set_occupancy(index: usize, bits: u32, mut mask: Bitboard) -> Bitboard {
    let mut occupancy = 0u64;

    for count in 0..bits {
        let sq = pop_lsb(&mut mask);
        if index & (1 << count) != 0 {
            set_bit(&mut occupancy, sq);
        }
    }

    occupancy
}

/// Index of `occupancy` in a square's magic sub-table
#[inline]
pub fn magic_index(occupancy: Bitboard, magic: u64, bits: u32) -> usize {
    (occupancy.wrapping_mul(magic) >> (64 - bits)) as usize
}

// ============================================================================
// MAGIC SLIDER TABLES
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    bits: u32,
    offset: usize,
}

/// Magic-indexed attack table for one slider shape
pub struct SliderAttacks {
    entries: [MagicEntry; 64],
    table: Vec<Bitboard>,
}

impl SliderAttacks {
    /// Fill every square's sub-table from the hard-coded magics
    pub fn new(slider: Slider) -> Self {
        let mut entries = [MagicEntry::default(); 64];
        let mut offset = 0usize;

        for (sq, entry) in entries.iter_mut().enumerate() {
            let bits = slider.relevant_bits(sq);
            *entry = MagicEntry {
                mask: slider.relevant_mask(sq),
                magic: slider.magic(sq),
                bits,
                offset,
            };
            offset += 1 << bits;
        }

        let mut table = vec![0u64; offset];
        for (sq, entry) in entries.iter().enumerate() {
            for index in 0..(1usize << entry.bits) {
                let occupancy = set_occupancy(index, entry.bits, entry.mask);
                let slot = entry.offset + magic_index(occupancy, entry.magic, entry.bits);
                table[slot] = slider.attacks_on_the_fly(sq, occupancy);
            }
        }

        SliderAttacks { entries, table }
    }

    #[inline]
    pub fn get(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let entry = &self.entries[sq];
        self.table[entry.offset + magic_index(occupancy & entry.mask, entry.magic, entry.bits)]
    }
}

/// Both slider tables, built once per process
pub struct AttackTables {
    pub bishop: SliderAttacks,
    pub rook: SliderAttacks,
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

impl AttackTables {
    fn build() -> Self {
        AttackTables {
            bishop: SliderAttacks::new(Slider::Bishop),
            rook: SliderAttacks::new(Slider::Rook),
        }
    }
}

/// Build the slider tables now instead of on first lookup
pub fn init() {
    tables();
}

#[inline]
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::build)
}

// ============================================================================
// LOOKUPS
// ============================================================================

#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq]
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq]
}

#[inline]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    tables().bishop.get(sq, occupancy)
}

#[inline]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    tables().rook.get(sq, occupancy)
}

#[inline]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    let tables = tables();
    tables.bishop.get(sq, occupancy) | tables.rook.get(sq, occupancy)
}
