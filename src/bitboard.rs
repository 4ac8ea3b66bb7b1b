//! Magpie - Bitboard Module
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! board. Bit 0 is a8 and bit 63 is h1, matching `types::Square`.

use crate::types::Square;

/// One bit per square
pub type Bitboard = u64;

// ============================================================================
// CONSTANTS - Files and Ranks
// ============================================================================

pub const FILE_A: Bitboard = 0x0101010101010101;
pub const FILE_B: Bitboard = 0x0202020202020202;
pub const FILE_G: Bitboard = 0x4040404040404040;
pub const FILE_H: Bitboard = 0x8080808080808080;

pub const RANK_8: Bitboard = 0x00000000000000FF;
pub const RANK_7: Bitboard = 0x000000000000FF00;
pub const RANK_2: Bitboard = 0x00FF000000000000;
pub const RANK_1: Bitboard = 0xFF00000000000000;

pub const NOT_FILE_A: Bitboard = !FILE_A;
pub const NOT_FILE_H: Bitboard = !FILE_H;
pub const NOT_FILE_AB: Bitboard = !(FILE_A | FILE_B);
pub const NOT_FILE_GH: Bitboard = !(FILE_G | FILE_H);

// ============================================================================
// BITBOARD UTILITIES
// ============================================================================

/// Create a bitboard with a single bit set at the given square
#[inline]
pub const fn square_bb(sq: Square) -> Bitboard {
    1u64 << sq
}

#[inline]
pub const fn get_bit(bb: Bitboard, sq: Square) -> bool {
    bb & square_bb(sq) != 0
}

#[inline]
pub fn set_bit(bb: &mut Bitboard, sq: Square) {
    *bb |= square_bb(sq);
}

#[inline]
pub fn pop_bit(bb: &mut Bitboard, sq: Square) {
    *bb &= !square_bb(sq);
}

/// Count the number of set bits in a bitboard
#[inline]
pub const fn count_bits(bb: Bitboard) -> u32 {
    bb.count_ones()
}

/// Index of the least significant set bit.
///
/// The bitboard must be non-empty; callers loop on `bb != 0`.
#[inline]
pub fn lsb(bb: Bitboard) -> Square {
    debug_assert!(bb != 0, "lsb of an empty bitboard");
    bb.trailing_zeros() as Square
}

/// Extract and clear the least significant bit, returning its index
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Square {
    let idx = lsb(*bb);
    *bb &= *bb - 1;
    idx
}

/// Get the file (0-7, a-h) of a square
#[inline]
pub const fn file_of(sq: Square) -> usize {
    sq & 7
}

/// Get the row (0-7, rank 8 down to rank 1) of a square
#[inline]
pub const fn rank_of(sq: Square) -> usize {
    sq >> 3
}

// ============================================================================
// DEBUG / DISPLAY
// ============================================================================

/// Render a bitboard as an 8x8 grid, rank 8 on top
pub fn bitboard_to_string(bb: Bitboard) -> String {
    let mut out = String::new();
    for rank in 0..8 {
        out.push_str(&format!(" {}  ", 8 - rank));
        for file in 0..8 {
            let sq = rank * 8 + file;
            out.push_str(if get_bit(bb, sq) { " 1" } else { " ." });
        }
        out.push('\n');
    }
    out.push_str("\n     a b c d e f g h\n");
    out.push_str(&format!("     Bitboard: 0x{:016X}\n", bb));
    out
}
