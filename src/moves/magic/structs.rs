use serde::{Deserialize, Serialize};

/// A single magic bitboard entry used to compute sliding piece attacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicEntry {
    /// The magic number used to hash blocker bitboards into attack indices.
    pub magic: u64,

    /// The number of bits to shift after multiplication to get the table index.
    pub shift: u32,

    /// The precomputed vision mask for this square.
    pub mask: u64,

    /// The precomputed attack table indexed by (blockers * magic) >> shift.
    pub table: Box<[u64]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RookMagicTables {
    pub entries: Vec<MagicEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BishopMagicTables {
    pub entries: Vec<MagicEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagicTables {
    pub rook: RookMagicTables,
    pub bishop: BishopMagicTables,
}

/// Shared by rook/bishop lookup: mask off irrelevant occupancy, hash through
/// the magic multiply, and index the precomputed table.
#[inline(always)]
fn magic_lookup(entries: &[MagicEntry], square: usize, blockers: u64) -> u64 {
    let entry = &entries[square];
    let masked = blockers & entry.mask;
    let index = ((masked.wrapping_mul(entry.magic)) >> entry.shift) as usize;
    entry.table[index]
}

impl RookMagicTables {
    /// Returns the rook attack bitboard for a given square and blockers.
    #[inline(always)]
    pub fn get_attacks(&self, square: usize, blockers: u64) -> u64 {
        magic_lookup(&self.entries, square, blockers)
    }
}

impl BishopMagicTables {
    /// Returns the bishop attack bitboard for a given square and blockers.
    #[inline(always)]
    pub fn get_attacks(&self, square: usize, blockers: u64) -> u64 {
        magic_lookup(&self.entries, square, blockers)
    }
}

impl MagicTables {
    /// Returns queen attacks by combining rook and bishop magic lookups.
    #[inline(always)]
    pub fn queen_attacks(&self, square: usize, blockers: u64) -> u64 {
        let rook = self.rook.get_attacks(square, blockers);
        let bishop = self.bishop.get_attacks(square, blockers);
        rook | bishop
    }
}
