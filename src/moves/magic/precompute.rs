//! Builds a full set of rook/bishop magic tables from scratch by searching
//! for collision-free magic numbers against the scan-based reference attacks.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};

/// How the magic numbers backing a freshly generated `MagicTables` are chosen.
pub enum MagicTableSeed {
    /// Deterministic search, reproducible across runs and machines.
    Fixed(u64),
    /// Search seeded from OS randomness.
    Random,
}

fn rook_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;
    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in 1..rank {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in 1..file {
        mask |= 1u64 << (rank * 8 + f);
    }
    mask
}

fn bishop_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    let (mut r, mut f) = (rank + 1, file + 1);
    while r <= 6 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f += 1;
    }
    let (mut r, mut f) = (rank - 1, file - 1);
    while r >= 1 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f -= 1;
    }
    let (mut r, mut f) = (rank + 1, file - 1);
    while r <= 6 && f >= 1 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f -= 1;
    }
    let (mut r, mut f) = (rank - 1, file + 1);
    while r >= 1 && f <= 6 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f += 1;
    }
    mask
}

/// Enumerates every subset of `mask`, including the empty set, via the
/// carry-rippler trick.
fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry(
    square: usize,
    mask: u64,
    attacks_fn: impl Fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> Result<MagicEntry, String> {
    let shift = 64 - mask.count_ones();
    let blockers = blocker_subsets(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacks_fn(square, b)).collect();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let mut table = vec![0u64; 1usize << mask.count_ones()];
    for (&b, &a) in blockers.iter().zip(attacks.iter()) {
        let index = ((b.wrapping_mul(magic)) >> shift) as usize;
        table[index] = a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut bytes);
            StdRng::from_seed(bytes)
        }
    };

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        rook_entries.push(build_entry(
            square,
            rook_mask(square),
            rook_attacks_per_square,
            &mut rng,
        )?);
        bishop_entries.push(build_entry(
            square,
            bishop_mask(square),
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables { entries: rook_entries },
        bishop: BishopMagicTables { entries: bishop_entries },
    })
}
