//! Process-wide magic bitboard tables, built once and cloned out to callers.

use once_cell::sync::OnceCell;

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;

#[cfg(feature = "deterministic_magic")]
const MAGIC_SEED: u64 = 0xD6E8_FEB8_6659_FD93;

#[cfg(feature = "load_magic")]
static SERIALIZED_TABLES: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/magic_tables.bin"));

/// Returns a copy of the singleton magic bitboard tables, building them on
/// first use. Building from scratch runs a magic-number search per square
/// and takes a noticeable fraction of a second; callers that need the tables
/// repeatedly (tests, search, perft) should hold onto the returned value
/// rather than calling this on a hot path.
pub fn load_magic_tables() -> MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES.get_or_init(build_tables).clone()
}

#[cfg(feature = "load_magic")]
fn build_tables() -> MagicTables {
    bincode::deserialize(SERIALIZED_TABLES).expect("embedded magic_tables.bin is corrupt")
}

#[cfg(not(feature = "load_magic"))]
fn build_tables() -> MagicTables {
    generate_magic_tables(magic_seed()).expect("magic number search exhausted its attempt budget")
}

#[cfg(all(not(feature = "load_magic"), feature = "deterministic_magic"))]
fn magic_seed() -> MagicTableSeed {
    MagicTableSeed::Fixed(MAGIC_SEED)
}

#[cfg(all(not(feature = "load_magic"), not(feature = "deterministic_magic")))]
fn magic_seed() -> MagicTableSeed {
    MagicTableSeed::Random
}
