use rand::RngCore;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

const MAX_CANDIDATE_ATTEMPTS: u32 = 1_000_000;

/// AND three random draws together to bias toward a sparse bit pattern,
/// which lowers collision odds in the `blocker * magic >> shift` index.
#[inline(always)]
pub fn random_sparse_u64<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// A magic is valid only if every (blocker, attack) pair that collides on the
/// same index also agrees on the attack set — i.e. no two different attack
/// sets are ever forced to share a slot.
pub fn is_magic_candidate_valid(blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> bool {
    let mut seen: HashMap<u64, u64> = HashMap::new();

    for (&blocker, &attack) in blockers.iter().zip(attacks) {
        let index = blocker.wrapping_mul(magic) >> shift;
        match seen.entry(index) {
            Entry::Vacant(e) => {
                e.insert(attack);
            }
            Entry::Occupied(e) if *e.get() != attack => return false,
            Entry::Occupied(_) => {}
        }
    }

    true
}

pub fn find_magic_number_for_square<R: RngCore>(
    blockers: &[u64],
    attacks: &[u64],
    shift: u32,
    rng: &mut R,
) -> Result<u64, String> {
    for _attempt in 0..MAX_CANDIDATE_ATTEMPTS {
        let magic = random_sparse_u64(rng);
        if is_magic_candidate_valid(blockers, attacks, magic, shift) {
            return Ok(magic);
        }
    }
    Err(format!(
        "failed to find a valid magic number after {MAX_CANDIDATE_ATTEMPTS} attempts"
    ))
}
