//! Deterministic order address derivation.
//!
//! Orders are compressed accounts addressed inside a single well-known
//! address tree. The address is a pure function of `(maker, unique_id)`,
//! which lets callers both create new orders and locate existing ones
//! without any lookup table.

use rand::Rng;
use solana_sdk::{keccak, pubkey::Pubkey};

use crate::constants::{ADDRESS_TREE, PROGRAM_ID};

/// Leading seed of every order address. Protocol constant: reordering or
/// renaming it silently orphans all existing orders.
const ADDRESS_SEED_TAG: &[u8] = b"escrow";

/// BN254 scalar field modulus, big-endian. Addresses must be below this so
/// they fit the proving system's field elements.
const FIELD_SIZE: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58,
    0x5d, 0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00,
    0x00, 0x01,
];

/// Hash a seed sequence into a single program-scoped 32-byte seed.
///
/// The leading byte is zeroed so the result is always a valid field element.
fn hashv_to_bn254_field_size_be(inputs: &[&[u8]]) -> [u8; 32] {
    let mut slices: Vec<&[u8]> = Vec::with_capacity(inputs.len() + 1);
    slices.extend_from_slice(inputs);
    slices.push(&[u8::MAX]);
    let mut hash = keccak::hashv(&slices).to_bytes();
    hash[0] = 0;
    hash
}

/// Hash arbitrary bytes into the field by grinding a bump byte downwards
/// until the digest is below the modulus.
fn hash_to_bn254_field_size_be(bytes: &[u8]) -> [u8; 32] {
    for bump in (0..=u8::MAX).rev() {
        let hash = keccak::hashv(&[bytes, &[bump]]).to_bytes();
        if hash.as_slice() < FIELD_SIZE.as_slice() {
            return hash;
        }
    }
    unreachable!("no valid bump seed in 256 attempts");
}

/// Combine raw seeds into the program-scoped address seed
pub fn derive_address_seed(seeds: &[&[u8]], program_id: &Pubkey) -> [u8; 32] {
    let mut inputs: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
    inputs.push(program_id.as_ref());
    inputs.extend_from_slice(seeds);
    hashv_to_bn254_field_size_be(&inputs)
}

/// Compute the order address for `(maker, unique_id)`.
///
/// Pure and deterministic: the same inputs always yield the same address.
pub fn derive_order_address(maker: &Pubkey, unique_id: u64) -> Pubkey {
    let id_bytes = unique_id.to_le_bytes();
    let seed = derive_address_seed(
        &[ADDRESS_SEED_TAG, id_bytes.as_ref(), maker.as_ref()],
        &PROGRAM_ID,
    );

    let mut input = Vec::with_capacity(64);
    input.extend_from_slice(ADDRESS_TREE.as_ref());
    input.extend_from_slice(&seed);
    Pubkey::new_from_array(hash_to_bn254_field_size_be(&input))
}

/// Draw a fresh order nonce from two independent 32-bit samples.
///
/// There is no collision check or retry: two concurrent initializations
/// could race on the same derived address. The program rejects the loser.
pub fn random_unique_id() -> u64 {
    let mut rng = rand::thread_rng();
    ((rng.gen::<u32>() as u64) << 32) | rng.gen::<u32>() as u64
}
