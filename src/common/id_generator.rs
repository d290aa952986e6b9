// src/common/id_generator.rs
//! Crockford Base32 ID generator
//!
//! Generates random identifiers for per-request scratch filenames, so
//! concurrent uploads can never collide on a shared temp path.
//! Excludes ambiguous characters (I, L, O, U).

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Generate a random Crockford Base32 string of the given length
pub fn generate_raw_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}
