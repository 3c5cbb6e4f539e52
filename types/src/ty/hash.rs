//! Structural hash combiner for the intern tables.
//!
//! A multiplicative-rotate mixer applied left to right over the words of a
//! key. The enum discriminant of each table key is written first, which acts
//! as a per-shape seed. Tables always confirm a hit with full equality, so
//! the hash only has to be consistent, never collision free.

use core::hash::{BuildHasherDefault, Hasher};

const SEED: u64 = 0x9e37_79b9_7f4a_7c15;
const MULTIPLIER: u64 = 0x517c_c1b7_2722_0a95;

#[derive(Clone, Copy, Debug)]
pub struct TyHasher {
    hash: u64,
}

impl Default for TyHasher {
    fn default() -> Self {
        Self { hash: SEED }
    }
}

impl TyHasher {
    #[inline]
    fn add(&mut self, word: u64) {
        self.hash = (self.hash.rotate_left(5) ^ word).wrapping_mul(MULTIPLIER);
    }
}

impl Hasher for TyHasher {
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(8);
        for chunk in &mut chunks {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            self.add(u64::from_le_bytes(word));
        }
        let rest = chunks.remainder();
        if !rest.is_empty() {
            let mut word = [0u8; 8];
            word[..rest.len()].copy_from_slice(rest);
            self.add(u64::from_le_bytes(word));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.add(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.add(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.add(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.add(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.add(i as u64);
    }

    fn finish(&self) -> u64 {
        self.hash
    }
}

pub type TyBuildHasher = BuildHasherDefault<TyHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::{BuildHasher, Hash};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        TyBuildHasher::default().hash_one(value)
    }

    #[test]
    fn test_equal_sequences_hash_equal() {
        assert_eq!(hash_of(&[1usize, 2, 3]), hash_of(&[1usize, 2, 3]));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(hash_of(&[1usize, 2]), hash_of(&[2usize, 1]));
        assert_ne!(hash_of(&(7u64, 9u64)), hash_of(&(9u64, 7u64)));
    }

    #[test]
    fn test_seeded() {
        assert_ne!(TyHasher::default().finish(), 0);
    }
}
