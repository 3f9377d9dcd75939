// Copyright (C) 2021-2025 EpicChain Labs.
//
// byte_array_equality_comparer.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::hash::{BuildHasher, Hasher};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Seed used for every byte-array hash code.
pub const DEFAULT_XX_HASH3_SEED: u64 = 40343;

/// Equality comparer for byte arrays.
///
/// Also a [`BuildHasher`], so it can be plugged into `HashMap`/`HashSet` as the
/// key comparer for byte-keyed dictionaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteArrayEqualityComparer;

impl ByteArrayEqualityComparer {
    pub const DEFAULT: ByteArrayEqualityComparer = ByteArrayEqualityComparer;

    /// Compares two optional byte arrays for equality.
    pub fn equals(&self, x: Option<&[u8]>, y: Option<&[u8]>) -> bool {
        match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => std::ptr::eq(x, y) || x == y,
            _ => false,
        }
    }

    /// 32-bit hash code of a byte array.
    pub fn hash_code(&self, obj: &[u8]) -> i32 {
        let hash = xxh3_64_with_seed(obj, DEFAULT_XX_HASH3_SEED);
        ((hash as u32) ^ ((hash >> 32) as u32)) as i32
    }
}

impl BuildHasher for ByteArrayEqualityComparer {
    type Hasher = ByteArrayHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ByteArrayHasher::default()
    }
}

/// Streaming hasher behind [`ByteArrayEqualityComparer`].
///
/// Buffers the written bytes and hashes them in one xxhash3 pass on `finish`.
#[derive(Debug, Default, Clone)]
pub struct ByteArrayHasher {
    buffer: Vec<u8>,
}

impl Hasher for ByteArrayHasher {
    fn finish(&self) -> u64 {
        xxh3_64_with_seed(&self.buffer, DEFAULT_XX_HASH3_SEED)
    }

    fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}
