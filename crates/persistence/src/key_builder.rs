// Copyright (C) 2021-2025 EpicChain Labs.
//
// key_builder.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::error::{StorageError, StorageResult};
use crate::storage_key::StorageKey;

/// Used to build storage keys for native contracts.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    id: i32,
    key: Vec<u8>,
    max_length: usize,
}

impl KeyBuilder {
    /// Default maximum key size, excluding the contract id.
    pub const DEFAULT_MAX_LENGTH: usize = 64;

    /// Starts a key for contract `id` with a one-byte `prefix`.
    pub fn new(id: i32, prefix: u8) -> Self {
        Self::with_max_length(id, prefix, Self::DEFAULT_MAX_LENGTH)
    }

    /// Starts a key bounded by `max_length` bytes. The bound is at least one
    /// byte so the prefix always fits.
    pub fn with_max_length(id: i32, prefix: u8, max_length: usize) -> Self {
        let max_length = max_length.max(1);
        let mut key = Vec::with_capacity(max_length);
        key.push(prefix);
        Self {
            id,
            key,
            max_length,
        }
    }

    fn check_length(&self, adding: usize) -> StorageResult<()> {
        if self.key.len() + adding > self.max_length {
            return Err(StorageError::KeyTooLarge {
                current: self.key.len(),
                adding,
                max: self.max_length,
            });
        }
        Ok(())
    }

    /// Adds a byte to the key.
    pub fn add_byte(&mut self, key: u8) -> StorageResult<&mut Self> {
        self.check_length(1)?;
        self.key.push(key);
        Ok(self)
    }

    /// Adds bytes to the key.
    pub fn add(&mut self, key: &[u8]) -> StorageResult<&mut Self> {
        self.check_length(key.len())?;
        self.key.extend_from_slice(key);
        Ok(self)
    }

    /// Adds an i32 in big-endian format.
    pub fn add_i32_be(&mut self, value: i32) -> StorageResult<&mut Self> {
        self.add(&value.to_be_bytes())
    }

    /// Adds a u32 in big-endian format.
    pub fn add_u32_be(&mut self, value: u32) -> StorageResult<&mut Self> {
        self.add(&value.to_be_bytes())
    }

    /// Adds an i64 in big-endian format.
    pub fn add_i64_be(&mut self, value: i64) -> StorageResult<&mut Self> {
        self.add(&value.to_be_bytes())
    }

    /// Adds a u64 in big-endian format.
    pub fn add_u64_be(&mut self, value: u64) -> StorageResult<&mut Self> {
        self.add(&value.to_be_bytes())
    }

    /// Gets the current key length, excluding the contract id.
    #[inline]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Returns true if only the prefix byte has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key.len() == 1
    }

    /// Converts to `StorageKey`.
    pub fn to_storage_key(&self) -> StorageKey {
        StorageKey::new(self.id, self.key.clone())
    }

    /// Gets the raw form of the built key.
    pub fn to_array(&self) -> Vec<u8> {
        StorageKey::create_search_prefix(self.id, &self.key)
    }
}

impl From<KeyBuilder> for StorageKey {
    fn from(builder: KeyBuilder) -> Self {
        StorageKey::new(builder.id, builder.key)
    }
}
