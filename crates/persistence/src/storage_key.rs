// Copyright (C) 2021-2025 EpicChain Labs.
//
// storage_key.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::error::{StorageError, StorageResult};
use epicchain_extensions::{ByteArrayComparer, ByteArrayEqualityComparer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Represents the keys in contract storage.
///
/// The raw form is the contract id as 4 little-endian bytes followed by the key
/// bytes. Ordering follows the raw form so that cached entries interleave with
/// store scans.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StorageKey {
    id: i32,
    key: Vec<u8>,
}

impl StorageKey {
    /// Length of the id prefix in the raw form.
    pub const PREFIX_LENGTH: usize = std::mem::size_of::<i32>();

    /// Creates a new storage key.
    pub fn new(id: i32, key: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            key: key.into(),
        }
    }

    /// Creates a storage key with a single-byte prefix.
    pub fn create(id: i32, prefix: u8) -> Self {
        Self::new(id, vec![prefix])
    }

    /// Decodes a storage key from its raw form.
    pub fn try_from_array(bytes: &[u8]) -> StorageResult<Self> {
        if bytes.len() < Self::PREFIX_LENGTH {
            return Err(StorageError::invalid_key(format!(
                "expected at least {} bytes, got {}",
                Self::PREFIX_LENGTH,
                bytes.len()
            )));
        }

        let (id_bytes, key) = bytes.split_at(Self::PREFIX_LENGTH);
        let mut id = [0u8; Self::PREFIX_LENGTH];
        id.copy_from_slice(id_bytes);
        Ok(Self {
            id: i32::from_le_bytes(id),
            key: key.to_vec(),
        })
    }

    /// Creates a search prefix for a contract.
    pub fn create_search_prefix(id: i32, prefix: &[u8]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(Self::PREFIX_LENGTH + prefix.len());
        buffer.extend_from_slice(&id.to_le_bytes());
        buffer.extend_from_slice(prefix);
        buffer
    }

    /// The id of the contract.
    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The key of the storage entry, without the id.
    #[inline]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Converts the storage key to its raw form.
    pub fn to_array(&self) -> Vec<u8> {
        Self::create_search_prefix(self.id, &self.key)
    }
}

impl Hash for StorageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let key_hash = ByteArrayEqualityComparer::DEFAULT.hash_code(&self.key);
        state.write_i32(self.id.wrapping_add(key_hash));
    }
}

impl PartialOrd for StorageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StorageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.id == other.id {
            return ByteArrayComparer::DEFAULT.compare(&self.key, &other.key);
        }
        ByteArrayComparer::DEFAULT.compare(&self.id.to_le_bytes(), &other.id.to_le_bytes())
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageKey")
            .field("id", &self.id)
            .field("key", &hex::encode(&self.key))
            .finish()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, hex::encode(&self.key))
    }
}

impl TryFrom<&[u8]> for StorageKey {
    type Error = StorageError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_array(value)
    }
}
