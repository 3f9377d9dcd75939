// Copyright (C) 2021-2025 EpicChain Labs.
//
// storage_item.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use num_bigint::BigInt;
use num_traits::Zero;
use std::fmt;

/// Represents the values in contract storage.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StorageItem {
    value: Vec<u8>,
}

impl StorageItem {
    /// Creates a new storage item.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Creates a storage item holding an integer.
    pub fn from_integer(integer: &BigInt) -> Self {
        Self {
            value: encode_integer(integer),
        }
    }

    /// The byte value of the item.
    #[inline]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the byte value of the item.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = value.into();
    }

    /// Consumes the item and returns its bytes.
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Returns the size of the stored value.
    #[inline]
    pub fn size(&self) -> usize {
        self.value.len()
    }

    /// Copies the contents of `replica` into this instance.
    pub fn from_replica(&mut self, replica: &StorageItem) {
        self.value.clone_from(&replica.value);
    }

    /// Interprets the value as a little-endian two's complement integer.
    pub fn to_integer(&self) -> BigInt {
        if self.value.is_empty() {
            return BigInt::zero();
        }
        BigInt::from_signed_bytes_le(&self.value)
    }

    /// Stores an integer value.
    pub fn set_integer(&mut self, integer: &BigInt) {
        self.value = encode_integer(integer);
    }

    /// Increases the integer value by `integer`.
    pub fn add_integer(&mut self, integer: &BigInt) {
        let sum = self.to_integer() + integer;
        self.set_integer(&sum);
    }
}

// Zero is stored as the empty buffer.
fn encode_integer(integer: &BigInt) -> Vec<u8> {
    if integer.is_zero() {
        Vec::new()
    } else {
        integer.to_signed_bytes_le()
    }
}

impl From<Vec<u8>> for StorageItem {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for StorageItem {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for StorageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageItem")
            .field("value", &hex::encode(&self.value))
            .finish()
    }
}
