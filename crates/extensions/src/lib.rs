// Copyright (C) 2021-2025 EpicChain Labs.
//
// lib.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! EpicChain Extensions
//!
//! Byte-level helpers shared by the storage layer: a total order over
//! variable-length byte sequences in either direction, and an equality
//! comparer whose hash agrees with that order so raw byte buffers can be used
//! as dictionary keys.

pub mod byte_array_comparer;
pub mod byte_array_equality_comparer;

pub use byte_array_comparer::ByteArrayComparer;
pub use byte_array_equality_comparer::{
    ByteArrayEqualityComparer, ByteArrayHasher, DEFAULT_XX_HASH3_SEED,
};
