// Copyright (C) 2021-2025 EpicChain Labs.
//
// byte_array_comparer.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::cmp::Ordering;

/// Defines a total order over byte arrays.
///
/// The forward order is lexicographic by unsigned byte value, with a shorter
/// array sorting first when it is a prefix of the longer one. The reverse
/// comparer is its exact inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteArrayComparer {
    reverse: bool,
}

impl ByteArrayComparer {
    /// Ascending comparer.
    pub const DEFAULT: ByteArrayComparer = ByteArrayComparer { reverse: false };

    /// Descending comparer.
    pub const REVERSE: ByteArrayComparer = ByteArrayComparer { reverse: true };

    /// Compares two byte arrays.
    #[inline]
    pub fn compare(&self, x: &[u8], y: &[u8]) -> Ordering {
        if std::ptr::eq(x, y) {
            return Ordering::Equal;
        }

        let ordering = x.cmp(y);
        if self.reverse {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl Default for ByteArrayComparer {
    fn default() -> Self {
        Self::DEFAULT
    }
}
