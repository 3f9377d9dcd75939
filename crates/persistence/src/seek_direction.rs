// Copyright (C) 2021-2025 EpicChain Labs.
//
// seek_direction.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use epicchain_extensions::ByteArrayComparer;

/// Direction for seeking in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeekDirection {
    /// Seek forward (ascending order).
    #[default]
    Forward,
    /// Seek backward (descending order).
    Backward,
}

impl SeekDirection {
    /// The comparer that orders keys in this direction.
    #[inline]
    pub fn comparer(self) -> ByteArrayComparer {
        match self {
            SeekDirection::Forward => ByteArrayComparer::DEFAULT,
            SeekDirection::Backward => ByteArrayComparer::REVERSE,
        }
    }
}
