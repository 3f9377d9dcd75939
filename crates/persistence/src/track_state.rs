// Copyright (C) 2021-2025 EpicChain Labs.
//
// track_state.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use std::fmt;

/// Represents the state of a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackState {
    /// Loaded from the backing storage and unmodified.
    #[default]
    None,
    /// Created in this cache and not yet in the backing storage.
    Added,
    /// Loaded from the backing storage and then modified.
    Changed,
    /// Marked for removal from the backing storage.
    Deleted,
    /// Confirmed absent from the backing storage.
    NotFound,
}

impl TrackState {
    /// Returns true if the entry is visible to readers of the cache.
    #[inline]
    pub fn is_live(self) -> bool {
        !matches!(self, TrackState::Deleted | TrackState::NotFound)
    }

    /// Returns true if committing the cache has to replay this entry.
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            TrackState::Added | TrackState::Changed | TrackState::Deleted
        )
    }
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackState::None => "none",
            TrackState::Added => "added",
            TrackState::Changed => "changed",
            TrackState::Deleted => "deleted",
            TrackState::NotFound => "not-found",
        };
        f.write_str(name)
    }
}
