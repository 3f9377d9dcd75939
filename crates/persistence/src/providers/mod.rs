// Copyright (C) 2021-2025 EpicChain Labs.
//
// mod.rs file belongs to the epicchain project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Store providers.

pub mod memory_snapshot;
pub mod memory_store;
pub mod memory_store_provider;

pub use memory_snapshot::MemorySnapshot;
pub use memory_store::MemoryStore;
pub use memory_store_provider::MemoryStoreProvider;
