//! Document persistence.
//!
//! The store owns the two spots where coordination is required: number
//! allocation ("count in scope → pick candidate → reserve" is one atomic
//! unit) and header+lines persistence (all-or-nothing, including the
//! wholesale line replacement on edit).

mod memory;

pub use memory::MemoryStore;
