//! Options store implementations.
//!
//! `MemoryOptionsStore` keeps options for the lifetime of the process;
//! `FileOptionsStore` persists them as a single JSON object on disk so that
//! bulk-indexing progress survives between invocations.

mod file;
mod memory;

pub use file::FileOptionsStore;
pub use memory::MemoryOptionsStore;
