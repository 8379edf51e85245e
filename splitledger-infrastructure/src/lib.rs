#![warn(clippy::uninlined_format_args)]

pub mod memory_store;

pub use memory_store::InMemoryExpenseStore;
