pub mod extract;
pub mod forget;
pub mod render;
pub mod store;
pub mod types;

pub use extract::MemoryExtractor;
pub use store::MemoryStore;
pub use types::{FeedbackEntry, MemorySnapshot, MemoryUpdate, Polarity};
