// Re-export needed modules for the binary and for testing
pub mod models;
pub mod pipeline;
pub mod sample;
pub mod selector;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use models::*;
pub use pipeline::MessagePipeline;
pub use selector::{select_chats, ChatFilter};
pub use store::{AppState, AppStore};
