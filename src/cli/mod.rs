pub mod chat;
pub mod memory;
pub mod models;
pub mod reset;
