pub mod catalog;
pub mod chat;
pub mod events;
pub mod favorites;
pub mod sessions;
