//! HTTP handlers for the Stayplan API.

pub mod chat;
pub mod events;
pub mod health;
pub mod rooms;
