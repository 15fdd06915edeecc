//! Core data models for the emporium order backend.
//!
//! This crate provides the fundamental data types shared between the
//! storefront, the order store, and the admin bot: orders, their message
//! threads, and the validated order-number key.

pub mod number;
pub mod order;

// Re-export main types
pub use number::OrderNumber;
pub use order::{ChatMessage, Order, OrderStatus, Sender};
