//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod chat;
pub mod comments;
pub mod coupons;
pub mod health;
pub mod likes;
pub mod members;
pub mod posts;
pub mod roadmaps;
pub mod wallet;
