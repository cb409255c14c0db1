//! Picsum photo API client.

mod client;
mod dto;

pub use client::{PicsumClient, meta_record_id};
