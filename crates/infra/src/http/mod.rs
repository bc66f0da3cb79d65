//! HTTP client with retry support

pub mod client;
pub mod error;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::HttpCallError;
