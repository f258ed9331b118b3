//! # sift
//!
//! HTTP gateway in front of [`sift_search`]: accepts a JSON search request,
//! validates and normalises it, runs the multi-provider search pipeline and
//! returns ranked, diversified results.
//!
//! A search in which every provider failed is a successful, empty response.
//! Only a missing query (400) or an unexpected pipeline failure (502) is
//! reported as an error.

pub mod config;
pub mod error;
pub mod gateway;
pub mod server;

pub use config::ServerConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, SearchBody, SearchResponse};
pub use server::{SearchServer, router};
