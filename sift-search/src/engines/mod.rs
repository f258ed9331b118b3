//! Provider adapter implementations.
//!
//! Each module provides a struct implementing [`crate::engine::ProviderAdapter`]
//! plus a pure parser for that provider's payload.

pub mod bing_rss;
pub mod ddg_html;
pub mod ddg_instant;
pub mod ddg_lite;
pub(crate) mod text;
pub mod wikipedia;

pub use bing_rss::BingRssAdapter;
pub use ddg_html::DdgHtmlAdapter;
pub use ddg_instant::DdgInstantAdapter;
pub use ddg_lite::DdgLiteAdapter;
pub use wikipedia::WikipediaAdapter;
