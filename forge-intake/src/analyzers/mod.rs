//! Analyzer implementations

mod http;

pub use http::HttpAnalyzer;
