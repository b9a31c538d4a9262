//! # zonewatch analyzer
//!
//! Client for the external vision-analysis service. The request asks for a
//! JSON object matching [`zonewatch_core::model::AnalysisReport`]; decoding
//! lives in [`decode`] so it can be tested without a network.

pub mod decode;
pub mod http;

pub use decode::decode_report;
pub use http::HttpAnalyzer;
