//! Text helpers feeding the derived-value cache.

pub mod latex;
pub mod words;
