pub mod shortener;

pub use shortener::{ServiceStats, ShortenerService};
