mod filter;

pub use filter::filter_articles;
