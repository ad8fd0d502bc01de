mod manager;

pub use manager::ArticleManager;
