pub mod boolean;
pub mod build;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod persist;
pub mod rank;
pub mod router;
pub mod skiplist;
pub mod tokenizer;

pub use index::*;
