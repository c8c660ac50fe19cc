//! Boolean retrieval: query compilation, tree evaluation and skip-aware merges.

pub mod eval;
pub mod merge;
pub mod parser;

pub use eval::{evaluate, Evaluator, PostingSource};
pub use parser::{compile, Expr, Operator};
