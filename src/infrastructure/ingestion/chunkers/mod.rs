//! Text splitter implementations

mod recursive;

pub use recursive::RecursiveChunker;
