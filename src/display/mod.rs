//! Text rendering of cost graphs for logs and debugging.
pub mod summary;
