//! The engine: per-client state (`slot`), the scoped iteration guard
//! (`iter`), and the `Splitter` itself (`splitter`).

pub mod config;
pub mod iter;
pub mod slot;
pub mod splitter;

pub use config::SplitterConfig;
pub use iter::ClientsIteration;
pub use slot::ClientInfo;
pub use splitter::Splitter;
