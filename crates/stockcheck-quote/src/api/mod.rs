//! API clients for quote providers

pub mod finviz;

pub use finviz::FinvizClient;
