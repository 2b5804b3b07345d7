//! TARS command-line front end
//!
//! Settings, logging and analysis commands around the
//! [`chess_engine`] crate, which holds the position model and the search.

pub mod cli;
pub mod core;

pub use chess_engine;
