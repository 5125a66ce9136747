//! Command-line adapter: argument parsing, dispatch and terminal output.

pub mod alert;
pub mod cache;
pub mod check;
pub mod command;
pub mod dispatch;
pub mod output;
pub mod prices;
pub mod run;
pub mod search;
