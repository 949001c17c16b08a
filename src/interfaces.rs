//! インターフェース層
//!
//! Web UI / HTTP API とコマンドラインの入出力

pub mod console;
pub mod web;
