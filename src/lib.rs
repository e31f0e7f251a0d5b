pub mod api;
pub mod app;
pub mod chart;
pub mod debug_hooks;
pub mod feed;
pub mod format;
pub mod ledger;
pub mod logbuf;
pub mod settings;
pub mod triggers;
pub mod watchlist;
pub mod wire;
