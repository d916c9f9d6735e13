pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod util;
