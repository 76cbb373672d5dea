pub mod config;
pub mod db;
pub mod domain;
pub mod messaging;
pub mod metrics;
pub mod seedwork;
pub mod utils;
