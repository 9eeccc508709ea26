pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod logging;
pub mod model;
pub mod routes;
pub mod seed;
pub mod services;
pub mod utils;
