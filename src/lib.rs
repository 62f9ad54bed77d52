pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod directory;
pub mod errors;
pub mod handlers;
pub mod inbox;
pub mod models;
pub mod realtime;
pub mod storage;

pub use db::create_pool;
