pub mod config;
pub mod models;
pub mod redis;
pub mod services;
pub mod utils;

pub use config::Settings;
pub use redis::RedisPool;
