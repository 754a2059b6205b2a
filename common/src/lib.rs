pub mod env_config;
pub mod error;
pub mod http;
pub mod jwt;
pub mod misc;
pub mod plan;
