pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod key_generator;
pub mod password;
pub mod setup;
