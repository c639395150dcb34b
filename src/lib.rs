pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod finance;
pub mod handlers;
pub mod models;
pub mod services;
pub mod supabase;

pub use db::create_pool;
