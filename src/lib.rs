// src/lib.rs

pub mod config;
pub mod docs;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod practice;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
