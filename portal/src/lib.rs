pub mod api;
pub mod config;
pub mod controller;
pub mod db;
pub mod directory;
pub mod error;
pub mod gateway;
pub mod linking;
pub mod models;
pub mod render;
pub mod services;
pub mod state;
pub mod validation;
