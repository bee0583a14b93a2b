pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod templates;
pub mod views;
