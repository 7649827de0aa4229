//! Recipe scaling, a local recipe store, a learned recipe recommender and a
//! terminal recipe viewer.

pub mod cart;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod nutrition;
pub mod recommend;
pub mod scaling;
pub mod tui;
pub mod video;
