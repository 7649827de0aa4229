pub mod app;
mod screens;
