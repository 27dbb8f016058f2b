pub mod agent;
pub mod app;
pub mod bus;
pub mod config;
pub mod domain;
pub mod engine;
pub mod shared;
pub mod store;
pub mod supervisor;
