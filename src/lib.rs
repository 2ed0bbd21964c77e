pub mod app;
pub mod catalog;
pub mod config;
pub mod dog_ceo;
pub mod domain;
pub mod error;
pub mod output;
pub mod selection;
pub mod session;
