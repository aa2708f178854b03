pub mod config;
pub mod derive;
pub mod error;
pub mod format;
pub mod notice;
pub mod view;
