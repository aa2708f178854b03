pub mod backend;
pub mod tmdb;
pub mod traits;
