pub mod import;
pub mod model;
pub mod repository;
