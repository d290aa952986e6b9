// Enhance module - the resume enhancement endpoint

pub mod handlers;
pub mod models;
pub mod prompt;
pub mod routes;

pub use routes::enhance_routes;
