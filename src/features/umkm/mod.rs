pub mod backends;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use backends::{ApiUmkmBackend, PgUmkmBackend, UmkmBackend};
pub use routes::routes;
pub use services::UmkmService;
