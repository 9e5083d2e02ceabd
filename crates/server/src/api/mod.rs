pub mod entries;
pub mod handlers;
pub mod middleware;
pub mod pokemon;
pub mod routes;
pub mod settings;

pub use routes::create_router;
