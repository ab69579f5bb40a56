mod client_ip;
mod handlers;
mod routes;

pub use routes::create_router;
