pub mod auth;
pub mod http_handlers;
pub mod response;
pub mod routes;
