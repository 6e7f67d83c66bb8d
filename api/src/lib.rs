pub mod auth;
pub mod response;
pub mod routes;
pub mod services;
pub mod ws;
