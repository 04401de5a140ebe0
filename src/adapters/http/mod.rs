pub mod app_error_impl;
pub mod app_state;
pub mod credentials;
pub mod json_body;
pub mod middleware;
pub mod routes;
