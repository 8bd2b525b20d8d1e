// Presentation layer - HTTP surface read by the desktop shell
pub mod app_state;
pub mod handlers;
pub mod routes;
