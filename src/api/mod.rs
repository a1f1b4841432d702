pub mod error;
pub mod extract;
pub mod openapi;
pub mod server;
pub mod users;
