mod connection;

pub use connection::{ConnectionInfo, request_encoding, serve_connection};
