//! Pieces shared by the server, the client and the binaries: wire shapes
//! for the CRUD endpoints and tracing initialization.

pub mod types;
pub mod utils;
