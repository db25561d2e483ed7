pub mod directory;
pub mod master;
pub mod server;
