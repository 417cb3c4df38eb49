pub mod events;
pub mod fanout;
pub mod handler;
pub mod presence;
pub mod server;
