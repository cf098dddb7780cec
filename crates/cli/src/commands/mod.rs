pub mod chat;
pub mod context_cmd;
pub mod route;
