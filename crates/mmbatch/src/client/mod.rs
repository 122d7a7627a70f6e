pub mod backend;
pub mod commands;
pub mod jobfile;
pub mod request;
pub mod utils;
