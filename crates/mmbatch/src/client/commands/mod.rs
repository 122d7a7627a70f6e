pub mod submit;
pub mod watch;
