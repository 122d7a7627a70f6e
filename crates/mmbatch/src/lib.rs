pub mod client;
pub mod common;
pub mod watch;

#[cfg(test)]
pub(crate) mod tests;

pub type Error = crate::common::error::MmError;
pub type Result<T> = std::result::Result<T, Error>;

pub const MM_VERSION: &str = {
    match option_env!("MM_BUILD_VERSION") {
        Some(version) => version,
        None => const_format::concatcp!(env!("CARGO_PKG_VERSION"), "-dev"),
    }
};
