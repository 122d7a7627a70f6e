pub mod cli;
pub mod env;
pub mod error;
pub mod setup;
pub mod utils;

pub type Map<K, V> = std::collections::BTreeMap<K, V>;
