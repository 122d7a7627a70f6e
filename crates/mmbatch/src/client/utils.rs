#[macro_export]
macro_rules! arg_wrapper {
    ($name:ident, $wrapped_type:ty, $parser:expr) => {
        #[derive(Clone, Debug)]
        pub struct $name($wrapped_type);

        impl ::std::str::FromStr for $name {
            type Err = ::anyhow::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                ::std::result::Result::Ok(Self($parser(s)?))
            }
        }

        impl $name {
            pub fn get(&self) -> &$wrapped_type {
                &self.0
            }
            pub fn unpack(self) -> $wrapped_type {
                self.0
            }
        }
    };
}

/// Splits a comma separated list, dropping empty items.
pub fn split_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}
