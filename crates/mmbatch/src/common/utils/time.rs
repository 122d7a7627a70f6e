// Allows specifying humantime format (2h, 3m, etc.)
crate::arg_wrapper!(ArgDuration, std::time::Duration, humantime::parse_duration);

#[cfg(test)]
mod tests {
    use super::ArgDuration;
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn parse_human_duration() {
        assert_eq!(
            *ArgDuration::from_str("5m").unwrap().get(),
            Duration::from_secs(300)
        );
        assert_eq!(
            ArgDuration::from_str("1h 30s").unwrap().unpack(),
            Duration::from_secs(3630)
        );
    }

    #[test]
    fn parse_invalid_duration() {
        assert!(ArgDuration::from_str("soon").is_err());
    }
}
