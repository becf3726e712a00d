/// Splits a comma-separated configuration value into its trimmed, non-empty parts.
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod test {
    use super::parse_comma_list;

    #[test]
    fn comma_lists() {
        assert_eq!(parse_comma_list("ATVPDKIKX0DER"), vec!["ATVPDKIKX0DER"]);
        assert_eq!(parse_comma_list(" A1F83G8C2ARO7P, ,A13V1IB3VIYZZH,"), vec!["A1F83G8C2ARO7P", "A13V1IB3VIYZZH"]);
        assert!(parse_comma_list("").is_empty());
    }
}
