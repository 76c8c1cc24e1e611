/// USPS codes for states, the District of Columbia, territories and
/// military post offices.
pub const US_STATE_CODES: [&str; 62] = [
    "AA", "AE", "AK", "AL", "AP", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "FM",
    "GA", "GU", "HI", "IA", "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MH", "MI",
    "MN", "MO", "MP", "MS", "MT", "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK",
    "OR", "PA", "PR", "PW", "RI", "SC", "SD", "TN", "TX", "UM", "UT", "VA", "VI", "VT", "WA",
    "WI", "WV",
];

pub fn is_state_code(code: &str) -> bool {
    code.len() == 2
        && US_STATE_CODES
            .binary_search(&code.to_ascii_uppercase().as_str())
            .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(US_STATE_CODES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn recognises_codes() {
        assert!(is_state_code("MD"));
        assert!(is_state_code("pr"));
        assert!(!is_state_code("XX"));
        assert!(!is_state_code("MDX"));
    }
}
