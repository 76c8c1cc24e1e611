//! Address block reconstruction.
//!
//! Addresses span several consecutive lines (`Address Type`, `Address Line 1`,
//! `Address Line 2`, `City`, `State`, `Zip`). Some exports leave city, state
//! and zip blank and run them into the street lines instead; those are split
//! back out when the trailing text looks like `<city>, <state> <zip>`.

use cmsblue_model::LineRecord;
use serde_json::{Map, Value};

use crate::normalize::headless_camel;
use crate::states::is_state_code;

const ADDRESS_KEYS: [&str; 7] = [
    "addressType",
    "addressLine1",
    "addressLine2",
    "city",
    "state",
    "zip",
    "zipCode",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub address_type: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "addressType" => Some(&mut self.address_type),
            "addressLine1" => Some(&mut self.line1),
            "addressLine2" => Some(&mut self.line2),
            "city" => Some(&mut self.city),
            "state" => Some(&mut self.state),
            "zip" | "zipCode" => Some(&mut self.zip),
            _ => None,
        }
    }

    fn has_locality(&self) -> bool {
        !(self.city.is_empty() && self.state.is_empty() && self.zip.is_empty())
    }

    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("addressType".to_string(), Value::from(self.address_type));
        map.insert("addressLine1".to_string(), Value::from(self.line1));
        map.insert("addressLine2".to_string(), Value::from(self.line2));
        map.insert("city".to_string(), Value::from(self.city));
        map.insert("state".to_string(), Value::from(self.state));
        map.insert("zip".to_string(), Value::from(self.zip));
        map
    }
}

/// Keys that open an address block.
pub fn is_address_start(key: &str) -> bool {
    key == "addressLine1" || key == "addressType"
}

fn address_key(record: &LineRecord) -> Option<(&'static str, &str)> {
    if !record.is_body() {
        return None;
    }
    let (label, value) = record.text.split_once(':')?;
    let key = headless_camel(label);
    let key = ADDRESS_KEYS.into_iter().find(|known| *known == key)?;
    let key = if key == "zipCode" { "zip" } else { key };
    Some((key, value.trim()))
}

/// Read the address block starting at `start`.
///
/// Stops after the zip line, before the first non-address line, or before a
/// key that was already read. Returns the address and the index of the last
/// record consumed (never less than `start`).
pub fn read_address_block(records: &[LineRecord], start: usize) -> (Address, usize) {
    let mut address = Address::default();
    let mut seen: Vec<&'static str> = Vec::new();
    let mut last = start;
    for (index, record) in records.iter().enumerate().skip(start) {
        let Some((key, value)) = address_key(record) else {
            break;
        };
        if seen.contains(&key) {
            break;
        }
        seen.push(key);
        if let Some(slot) = address.slot(key) {
            *slot = value.to_string();
        }
        last = index;
        if key == "zip" {
            break;
        }
    }
    patch_locality(&mut address);
    (address, last)
}

fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Split off the last whitespace- or comma-delimited token.
fn split_last_token(text: &str) -> (&str, &str) {
    let text = text.trim_end_matches(is_token_separator);
    match text.char_indices().rev().find(|(_, c)| is_token_separator(*c)) {
        Some((index, c)) => (&text[..index], &text[index + c.len_utf8()..]),
        None => ("", text),
    }
}

fn is_zip(token: &str) -> bool {
    let bytes = token.as_bytes();
    let digits = |range: &[u8]| range.iter().all(u8::is_ascii_digit);
    match bytes.len() {
        5 => digits(bytes),
        10 => digits(&bytes[..5]) && bytes[5] == b'-' && digits(&bytes[6..]),
        _ => false,
    }
}

fn split_zip(text: &str) -> Option<(&str, &str)> {
    let (rest, token) = split_last_token(text);
    is_zip(token).then_some((rest, token))
}

fn split_state(text: &str) -> Option<(&str, &str)> {
    let (rest, token) = split_last_token(text);
    (token.len() == 2 && token.bytes().all(|b| b.is_ascii_alphabetic()) && is_state_code(token))
        .then_some((rest, token))
}

/// Recover city, state and zip from the street lines when all three are
/// blank. Leaves the address untouched when no zip or state is found.
fn patch_locality(address: &mut Address) {
    if address.has_locality() {
        return;
    }
    let combined = [address.line1.as_str(), address.line2.as_str()]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut rest = combined.as_str();
    if let Some((head, zip)) = split_zip(rest) {
        address.zip = zip.to_string();
        rest = head;
    }
    if let Some((head, state)) = split_state(rest) {
        address.state = state.to_ascii_uppercase();
        rest = head;
    }
    if !address.has_locality() {
        return;
    }
    let city_delimited = rest.trim_end().ends_with(',');
    let remainder = rest.trim_end_matches(is_token_separator).trim_start();

    if address.line2.is_empty() {
        match remainder.rsplit_once(',') {
            Some((street, city)) => {
                address.line1 = street.trim().to_string();
                address.city = city.trim().to_string();
            }
            None => address.line1 = remainder.to_string(),
        }
        return;
    }
    let Some(street) = remainder.strip_prefix(address.line1.as_str()) else {
        address.line1 = remainder.to_string();
        address.line2.clear();
        return;
    };
    let street = street.trim_matches(is_token_separator);
    match street.rsplit_once(',') {
        Some((line2, city)) => {
            address.city = city.trim().to_string();
            address.line2 = line2.trim().to_string();
        }
        None if city_delimited => {
            address.city = street.to_string();
            address.line2.clear();
        }
        None => address.line2 = street.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsblue_model::LineType;

    fn body_lines(lines: &[&str]) -> Vec<LineRecord> {
        lines
            .iter()
            .enumerate()
            .map(|(index, text)| LineRecord {
                sequence_key: index,
                line_number: index + 1,
                text: text.to_string(),
                line_type: LineType::Body,
                level: 1,
                claim_number: String::new(),
            })
            .collect()
    }

    #[test]
    fn reads_complete_block() {
        let records = body_lines(&[
            "Address Type: HOME",
            "Address Line 1: 123 MAIN ST",
            "Address Line 2:",
            "City: BALTIMORE",
            "State: MD",
            "Zip: 21201",
            "Email Address: a@example.com",
        ]);
        let (address, last) = read_address_block(&records, 0);
        assert_eq!(last, 5);
        assert_eq!(
            address,
            Address {
                address_type: "HOME".to_string(),
                line1: "123 MAIN ST".to_string(),
                line2: String::new(),
                city: "BALTIMORE".to_string(),
                state: "MD".to_string(),
                zip: "21201".to_string(),
            }
        );
    }

    #[test]
    fn stops_before_unrelated_line() {
        let records = body_lines(&["Address Line 1: 1 ELM RD", "Relationship: Son"]);
        let (address, last) = read_address_block(&records, 0);
        assert_eq!(last, 0);
        assert_eq!(address.line1, "1 ELM RD");
    }

    #[test]
    fn stops_before_repeated_key() {
        let records = body_lines(&[
            "Address Line 1: 1 ELM RD",
            "City: DOVER",
            "Address Line 1: 2 OAK RD",
        ]);
        let (_, last) = read_address_block(&records, 0);
        assert_eq!(last, 1);
    }

    #[test]
    fn locality_recovered_from_second_line() {
        let mut address = Address {
            line1: "123 MAIN ST".to_string(),
            line2: "BALTIMORE, MD 21201".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line1, "123 MAIN ST");
        assert_eq!(address.line2, "");
        assert_eq!(address.city, "BALTIMORE");
        assert_eq!(address.state, "MD");
        assert_eq!(address.zip, "21201");
    }

    #[test]
    fn second_line_keeps_street_before_last_comma() {
        let mut address = Address {
            line1: "1 ELM RD".to_string(),
            line2: "APT 4B, DOVER DE 19901".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line1, "1 ELM RD");
        assert_eq!(address.line2, "APT 4B");
        assert_eq!(address.city, "DOVER");
        assert_eq!(address.state, "DE");
        assert_eq!(address.zip, "19901");
    }

    #[test]
    fn street_on_second_line_only() {
        let mut address = Address {
            line2: "1 MAIN ST, BALTIMORE MD 21201".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line1, "");
        assert_eq!(address.line2, "1 MAIN ST");
        assert_eq!(address.city, "BALTIMORE");
        assert_eq!(address.state, "MD");
    }

    #[test]
    fn city_left_empty_without_comma() {
        let mut address = Address {
            line1: "1 ELM RD".to_string(),
            line2: "APT 4B DOVER DE 19901".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line2, "APT 4B DOVER");
        assert_eq!(address.city, "");
        assert_eq!(address.zip, "19901");
    }

    #[test]
    fn locality_recovered_from_single_line() {
        let mut address = Address {
            line1: "9 HARBOR WAY, SAN JUAN pr 00901-1234".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line1, "9 HARBOR WAY");
        assert_eq!(address.city, "SAN JUAN");
        assert_eq!(address.state, "PR");
        assert_eq!(address.zip, "00901-1234");
    }

    #[test]
    fn unrecognised_locality_is_left_alone() {
        let mut address = Address {
            line1: "SOMEWHERE OVERSEAS".to_string(),
            ..Address::default()
        };
        patch_locality(&mut address);
        assert_eq!(address.line1, "SOMEWHERE OVERSEAS");
        assert!(!address.has_locality());
    }

    #[test]
    fn zip_needs_a_boundary() {
        assert_eq!(split_zip("MAIN ST 21201"), Some(("MAIN ST", "21201")));
        assert_eq!(split_zip("UNIT A21201"), None);
        assert_eq!(split_zip("21201-12"), None);
    }

    #[test]
    fn map_keys_are_ordered() {
        let keys: Vec<String> = Address::default().into_map().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["addressType", "addressLine1", "addressLine2", "city", "state", "zip"]
        );
    }
}
