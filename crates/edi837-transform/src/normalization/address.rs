//! Comma-separated address parsing.

use edi837_model::AddressDefault;

/// Street, city and state parsed from a single address string.
///
/// Parsing never fails; missing parts are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    pub state: String,
}

impl ParsedAddress {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.city.is_empty() && self.state.is_empty()
    }
}

/// An address ready for N3/N4, with blanks filled from role defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl PostalAddress {
    /// Fill each blank part from `defaults`. The zip always comes from the
    /// defaults because source addresses do not carry one reliably.
    pub fn from_parsed(parsed: ParsedAddress, defaults: &AddressDefault) -> Self {
        Self {
            street: or_default(parsed.street, &defaults.street),
            city: or_default(parsed.city, &defaults.city),
            state: or_default(parsed.state, &defaults.state),
            zip: defaults.zip.clone(),
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn is_null_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("null")
}

/// Split `street, city, state` into its parts.
///
/// Segment 2 contributes only its first two characters, upper-cased, so
/// `"Louisville, ky 40202"` style inputs still yield a state code.
///
/// # Examples
///
/// ```
/// use edi837_transform::parse_address;
///
/// let parsed = parse_address("123 Main St, Springfield, il");
/// assert_eq!(parsed.street, "123 Main St");
/// assert_eq!(parsed.city, "Springfield");
/// assert_eq!(parsed.state, "IL");
/// ```
pub fn parse_address(raw: &str) -> ParsedAddress {
    let raw = raw.trim();
    if raw.is_empty() || is_null_literal(raw) {
        return ParsedAddress::default();
    }
    let mut parts = raw.split(',').map(str::trim);
    let street = parts.next().unwrap_or_default().to_string();
    let city = parts.next().unwrap_or_default().to_string();
    let state = parts
        .next()
        .unwrap_or_default()
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase();
    ParsedAddress {
        street,
        city,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_parts() {
        assert_eq!(
            parse_address("123 Main St, Springfield, IL"),
            ParsedAddress {
                street: "123 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
            }
        );
    }

    #[test]
    fn missing_parts_are_empty() {
        let parsed = parse_address("123 Main St");
        assert_eq!(parsed.street, "123 Main St");
        assert!(parsed.city.is_empty());
        assert!(parsed.state.is_empty());
    }

    #[test]
    fn null_literals_are_absent() {
        assert!(parse_address("None").is_empty());
        assert!(parse_address(" null ").is_empty());
        assert!(parse_address("").is_empty());
    }

    #[test]
    fn state_is_truncated_and_uppercased() {
        assert_eq!(parse_address("1 A St, Town, kentucky 40202").state, "KE");
    }

    #[test]
    fn defaults_fill_blank_parts() {
        let defaults = AddressDefault {
            street: "PO BOX 1".to_string(),
            city: "LOUISVILLE".to_string(),
            state: "KY".to_string(),
            zip: "40253".to_string(),
        };
        let address = PostalAddress::from_parsed(parse_address("9 Elm St"), &defaults);
        assert_eq!(address.street, "9 Elm St");
        assert_eq!(address.city, "LOUISVILLE");
        assert_eq!(address.state, "KY");
        assert_eq!(address.zip, "40253");
    }
}
