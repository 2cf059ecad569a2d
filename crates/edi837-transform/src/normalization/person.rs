//! Person-level derivations: gender and name splitting.

/// DMG03 administrative gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }

    fn from_explicit(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Some(Self::Male),
            "F" | "FEMALE" => Some(Self::Female),
            "U" | "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Derive gender from an explicit value, else from the identifier's last digit.
///
/// An odd final digit yields male and an even one female. Anything else is
/// unspecified and left to the caller's default.
pub fn derive_gender(explicit: &str, identifier: &str) -> Option<Gender> {
    if let Some(gender) = Gender::from_explicit(explicit) {
        return Some(gender);
    }
    let digit = identifier.trim().chars().last()?.to_digit(10)?;
    Some(if digit % 2 == 1 {
        Gender::Male
    } else {
        Gender::Female
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonName {
    pub last: String,
    pub first: String,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.last.is_empty() && self.first.is_empty()
    }
}

/// Split `"Last, First"` on the first comma.
///
/// Without a comma the whole value is the last name.
pub fn split_name(raw: &str) -> PersonName {
    match raw.split_once(',') {
        Some((last, first)) => PersonName {
            last: last.trim().to_string(),
            first: first.trim().to_string(),
        },
        None => PersonName {
            last: raw.trim().to_string(),
            first: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_from_identifier_parity() {
        assert_eq!(derive_gender("", "123456789"), Some(Gender::Male));
        assert_eq!(derive_gender("", "123456788"), Some(Gender::Female));
        assert_eq!(derive_gender("", "123456783"), Some(Gender::Male));
        assert_eq!(derive_gender("", "123456784"), Some(Gender::Female));
        assert_eq!(derive_gender("", "12345678X"), None);
        assert_eq!(derive_gender("", ""), None);
    }

    #[test]
    fn explicit_gender_wins() {
        assert_eq!(derive_gender("f", "123456789"), Some(Gender::Female));
        assert_eq!(derive_gender("Male", "123456788"), Some(Gender::Male));
        assert_eq!(derive_gender("U", "123456789"), Some(Gender::Unknown));
        assert_eq!(derive_gender("?", "123456789"), Some(Gender::Male));
    }

    #[test]
    fn splits_on_first_comma() {
        assert_eq!(
            split_name("SMITH , JOHN, JR"),
            PersonName {
                last: "SMITH".to_string(),
                first: "JOHN, JR".to_string(),
            }
        );
        assert_eq!(split_name("MADONNA").last, "MADONNA");
        assert!(split_name("MADONNA").first.is_empty());
        assert!(split_name("  ").is_empty());
    }
}
