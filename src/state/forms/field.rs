//! Form field value objects and validators

use thiserror::Error;

/// Field-level validation failure, shown inline next to the field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

impl ValidationError {
    pub fn message(&self) -> &'static str {
        self.0
    }
}

/// The validation rule a field is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    RequiredText,
    Email,
    Mobile,
    Pan,
    Aadhaar,
    AadhaarLast4,
    Pincode,
    Cin,
}

impl FieldKind {
    /// Maximum stored length for kinds that truncate at entry
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Self::Mobile => Some(10),
            Self::Pan => Some(10),
            Self::Aadhaar => Some(12),
            Self::AadhaarLast4 => Some(4),
            Self::Pincode => Some(6),
            Self::Cin => Some(21),
            Self::RequiredText | Self::Email => None,
        }
    }

    /// Normalize raw input at the point of entry
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned: String = match self {
            Self::Pan | Self::Cin => raw
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            Self::Mobile | Self::Aadhaar | Self::AadhaarLast4 | Self::Pincode => {
                raw.chars().filter(char::is_ascii_digit).collect()
            }
            Self::RequiredText | Self::Email => return raw.to_string(),
        };

        match self.max_len() {
            // cleaned is ASCII, so byte truncation is safe
            Some(max) if cleaned.len() > max => cleaned[..max].to_string(),
            _ => cleaned,
        }
    }

    /// Validate an already-normalized value
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        let ok = match self {
            Self::RequiredText => !value.trim().is_empty(),
            Self::Email => is_email(value),
            Self::Mobile => {
                is_digits(value, 10) && matches!(value.as_bytes()[0], b'6'..=b'9')
            }
            Self::Pan => matches_shape(
                value,
                &[(Class::Upper, 5), (Class::Digit, 4), (Class::Upper, 1)],
            ),
            Self::Aadhaar => is_digits(value, 12),
            Self::AadhaarLast4 => is_digits(value, 4),
            Self::Pincode => is_digits(value, 6),
            Self::Cin => {
                value.len() == 21
                    && matches!(value.as_bytes()[0], b'L' | b'U' | b'S')
                    && matches_shape(
                        &value[1..],
                        &[
                            (Class::Digit, 5),
                            (Class::Upper, 2),
                            (Class::Digit, 4),
                            (Class::Upper, 3),
                            (Class::Digit, 6),
                        ],
                    )
            }
        };

        if ok {
            Ok(())
        } else {
            Err(ValidationError(self.failure_message()))
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::RequiredText => "This field is required",
            Self::Email => "Please enter a valid email address",
            Self::Mobile => "Enter a valid 10-digit mobile number",
            Self::Pan => "Invalid PAN format (e.g., ABCDE1234F)",
            Self::Aadhaar => "Aadhaar must be 12 digits",
            Self::AadhaarLast4 => "Enter last 4 digits of Aadhaar",
            Self::Pincode => "Pincode must be 6 digits",
            Self::Cin => "Invalid CIN format",
        }
    }
}

#[derive(Clone, Copy)]
enum Class {
    Upper,
    Digit,
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Check `value` against a sequence of fixed-width character runs
fn matches_shape(value: &str, runs: &[(Class, usize)]) -> bool {
    let total: usize = runs.iter().map(|(_, n)| n).sum();
    if value.len() != total {
        return false;
    }

    let mut bytes = value.bytes();
    runs.iter().all(|(class, n)| {
        bytes.by_ref().take(*n).all(|b| match class {
            Class::Upper => b.is_ascii_uppercase(),
            Class::Digit => b.is_ascii_digit(),
        })
    })
}

/// `local@domain.tld` with no whitespace and no second `@`. Any dot inside
/// the domain with text on both sides will do.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Declarative description of a single wizard field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Wizard step the field is collected on
    pub step: u8,
    /// `(value, label)` pairs for select-style fields
    pub options: Option<&'static [(&'static str, &'static str)]>,
}

impl FieldSpec {
    /// Create a required field
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind, step: u8) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            step,
            options: None,
        }
    }

    /// Create a required select field
    pub const fn select(
        name: &'static str,
        label: &'static str,
        step: u8,
        options: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::RequiredText,
            required: true,
            step,
            options: Some(options),
        }
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Validate a stored value; empty optional fields always pass
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        if !self.required && value.trim().is_empty() {
            return Ok(());
        }
        self.kind.validate(value)
    }

    /// Label to display for a stored value, resolving select options
    pub fn display_value<'a>(&self, value: &'a str) -> &'a str {
        if value.is_empty() {
            return "—";
        }
        self.options
            .and_then(|opts| opts.iter().find(|(v, _)| *v == value).map(|(_, l)| *l))
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [FieldKind; 8] = [
        FieldKind::RequiredText,
        FieldKind::Email,
        FieldKind::Mobile,
        FieldKind::Pan,
        FieldKind::Aadhaar,
        FieldKind::AadhaarLast4,
        FieldKind::Pincode,
        FieldKind::Cin,
    ];

    mod validate {
        use super::*;

        #[test]
        fn test_required_text_trims() {
            assert!(FieldKind::RequiredText.validate("Acme").is_ok());
            let err = FieldKind::RequiredText.validate("   ").unwrap_err();
            assert_eq!(err.message(), "This field is required");
        }

        #[test]
        fn test_email_shapes() {
            assert!(FieldKind::Email.validate("you@business.com").is_ok());
            assert!(FieldKind::Email.validate("a.b@sub.domain.in").is_ok());
            let bad_inputs = [
                "",
                "you",
                "you@",
                "you@domain",
                "@domain.com",
                "you @x.com",
                "a@b@c.com",
                "a@b.",
                "a@.",
            ];
            for bad in bad_inputs {
                assert!(FieldKind::Email.validate(bad).is_err(), "{bad} should fail");
            }
        }

        #[test]
        fn test_email_dot_anywhere_in_domain() {
            assert!(FieldKind::Email.validate("a@b.c.").is_ok());
            assert!(FieldKind::Email.validate("a@b..c").is_ok());
            assert!(FieldKind::Email.validate("a@.bc").is_err());
        }

        #[test]
        fn test_mobile_first_digit() {
            assert!(FieldKind::Mobile.validate("9876543210").is_ok());
            assert!(FieldKind::Mobile.validate("6000000000").is_ok());
            assert!(FieldKind::Mobile.validate("5876543210").is_err());
            assert!(FieldKind::Mobile.validate("987654321").is_err());
        }

        #[test]
        fn test_pan_is_case_sensitive_before_normalization() {
            assert!(FieldKind::Pan.validate("ABCDE1234F").is_ok());
            assert!(FieldKind::Pan.validate("abcde1234f").is_err());
            let normalized = FieldKind::Pan.normalize("abcde1234f");
            assert!(FieldKind::Pan.validate(&normalized).is_ok());
        }

        #[test]
        fn test_pan_shape() {
            assert!(FieldKind::Pan.validate("ABCD12345F").is_err());
            assert!(FieldKind::Pan.validate("ABCDE12345").is_err());
            assert!(FieldKind::Pan.validate("ABCDE1234").is_err());
        }

        #[test]
        fn test_digit_kinds() {
            assert!(FieldKind::Aadhaar.validate("123412341234").is_ok());
            assert_eq!(
                FieldKind::Aadhaar.validate("1234").unwrap_err().message(),
                "Aadhaar must be 12 digits"
            );
            assert!(FieldKind::AadhaarLast4.validate("1234").is_ok());
            assert!(FieldKind::AadhaarLast4.validate("123").is_err());
            assert!(FieldKind::Pincode.validate("600001").is_ok());
            assert!(FieldKind::Pincode.validate("60001").is_err());
        }

        #[test]
        fn test_cin_shape() {
            assert!(FieldKind::Cin.validate("U72900KA2020PTC123456").is_ok());
            assert!(FieldKind::Cin.validate("L12345MH2001PLC000001").is_ok());
            assert!(FieldKind::Cin.validate("X72900KA2020PTC123456").is_err());
            assert!(FieldKind::Cin.validate("U72900KA2020PT1123456").is_err());
            assert!(FieldKind::Cin.validate("U72900KA2020PTC12345").is_err());
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn test_mobile_strips_non_digits() {
            // only 7 digits survive, so nothing is truncated
            let value = FieldKind::Mobile.normalize("98765abc43");
            assert_eq!(value, "9876543");
            assert_eq!(
                FieldKind::Mobile.validate(&value).unwrap_err().message(),
                "Enter a valid 10-digit mobile number"
            );
        }

        #[test]
        fn test_truncates_to_max_len() {
            assert_eq!(FieldKind::Mobile.normalize("98765 43210 99"), "9876543210");
            assert_eq!(FieldKind::Pincode.normalize("600-0012"), "600001");
            assert_eq!(FieldKind::AadhaarLast4.normalize("123456"), "1234");
            assert_eq!(FieldKind::Pan.normalize("abcde-1234-fgh"), "ABCDE1234F");
        }

        #[test]
        fn test_text_kinds_are_verbatim() {
            assert_eq!(FieldKind::RequiredText.normalize("  Acme Ltd "), "  Acme Ltd ");
            assert_eq!(FieldKind::Email.normalize("A@b.com"), "A@b.com");
        }

        #[test]
        fn test_validation_is_idempotent_under_normalization() {
            let samples = [
                "",
                "  ",
                "abcde1234f",
                "98765abc43",
                "u72900ka2020ptc123456",
                "you@business.com",
                "12 34 56 78 90 12 34",
                "६७८९",
            ];
            for kind in ALL_KINDS {
                for raw in samples {
                    let once = kind.normalize(raw);
                    let twice = kind.normalize(&once);
                    assert_eq!(once, twice);
                    assert_eq!(kind.validate(&once), kind.validate(&twice));
                }
            }
        }
    }

    mod field_spec {
        use super::*;

        const STATES: &[(&str, &str)] = &[("MH", "Maharashtra"), ("KA", "Karnataka")];

        #[test]
        fn test_optional_empty_passes() {
            let spec = FieldSpec::new("aadhaar", "Aadhaar", FieldKind::Aadhaar, 2).optional();
            assert!(spec.validate("").is_ok());
            assert!(spec.validate("1234").is_err());
        }

        #[test]
        fn test_required_empty_uses_kind_message() {
            let spec = FieldSpec::new("email", "Email", FieldKind::Email, 2);
            assert_eq!(
                spec.validate("").unwrap_err().message(),
                "Please enter a valid email address"
            );
        }

        #[test]
        fn test_display_value_resolves_options() {
            let spec = FieldSpec::select("state", "State", 2, STATES);
            assert_eq!(spec.display_value("KA"), "Karnataka");
            assert_eq!(spec.display_value("GJ"), "GJ");
            assert_eq!(spec.display_value(""), "—");
        }
    }
}
