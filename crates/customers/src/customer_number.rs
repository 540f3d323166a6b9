use serde::{Deserialize, Serialize};

use keelcrm_core::{Error, Outcome, Rule, ValueObject, rules};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 9999;
pub const MAX_SEQUENCE: u32 = 999_999;

/// Business-facing customer number, canonical form `CUS-{year}-{sequence}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerNumber {
    year: i32,
    sequence: u32,
}

impl CustomerNumber {
    pub fn create(year: i32, sequence: u32) -> Outcome<CustomerNumber> {
        Rule::new()
            .must(
                || rules::in_range(year, MIN_YEAR, MAX_YEAR),
                Error::validation(format!("year must be between {MIN_YEAR} and {MAX_YEAR}"))
                    .with_field("customer_number"),
            )
            .must(
                || rules::in_range(sequence, 1, MAX_SEQUENCE),
                Error::validation(format!("sequence must be between 1 and {MAX_SEQUENCE}"))
                    .with_field("customer_number"),
            )
            .check()
            .map(|()| CustomerNumber { year, sequence })
    }

    /// Explicit fallible parse of the canonical form.
    ///
    /// Parsing is the only way in from a string; an invalid number is a
    /// failure outcome, never a panic.
    pub fn parse(raw: &str) -> Outcome<CustomerNumber> {
        let mut parts = raw.split('-');
        let (Some("CUS"), Some(year), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Outcome::failure(
                Error::validation("customer number must look like CUS-<year>-<sequence>")
                    .with_field("customer_number"),
            );
        };
        let (Ok(year), Ok(sequence)) = (year.parse::<i32>(), sequence.parse::<u32>()) else {
            return Outcome::failure(
                Error::validation("customer number parts must be numeric")
                    .with_field("customer_number"),
            );
        };
        Self::create(year, sequence)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Canonical rendering, e.g. `CUS-2024-100000`.
    pub fn value(&self) -> String {
        format!("CUS-{}-{}", self.year, self.sequence)
    }
}

impl ValueObject for CustomerNumber {}

impl core::fmt::Display for CustomerNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CUS-{}-{}", self.year, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keelcrm_core::ErrorKind;

    #[test]
    fn years_before_2000_are_rejected() {
        let outcome = CustomerNumber::create(1999, 100_000);
        assert!(outcome.is_failure());
        assert_eq!(outcome.errors()[0].kind(), ErrorKind::Validation);
        assert_eq!(outcome.errors()[0].field(), Some("customer_number"));
    }

    #[test]
    fn a_valid_number_renders_its_canonical_form() {
        let number = CustomerNumber::create(2024, 100_000).into_value();
        assert_eq!(number.value(), "CUS-2024-100000");
        assert_eq!(number.to_string(), "CUS-2024-100000");
    }

    #[test]
    fn sequence_zero_is_rejected() {
        assert!(CustomerNumber::create(2024, 0).is_failure());
    }

    #[test]
    fn parse_accepts_the_canonical_form_only() {
        let number = CustomerNumber::parse("CUS-2024-100000").into_value();
        assert_eq!(number.year(), 2024);
        assert_eq!(number.sequence(), 100_000);

        assert!(CustomerNumber::parse("CUST-2024-1").is_failure());
        assert!(CustomerNumber::parse("CUS-2024").is_failure());
        assert!(CustomerNumber::parse("CUS-2024-1-2").is_failure());
        assert!(CustomerNumber::parse("CUS-twenty-1").is_failure());
    }

    #[test]
    fn parse_applies_the_same_bounds_as_create() {
        assert!(CustomerNumber::parse("CUS-1999-100000").is_failure());
        assert!(CustomerNumber::parse("CUS-2024-0").is_failure());
    }
}
