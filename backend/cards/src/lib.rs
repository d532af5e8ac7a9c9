//! Types to handle card masking and validation

use std::str::FromStr;

use common_utils::masking::{PeekInterface, StrongSecret};
use error_stack::report;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card number length must be between 8 and 19 digits")]
    InvalidCardNumberLength,
    #[error("card number contains non-digit characters")]
    InvalidCardNumberCharacters,
    #[error("card number failed the Luhn check")]
    LuhnCheckFailed,
    #[error("card expiration month must be between 1 and 12")]
    InvalidCardExpirationMonth,
    #[error("card expiration year is in the past")]
    InvalidCardExpirationYear,
}

/// A validated primary account number.
///
/// Construction runs a digit/length check and the Luhn check; the value is
/// held as a [`StrongSecret`] so `Debug` output stays masked.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(StrongSecret<String>);

impl CardNumber {
    /// First six digits, the issuer identification number.
    pub fn get_card_isin(&self) -> String {
        self.0.peek().chars().take(6).collect()
    }

    /// Last four digits, safe for display.
    pub fn get_last4(&self) -> String {
        let digits = self.0.peek();
        digits
            .chars()
            .skip(digits.len().saturating_sub(4))
            .collect()
    }
}

impl FromStr for CardNumber {
    type Err = error_stack::Report<CardError>;

    fn from_str(card_number: &str) -> Result<Self, Self::Err> {
        let number: String = card_number.split_whitespace().collect();

        if number.chars().any(|c| !c.is_ascii_digit()) {
            return Err(report!(CardError::InvalidCardNumberCharacters));
        }
        if !(8..=19).contains(&number.len()) {
            return Err(report!(CardError::InvalidCardNumberLength));
        }
        if !luhn(&number) {
            return Err(report!(CardError::LuhnCheckFailed));
        }
        Ok(Self(StrongSecret::new(number)))
    }
}

impl TryFrom<String> for CardNumber {
    type Error = error_stack::Report<CardError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl PeekInterface<String> for CardNumber {
    fn peek(&self) -> &String {
        self.0.peek()
    }
}

impl std::fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl serde::Serialize for CardNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.peek())
    }
}

impl<'de> serde::Deserialize<'de> for CardNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let number = String::deserialize(deserializer)?;
        number.parse().map_err(serde::de::Error::custom)
    }
}

fn luhn(number: &str) -> bool {
    number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(idx, digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum::<u32>()
        % 10
        == 0
}

/// A validated card expiration, serialized to the wire as `MMYY`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardExpiration {
    month: u8,
    year: u16,
}

impl CardExpiration {
    /// Validates the month range and that the expiry is not in the past.
    pub fn new(month: u8, year: u16) -> Result<Self, error_stack::Report<CardError>> {
        if !(1..=12).contains(&month) {
            return Err(report!(CardError::InvalidCardExpirationMonth));
        }
        let today = time::OffsetDateTime::now_utc().date();
        let current_year = u16::try_from(today.year())
            .map_err(|_| report!(CardError::InvalidCardExpirationYear))?;
        if year < current_year {
            return Err(report!(CardError::InvalidCardExpirationYear));
        }
        Ok(Self { month, year })
    }

    pub fn get_month(&self) -> u8 {
        self.month
    }

    pub fn get_year(&self) -> u16 {
        self.year
    }

    /// Render as the four-character `MMYY` wire form.
    pub fn format_mmyy(&self) -> StrongSecret<String> {
        StrongSecret::new(format!("{:02}{:02}", self.month, self.year % 100))
    }
}

impl TryFrom<(u8, u16)> for CardExpiration {
    type Error = error_stack::Report<CardError>;

    fn try_from((month, year): (u8, u16)) -> Result<Self, Self::Error> {
        Self::new(month, year)
    }
}
