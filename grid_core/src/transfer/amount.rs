use std::fmt::{self, Display};

/// Fixed number of fractional digits of the native token.
pub const DECIMALS: usize = 18;
const ONE: u128 = 1_000_000_000_000_000_000;

/// A user-entered amount that passed validation, kept in subunits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    subunits: u128,
}

impl Amount {
    /// Integer count of the smallest subunit, as submitted on chain.
    pub fn subunits(&self) -> u128 {
        self.subunits
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.subunits))
    }
}

/// Validation failures, worded for direct display next to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Invalid,
    BelowMinimum { min: String, symbol: String },
    AboveMaximum { max: String, symbol: String },
}

impl Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Invalid => write!(f, "Please enter a valid amount."),
            AmountError::BelowMinimum { min, symbol } => {
                write!(f, "Amount must be at least {} {}.", min, symbol)
            }
            AmountError::AboveMaximum { max, symbol } => {
                write!(f, "Amount cannot exceed {} {}.", max, symbol)
            }
        }
    }
}

impl std::error::Error for AmountError {}

/// Why a decimal string could not be turned into subunits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseUnitsError {
    /// Not a plain decimal number.
    Malformed,
    /// Well formed, but more subunits than fit in a `u128`.
    Overflow,
}

impl Display for ParseUnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseUnitsError::Malformed => write!(f, "not a decimal number"),
            ParseUnitsError::Overflow => write!(f, "amount too large"),
        }
    }
}

impl std::error::Error for ParseUnitsError {}

/// Parse a plain decimal (`"12"`, `"0.5"`, `".25"`) into subunits.
/// No sign, no exponent, at most [`DECIMALS`] fractional digits.
pub fn parse_units(text: &str) -> Result<u128, ParseUnitsError> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(ParseUnitsError::Malformed);
    }
    if fraction.len() > DECIMALS {
        return Err(ParseUnitsError::Malformed);
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(ParseUnitsError::Malformed);
    }

    // Digits only from here on, so any parse failure is overflow.
    let whole_value: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseUnitsError::Overflow)?
    };
    let fraction_value: u128 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = DECIMALS)
            .parse()
            .map_err(|_| ParseUnitsError::Malformed)?
    };
    whole_value
        .checked_mul(ONE)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or(ParseUnitsError::Overflow)
}

/// Render subunits as the shortest exact decimal.
pub fn format_units(subunits: u128) -> String {
    let whole = subunits / ONE;
    let fraction = subunits % ONE;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", fraction, width = DECIMALS);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

/// Inclusive range a transfer amount must fall in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountBounds {
    min: u128,
    max: u128,
    symbol: String,
}

impl Default for AmountBounds {
    /// 1 to 1000 LYX.
    fn default() -> Self {
        Self {
            min: ONE,
            max: 1000 * ONE,
            symbol: "LYX".to_string(),
        }
    }
}

impl AmountBounds {
    /// Build from decimal strings. `None` if either bound does not parse,
    /// `min` is zero or `min > max`.
    pub fn new(min: &str, max: &str, symbol: impl Into<String>) -> Option<Self> {
        let min = parse_units(min).ok()?;
        let max = parse_units(max).ok()?;
        (min > 0 && min <= max).then(|| Self {
            min,
            max,
            symbol: symbol.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Validate raw input from the amount field.
    pub fn parse(&self, input: &str) -> Result<Amount, AmountError> {
        let subunits = match parse_units(input) {
            Ok(subunits) => subunits,
            Err(ParseUnitsError::Malformed) => return Err(AmountError::Invalid),
            Err(ParseUnitsError::Overflow) => return Err(self.above_maximum()),
        };
        if subunits < self.min {
            return Err(AmountError::BelowMinimum {
                min: format_units(self.min),
                symbol: self.symbol.clone(),
            });
        }
        if subunits > self.max {
            return Err(self.above_maximum());
        }
        Ok(Amount { subunits })
    }

    fn above_maximum(&self) -> AmountError {
        AmountError::AboveMaximum {
            max: format_units(self.max),
            symbol: self.symbol.clone(),
        }
    }
}
