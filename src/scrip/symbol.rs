//! Trading-symbol parsing and display-name formatting.
//!
//! Derivative trading symbols are fixed-width encodings appended to the base
//! symbol:
//!
//! ```text
//! NIFTY 24 APR FUT          future:          base, year, month, "FUT"
//! NIFTY 24 APR 22000 CE     monthly option:  base, year, month, strike, CE|PE
//! NIFTY 24 418 22000 CE     weekly option:   base, year, month code + day, strike, CE|PE
//! ```
//!
//! A trading symbol is parsed once into a [`ParsedSymbol`] and rendered from
//! there; nothing downstream slices strings by offset.

use chrono::Datelike;
use std::fmt;


/// Width of the encoded year.
const YEAR_WIDTH: usize = 2;

/// Width of the encoded month (or weekly month code + day).
const MONTH_WIDTH: usize = 3;

const FUTURE_SUFFIX: &str = "FUT";

/// Weekly expiry month codes. Months 1-9 use their digit, Q4 uses a letter.
const WEEKLY_MONTH_CODES: [(char, &str); 12] = [
    ('1', "JAN"),
    ('2', "FEB"),
    ('3', "MAR"),
    ('4', "APR"),
    ('5', "MAY"),
    ('6', "JUN"),
    ('7', "JUL"),
    ('8', "AUG"),
    ('9', "SEP"),
    ('O', "OCT"),
    ('N', "NOV"),
    ('D', "DEC"),
];

/// Option right encoded as the last two characters of the trading symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    /// Call ("CE").
    Call,
    /// Put ("PE").
    Put,
}

impl OptionType {
    fn from_suffix(trading_symbol: &str) -> Option<Self> {
        if trading_symbol.ends_with("CE") {
            Some(Self::Call)
        } else if trading_symbol.ends_with("PE") {
            Some(Self::Put)
        } else {
            None
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "CE"),
            Self::Put => write!(f, "PE"),
        }
    }
}

/// The three-character expiry code of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryCode {
    /// Monthly expiry, month name as encoded (e.g. "APR").
    Monthly(String),
    /// Weekly expiry decoded from a month code and a day of month.
    Weekly {
        /// Day of month, 1-31.
        day: u8,
        /// Month name (e.g. "APR").
        month: &'static str,
    },
    /// A code containing digits that does not decode; rendered verbatim.
    Raw(String),
}

impl ExpiryCode {
    /// Decodes a three-character code. Codes without digits are monthly.
    #[must_use]
    pub fn decode(code: &str) -> Self {
        if !code.chars().any(|c| c.is_ascii_digit()) {
            return Self::Monthly(code.to_string());
        }

        decode_weekly(code)
            .map(|(day, month)| Self::Weekly { day, month })
            .unwrap_or_else(|| Self::Raw(code.to_string()))
    }
}

impl fmt::Display for ExpiryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly(month) => f.write_str(month),
            Self::Weekly { day, month } => write!(f, "{} {} Weekly", day, month),
            Self::Raw(code) => f.write_str(code),
        }
    }
}

fn decode_weekly(code: &str) -> Option<(u8, &'static str)> {
    let mut chars = code.chars();
    let month_code = chars.next()?;
    let month = WEEKLY_MONTH_CODES
        .iter()
        .find(|(c, _)| *c == month_code)
        .map(|(_, name)| *name)?;
    let day: u8 = chars.as_str().parse().ok()?;
    (1..=31).contains(&day).then_some((day, month))
}

/// A trading symbol decomposed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSymbol {
    /// A futures contract.
    Future {
        base: String,
        year: String,
        month: String,
    },
    /// An options contract.
    Option {
        base: String,
        year: String,
        expiry: ExpiryCode,
        strike: String,
        option_type: OptionType,
    },
    /// Anything that is not a recognisable derivative encoding.
    Plain,
}

impl ParsedSymbol {
    /// Parses `trading_symbol` using `symbol` as the base prefix length.
    ///
    /// Symbols too short to carry the encoded fields parse as [`ParsedSymbol::Plain`].
    #[must_use]
    pub fn parse(symbol: &str, trading_symbol: &str) -> Self {
        if !symbol.is_ascii() || !trading_symbol.is_ascii() {
            return Self::Plain;
        }

        let base_len = symbol.len();
        let year_end = base_len + YEAR_WIDTH;
        let month_end = year_end + MONTH_WIDTH;

        if let Some(body) = trading_symbol.strip_suffix(FUTURE_SUFFIX) {
            if body.len() < month_end {
                return Self::Plain;
            }
            return Self::Future {
                base: symbol.to_string(),
                year: body[base_len..year_end].to_string(),
                month: body[year_end..month_end].to_string(),
            };
        }

        let Some(option_type) = OptionType::from_suffix(trading_symbol) else {
            return Self::Plain;
        };
        let body = &trading_symbol[..trading_symbol.len() - 2];
        if body.len() <= month_end {
            return Self::Plain;
        }

        Self::Option {
            base: symbol.to_string(),
            year: body[base_len..year_end].to_string(),
            expiry: ExpiryCode::decode(&body[year_end..month_end]),
            strike: body[month_end..].to_string(),
            option_type,
        }
    }
}

/// Builds the human-readable label for an instrument using the current year.
#[must_use]
pub fn build_display_name(symbol: &str, exchange: &str, trading_symbol: &str) -> String {
    let current_year = (chrono::Local::now().year() % 100) as u32;
    build_display_name_at(symbol, exchange, trading_symbol, current_year)
}

/// Builds the human-readable label given the current two-digit year.
///
/// Cash listings keep their trading symbol. MCX futures expiring after the
/// current year carry the year next to the month.
#[must_use]
pub fn build_display_name_at(
    symbol: &str,
    exchange: &str,
    trading_symbol: &str,
    current_year: u32,
) -> String {
    if exchange.eq_ignore_ascii_case("NSE") || exchange.eq_ignore_ascii_case("BSE") {
        return trading_symbol.to_string();
    }

    match ParsedSymbol::parse(symbol, trading_symbol) {
        ParsedSymbol::Future { base, year, month } => {
            let later_year = year
                .parse::<u32>()
                .map(|yy| yy > current_year)
                .unwrap_or(false);
            if exchange.eq_ignore_ascii_case("MCX") && later_year {
                format!("{} {}{} FUT", base, year, month)
            } else {
                format!("{} {} FUT", base, month)
            }
        }
        ParsedSymbol::Option {
            base,
            year,
            expiry,
            strike,
            option_type,
        } => format!("{} {} {} {} {}", base, expiry, year, strike, option_type),
        ParsedSymbol::Plain => trading_symbol.to_string(),
    }
}
