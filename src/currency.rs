//! Currency definitions
//!
//! A currency is an opaque 3-letter code. The default universe is the set of
//! strong and widely quoted currencies the historical scans were run against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FxError;

/// Default candidate universe, in scan order
pub const DEFAULT_UNIVERSE: [&str; 35] = [
    "KWD", "BHD", "OMR", "JOD", "GBP", "GIP", "FKP",
    "KYD", "CHF", "EUR", "USD", "SGD", "BND", "CAD",
    "AUD", "AZN", "NZD", "AWG", "BGN", "BAM", "BZD",
    "BBD", "FJD", "TOP", "GEL", "XCD", "QAR", "SAR",
    "AED", "MYR", "CNY", "TRY", "MXN", "THB", "ZAR",
];

/// A 3-letter currency code, stored upper-case
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII letters
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Currency {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(FxError::InvalidCurrency(s.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }
}

impl TryFrom<String> for Currency {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

/// The default universe as parsed currencies
pub fn default_universe() -> Vec<Currency> {
    DEFAULT_UNIVERSE
        .iter()
        .filter_map(|code| code.parse().ok())
        .collect()
}

/// Split a pair code into (base, quote).
///
/// Accepts `USDEUR` as well as provider-suffixed codes like `USDEUR=X`;
/// anything after `=` is ignored.
pub fn parse_pair(code: &str) -> Result<(Currency, Currency), FxError> {
    let core = code.split('=').next().unwrap_or_default().trim();
    if core.len() != 6 || !core.is_ascii() {
        return Err(FxError::InvalidPairCode(code.to_string()));
    }

    let base: Currency = core[..3]
        .parse()
        .map_err(|_| FxError::InvalidPairCode(code.to_string()))?;
    let quote: Currency = core[3..]
        .parse()
        .map_err(|_| FxError::InvalidPairCode(code.to_string()))?;

    if base == quote {
        return Err(FxError::SelfPair(code.to_string()));
    }

    Ok((base, quote))
}

/// Every ordered pair code `a != b` over a currency list
pub fn pair_codes(currencies: &[Currency]) -> Vec<String> {
    currencies
        .iter()
        .flat_map(|a| {
            currencies
                .iter()
                .filter(move |b| *b != a)
                .map(move |b| format!("{}{}", a, b))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        let usd: Currency = "usd".parse().unwrap();
        assert_eq!(usd.as_str(), "USD");
        assert!("US".parse::<Currency>().is_err());
        assert!("US1".parse::<Currency>().is_err());
        assert!("USDX".parse::<Currency>().is_err());
    }

    #[test]
    fn test_parse_pair_with_suffix() {
        let (base, quote) = parse_pair("GBPUSD=X").unwrap();
        assert_eq!(base.as_str(), "GBP");
        assert_eq!(quote.as_str(), "USD");

        let (base, quote) = parse_pair("EURCHF").unwrap();
        assert_eq!(base.as_str(), "EUR");
        assert_eq!(quote.as_str(), "CHF");
    }

    #[test]
    fn test_parse_pair_rejects_garbage() {
        assert!(matches!(parse_pair("USDEU"), Err(FxError::InvalidPairCode(_))));
        assert!(matches!(parse_pair("USD-EUR"), Err(FxError::InvalidPairCode(_))));
        assert!(matches!(parse_pair("USDUSD"), Err(FxError::SelfPair(_))));
    }

    #[test]
    fn test_default_universe() {
        let universe = default_universe();
        assert_eq!(universe.len(), DEFAULT_UNIVERSE.len());
        assert_eq!(universe[0].as_str(), "KWD");

        // 35 * 34 ordered pairs
        assert_eq!(pair_codes(&universe).len(), 35 * 34);
    }

    #[test]
    fn test_serde_as_string() {
        let eur: Currency = "EUR".parse().unwrap();
        let json = serde_json::to_string(&eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eur);
        assert!(serde_json::from_str::<Currency>("\"EURO\"").is_err());
    }
}
