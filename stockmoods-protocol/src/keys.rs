//! Dictionary keys shared with the companion

use crate::dictionary::{Dictionary, DictionaryError, TupleValue};

/// Key of the single tuple in a refresh request
pub const REFRESH_KEY: u32 = 0;

/// Marker value sent under [`REFRESH_KEY`]
pub const REFRESH_MARKER: u32 = 0;

// Wire keys of a quote message
const KEY_SYMBOL: u32 = 0;
const KEY_CHANGE_PERCENT: u32 = 1;
const KEY_MOOD_SIGN: u32 = 2;

/// Keys the companion uses in a quote message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QuoteKey {
    /// Ticker symbol (text)
    Symbol,
    /// Percent change without the `%` sign (text)
    ChangePercent,
    /// Mood code (integer)
    MoodSign,
}

impl QuoteKey {
    pub fn from_key(key: u32) -> Option<Self> {
        match key {
            KEY_SYMBOL => Some(QuoteKey::Symbol),
            KEY_CHANGE_PERCENT => Some(QuoteKey::ChangePercent),
            KEY_MOOD_SIGN => Some(QuoteKey::MoodSign),
            _ => None,
        }
    }

    pub fn to_key(self) -> u32 {
        match self {
            QuoteKey::Symbol => KEY_SYMBOL,
            QuoteKey::ChangePercent => KEY_CHANGE_PERCENT,
            QuoteKey::MoodSign => KEY_MOOD_SIGN,
        }
    }
}

/// The "please refresh" dictionary sent to the companion
pub fn refresh_request() -> Dictionary {
    let mut dict = Dictionary::new();
    // A fresh dictionary always has room for one tuple
    let _ = dict.push(REFRESH_KEY, TupleValue::Uint(REFRESH_MARKER));
    dict
}

/// Build a quote dictionary the way the companion does (for testing or simulation)
pub fn quote_message(symbol: &str, change_percent: &str, mood: i32) -> Result<Dictionary, DictionaryError> {
    Dictionary::new()
        .with(KEY_SYMBOL, TupleValue::text(symbol))?
        .with(KEY_CHANGE_PERCENT, TupleValue::text(change_percent))?
        .with(KEY_MOOD_SIGN, TupleValue::Int(mood))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        for key in [QuoteKey::Symbol, QuoteKey::ChangePercent, QuoteKey::MoodSign] {
            assert_eq!(QuoteKey::from_key(key.to_key()), Some(key));
        }
        assert_eq!(QuoteKey::from_key(9), None);
    }

    #[test]
    fn test_refresh_request_shape() {
        let dict = refresh_request();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(REFRESH_KEY), Some(&TupleValue::Uint(0)));

        let bytes = dict.encode().unwrap();
        assert_eq!(bytes.len(), 9);
    }

    #[test]
    fn test_quote_message() {
        let dict = quote_message("GOOG", "1.50", 0).unwrap();
        assert_eq!(dict.get(0).and_then(|v| v.as_str()), Some("GOOG"));
        assert_eq!(dict.get(1).and_then(|v| v.as_str()), Some("1.50"));
        assert_eq!(dict.get(2).and_then(|v| v.as_i32()), Some(0));
    }
}
