//! Quote message decoding
//!
//! A quote message is a dictionary with up to three keys: symbol, percent
//! change and mood code. Any subset may arrive. Fields are accumulated into a
//! [`QuoteUpdate`] first and committed to the [`QuoteSignal`] in one step, so
//! the display text is composed exactly once per message.

use heapless::{String, Vec};
use stockmoods_protocol::{Dictionary, QuoteKey, TupleValue, MAX_TUPLES};

use crate::mood::{select_icon, MoodIcon};

/// Maximum bytes kept for the symbol and for the change text
pub const MAX_FIELD_LEN: usize = 19;

/// Maximum bytes of the composed `"<symbol>, <change>"` text
pub const MAX_QUOTE_LEN: usize = 39;

/// Bounded text of a single quote field
pub type FieldText = String<MAX_FIELD_LEN>;

/// Composed quote line
pub type QuoteText = String<MAX_QUOTE_LEN>;

/// Non-fatal problem found while decoding a quote message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeWarning {
    /// Key is not part of the quote contract; the tuple was skipped
    UnknownKey(u32),
    /// Known key with a value of the wrong type; the tuple was skipped
    WrongType(u32),
}

/// Warnings produced by one message
pub type DecodeWarnings = Vec<DecodeWarning, MAX_TUPLES>;

/// Fields present in one quote message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuoteUpdate {
    pub symbol: Option<FieldText>,
    /// Change text with the `%` suffix already appended
    pub change_text: Option<FieldText>,
    pub mood_code: Option<i32>,
}

impl QuoteUpdate {
    /// True if the message carried none of the quote fields
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.change_text.is_none() && self.mood_code.is_none()
    }
}

/// Copy `parts` into a bounded string, stopping at the last whole character that fits
fn bounded<const N: usize>(parts: &[&str]) -> String<N> {
    let mut out = String::new();
    for ch in parts.iter().flat_map(|p| p.chars()) {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Decode every tuple of `dict` in received order
///
/// Later tuples with the same key replace earlier ones.
pub fn decode_quote(dict: &Dictionary) -> (QuoteUpdate, DecodeWarnings) {
    let mut update = QuoteUpdate::default();
    let mut warnings = DecodeWarnings::new();

    for tuple in dict.iter() {
        let warning = match (QuoteKey::from_key(tuple.key), &tuple.value) {
            (Some(QuoteKey::Symbol), TupleValue::Text(text)) => {
                update.symbol = Some(bounded(&[text.as_str()]));
                None
            }
            (Some(QuoteKey::ChangePercent), TupleValue::Text(text)) => {
                update.change_text = Some(bounded(&[text.as_str(), "%"]));
                None
            }
            (Some(QuoteKey::MoodSign), value) => match value.as_i32() {
                Some(code) => {
                    update.mood_code = Some(code);
                    None
                }
                None => Some(DecodeWarning::WrongType(tuple.key)),
            },
            (Some(_), _) => Some(DecodeWarning::WrongType(tuple.key)),
            (None, _) => Some(DecodeWarning::UnknownKey(tuple.key)),
        };

        if let Some(warning) = warning {
            // A dictionary never holds more tuples than the warning list
            let _ = warnings.push(warning);
        }
    }

    (update, warnings)
}

/// Latest quote shown on the watch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuoteSignal {
    symbol: FieldText,
    change_text: FieldText,
    mood_code: Option<i32>,
}

impl QuoteSignal {
    pub const fn new() -> Self {
        Self {
            symbol: String::new(),
            change_text: String::new(),
            mood_code: None,
        }
    }

    /// Merge the fields present in `update`; absent fields keep their value
    pub fn apply(&mut self, update: QuoteUpdate) {
        if let Some(symbol) = update.symbol {
            self.symbol = symbol;
        }
        if let Some(change_text) = update.change_text {
            self.change_text = change_text;
        }
        if let Some(code) = update.mood_code {
            self.mood_code = Some(code);
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_str()
    }

    pub fn change_text(&self) -> &str {
        self.change_text.as_str()
    }

    pub fn mood_code(&self) -> Option<i32> {
        self.mood_code
    }

    /// Icon for the latest mood code, `NoConnection` before any arrived
    pub fn icon(&self) -> MoodIcon {
        self.mood_code.map(select_icon).unwrap_or_default()
    }

    /// `"<symbol>, <change>"`, cut at [`MAX_QUOTE_LEN`] bytes
    pub fn display_text(&self) -> QuoteText {
        bounded(&[self.symbol.as_str(), ", ", self.change_text.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmoods_protocol::quote_message;

    #[test]
    fn test_full_message() {
        let dict = quote_message("GOOG", "1.5", 0).unwrap();
        let (update, warnings) = decode_quote(&dict);
        assert!(warnings.is_empty());

        let mut quote = QuoteSignal::new();
        quote.apply(update);
        assert_eq!(quote.display_text().as_str(), "GOOG, 1.5%");
        assert_eq!(quote.icon(), MoodIcon::Happy);
    }

    #[test]
    fn test_missing_symbol_keeps_previous() {
        let mut quote = QuoteSignal::new();
        quote.apply(decode_quote(&quote_message("GOOG", "1.5", 0).unwrap()).0);

        let partial = Dictionary::new()
            .with(1, TupleValue::text("-0.25"))
            .and_then(|d| d.with(2, TupleValue::Int(2)))
            .unwrap();
        let (update, warnings) = decode_quote(&partial);
        assert!(warnings.is_empty());
        assert!(update.symbol.is_none());

        quote.apply(update);
        assert_eq!(quote.symbol(), "GOOG");
        assert_eq!(quote.display_text().as_str(), "GOOG, -0.25%");
        assert_eq!(quote.icon(), MoodIcon::Sad);
    }

    #[test]
    fn test_unknown_key_warns_once() {
        let dict = quote_message("AAPL", "0.3", 1)
            .and_then(|d| d.with(9, TupleValue::Uint(5)))
            .unwrap();
        let (update, warnings) = decode_quote(&dict);

        assert_eq!(&warnings[..], &[DecodeWarning::UnknownKey(9)]);
        let (clean, _) = decode_quote(&quote_message("AAPL", "0.3", 1).unwrap());
        assert_eq!(update, clean);
    }

    #[test]
    fn test_wrong_type_skipped() {
        let dict = Dictionary::new()
            .with(0, TupleValue::Uint(7))
            .and_then(|d| d.with(2, TupleValue::text("up")))
            .unwrap();
        let (update, warnings) = decode_quote(&dict);

        assert!(update.is_empty());
        assert_eq!(
            &warnings[..],
            &[DecodeWarning::WrongType(0), DecodeWarning::WrongType(2)]
        );
    }

    #[test]
    fn test_unsigned_mood_accepted() {
        let dict = Dictionary::new().with(2, TupleValue::Uint(1)).unwrap();
        let (update, _) = decode_quote(&dict);
        assert_eq!(update.mood_code, Some(1));
    }

    #[test]
    fn test_fields_bounded() {
        let long = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let dict = quote_message(long, "12345678901234567890", 2).unwrap();
        let (update, _) = decode_quote(&dict);

        assert_eq!(update.symbol.as_deref(), Some("ABCDEFGHIJKLMNOPQRS"));
        // The suffix does not fit once the digits fill the field
        assert_eq!(update.change_text.as_deref(), Some("1234567890123456789"));

        let mut quote = QuoteSignal::new();
        quote.apply(update);
        assert_eq!(quote.display_text().len(), MAX_QUOTE_LEN);
    }

    #[test]
    fn test_multibyte_truncation_on_char_boundary() {
        // 'é' is two bytes; nine of them fill 18 bytes and the tenth does not fit
        let dict = Dictionary::new()
            .with(0, TupleValue::text("éééééééééé"))
            .unwrap();
        let (update, _) = decode_quote(&dict);
        assert_eq!(update.symbol.as_deref(), Some("ééééééééé"));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let dict = Dictionary::new()
            .with(0, TupleValue::text("MSFT"))
            .and_then(|d| d.with(0, TupleValue::text("IBM")))
            .unwrap();
        let (update, _) = decode_quote(&dict);
        assert_eq!(update.symbol.as_deref(), Some("IBM"));
    }

    #[test]
    fn test_before_any_quote() {
        let quote = QuoteSignal::new();
        assert_eq!(quote.icon(), MoodIcon::NoConnection);
        assert_eq!(quote.display_text().as_str(), ", ");
    }
}
