//! Raw event-log records and structured decoding.
//!
//! Trading events arrive as `{ topics, data }` pairs: topics are indexed
//! 32-byte hex words, data is a concatenation of 32-byte hex words. The
//! [`WordReader`] indexes the data payload by word number so decoders never
//! do offset arithmetic by hand.

use crate::domain::{fixedpoint, Decimal, FixedPointError, MarketId, OutcomeId, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One raw event log, as delivered by a log source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub topics: Vec<String>,
    pub data: String,
}

impl LogRecord {
    pub fn new(topics: Vec<String>, data: impl Into<String>) -> Self {
        LogRecord {
            topics,
            data: data.into(),
        }
    }

    /// True when the data payload carries at least one word. Sources emit
    /// placeholder records with `data == "0x"`; aggregation skips those.
    pub fn has_data(&self) -> bool {
        let payload = self.data.strip_prefix("0x").unwrap_or(&self.data);
        !payload.is_empty()
    }
}

/// The three log kinds the reconciliation flow consumes, already filtered
/// to the tracked account by the upstream source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingLogs {
    pub short_ask_buy_complete_sets: Vec<LogRecord>,
    pub short_sell_buy_complete_sets: Vec<LogRecord>,
    pub sell_complete_sets: Vec<LogRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("log is missing topic {index}")]
    MissingTopic { index: usize },
    #[error("log data is missing word {index}")]
    MissingWord { index: usize },
    #[error("log data is not a sequence of 32-byte hex words: {0}")]
    MalformedData(String),
    #[error("unrecognized trade type code {0}")]
    UnrecognizedTradeType(u128),
    #[error("outcome identifier {0} out of range")]
    OutcomeOutOfRange(u128),
    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),
}

/// Indexes a log's data payload as a sequence of 32-byte words.
pub struct WordReader<'a> {
    payload: &'a str,
    words: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(data: &'a str) -> Result<Self, DecodeError> {
        let payload = data.strip_prefix("0x").unwrap_or(data);
        if payload.len() % fixedpoint::WORD_HEX_LEN != 0 || hex::decode(payload).is_err() {
            return Err(DecodeError::MalformedData(data.to_string()));
        }
        Ok(WordReader {
            payload,
            words: payload.len() / fixedpoint::WORD_HEX_LEN,
        })
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// The raw hex digits of word `index`.
    pub fn word(&self, index: usize) -> Result<&'a str, DecodeError> {
        if index >= self.words {
            return Err(DecodeError::MissingWord { index });
        }
        let start = index * fixedpoint::WORD_HEX_LEN;
        Ok(&self.payload[start..start + fixedpoint::WORD_HEX_LEN])
    }

    /// Word `index` as an unsigned integer.
    pub fn uint(&self, index: usize) -> Result<u128, DecodeError> {
        Ok(fixedpoint::parse_hex_uint(self.word(index)?)?)
    }

    /// Word `index` as a fixed-point (10^18) decimal.
    pub fn fixed(&self, index: usize) -> Result<Decimal, DecodeError> {
        Ok(fixedpoint::unfix(self.word(index)?)?)
    }

    /// The last word as an unsigned integer.
    pub fn last_uint(&self) -> Result<u128, DecodeError> {
        if self.words == 0 {
            return Err(DecodeError::MissingWord { index: 0 });
        }
        self.uint(self.words - 1)
    }
}

fn topic<'a>(log: &'a LogRecord, index: usize) -> Result<&'a str, DecodeError> {
    log.topics
        .get(index)
        .map(String::as_str)
        .ok_or(DecodeError::MissingTopic { index })
}

fn outcome_from_uint(raw: u128) -> Result<OutcomeId, DecodeError> {
    u32::try_from(raw)
        .map(OutcomeId::new)
        .map_err(|_| DecodeError::OutcomeOutOfRange(raw))
}

/// A decoded complete-set-shaped fill (complete-set buy/sell and short ask).
///
/// `outcome_count` is only present on records whose data carries the second
/// word; older sources omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteSetsFill {
    pub market: MarketId,
    pub side: Side,
    pub amount: Decimal,
    pub outcome_count: Option<u32>,
}

/// Topic layout: `[signature, account, market, type]`; type code 1 buys,
/// 2 sells, anything else is rejected.
pub fn decode_complete_sets(log: &LogRecord) -> Result<CompleteSetsFill, DecodeError> {
    let market = MarketId::new(topic(log, 2)?);
    let type_code = fixedpoint::parse_hex_uint(topic(log, 3)?)?;
    let side = match type_code {
        1 => Side::Buy,
        2 => Side::Sell,
        other => return Err(DecodeError::UnrecognizedTradeType(other)),
    };
    let reader = WordReader::new(&log.data)?;
    let amount = reader.fixed(0)?;
    let outcome_count = if reader.len() > 1 {
        let raw = reader.uint(1)?;
        Some(
            u32::try_from(raw).map_err(|_| DecodeError::OutcomeOutOfRange(raw))?,
        )
    } else {
        None
    };
    Ok(CompleteSetsFill {
        market,
        side,
        amount,
        outcome_count,
    })
}

/// A decoded short-sell taker fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortSellFill {
    pub market: MarketId,
    pub amount: Decimal,
    pub outcome: OutcomeId,
}

/// Topic layout: `[signature, market]`; data word 1 is the share amount and
/// the last word is the outcome the taker shorted.
pub fn decode_short_sell(log: &LogRecord) -> Result<ShortSellFill, DecodeError> {
    let market = MarketId::new(topic(log, 1)?);
    let reader = WordReader::new(&log.data)?;
    let amount = reader.fixed(1)?;
    let outcome = outcome_from_uint(reader.last_uint()?)?;
    Ok(ShortSellFill {
        market,
        amount,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixedpoint::{fix_to_word, uint_to_word};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn complete_sets_log(market: &str, type_code: u128, amount: &str, outcomes: u128) -> LogRecord {
        LogRecord::new(
            vec![
                "0x0".to_string(),
                "0xb0b".to_string(),
                market.to_string(),
                format!("0x{:x}", type_code),
            ],
            format!(
                "0x{}{}",
                fix_to_word(d(amount)).unwrap(),
                uint_to_word(outcomes)
            ),
        )
    }

    fn short_sell_log(market: &str, amount: &str, outcome: u128) -> LogRecord {
        LogRecord::new(
            vec!["0x0".to_string(), market.to_string()],
            format!(
                "0x{}{}{}{}",
                uint_to_word(0xdead),
                fix_to_word(d(amount)).unwrap(),
                uint_to_word(0xbeef),
                uint_to_word(outcome)
            ),
        )
    }

    #[test]
    fn test_decode_complete_sets_buy() {
        let fill = decode_complete_sets(&complete_sets_log("0xA1", 1, "10.5", 2)).unwrap();
        assert_eq!(fill.market, MarketId::new("0xa1"));
        assert_eq!(fill.side, Side::Buy);
        assert_eq!(fill.amount, d("10.5"));
        assert_eq!(fill.outcome_count, Some(2));
    }

    #[test]
    fn test_decode_complete_sets_sell() {
        let fill = decode_complete_sets(&complete_sets_log("0xa2", 2, "3", 7)).unwrap();
        assert_eq!(fill.side, Side::Sell);
        assert_eq!(fill.outcome_count, Some(7));
    }

    #[test]
    fn test_decode_complete_sets_without_outcome_count() {
        let log = LogRecord::new(
            vec![
                "0x0".to_string(),
                "0xb0b".to_string(),
                "0xa1".to_string(),
                "0x1".to_string(),
            ],
            format!("0x{}", fix_to_word(d("1")).unwrap()),
        );
        let fill = decode_complete_sets(&log).unwrap();
        assert_eq!(fill.outcome_count, None);
    }

    #[test]
    fn test_decode_complete_sets_rejects_unknown_type() {
        let err = decode_complete_sets(&complete_sets_log("0xa1", 3, "1", 2)).unwrap_err();
        assert_eq!(err, DecodeError::UnrecognizedTradeType(3));
    }

    #[test]
    fn test_decode_complete_sets_missing_topics() {
        let log = LogRecord::new(vec!["0x0".to_string()], "0x");
        assert_eq!(
            decode_complete_sets(&log).unwrap_err(),
            DecodeError::MissingTopic { index: 2 }
        );
    }

    #[test]
    fn test_decode_short_sell() {
        let fill = decode_short_sell(&short_sell_log("0xC5", "20", 4)).unwrap();
        assert_eq!(fill.market, MarketId::new("0xc5"));
        assert_eq!(fill.amount, d("20"));
        assert_eq!(fill.outcome, OutcomeId::new(4));
    }

    #[test]
    fn test_decode_short_sell_needs_two_words() {
        let log = LogRecord::new(
            vec!["0x0".to_string(), "0xc5".to_string()],
            format!("0x{}", uint_to_word(1)),
        );
        assert_eq!(
            decode_short_sell(&log).unwrap_err(),
            DecodeError::MissingWord { index: 1 }
        );
    }

    #[test]
    fn test_word_reader_rejects_ragged_payload() {
        assert!(matches!(
            WordReader::new("0xabc"),
            Err(DecodeError::MalformedData(_))
        ));
        assert!(matches!(
            WordReader::new(&format!("0x{}zz", &uint_to_word(0)[..62])),
            Err(DecodeError::MalformedData(_))
        ));
    }

    #[test]
    fn test_word_reader_empty_payload() {
        let reader = WordReader::new("0x").unwrap();
        assert!(reader.is_empty());
        assert_eq!(reader.word(0).unwrap_err(), DecodeError::MissingWord { index: 0 });
    }

    #[test]
    fn test_has_data() {
        assert!(!LogRecord::new(vec![], "0x").has_data());
        assert!(LogRecord::new(vec![], format!("0x{}", uint_to_word(1))).has_data());
    }
}
