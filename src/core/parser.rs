//! Payload parsing: decoded text into typed records
//!
//! Two payload shapes are accepted:
//!
//! - CSV with a header row. A double quote toggles "inside field" state, so
//!   quoted cells may contain commas. Blank lines are skipped.
//! - A JSON array of objects keyed by column name (detected by a leading `[`).
//!
//! Both feed the same coercion stage, so a cell means the same thing
//! whichever shape it came from:
//!
//! | column | empty | otherwise |
//! |---|---|---|
//! | `order_id` | row rejected | positive integer, else row rejected |
//! | `transaction_amount` | `None` | non-negative decimal, else row rejected |
//! | `*rating*` | `None` | decoded by [`RatingDecoder`]; out of 1..=5 is `None` |
//! | others | `""` | trimmed text |
//!
//! A row whose `order_id` does not parse is dropped rather than kept with a
//! missing id, so every emitted record carries a unique positive id.
//! Headers mentioning `rating` other than the four known columns are
//! ignored and logged at debug level.

use serde_json::Value;

use crate::config::{ParserConfig, RatingEncoding};
use crate::core::error::{DataError, DecodeError, HeaderError, ParseError};
use crate::core::record::Record;

/// Decoding strategy for rating cells, resolved once per parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingDecoder {
    /// `"4"` is 4
    Numeric,
    /// `"★★★★"` is 4: count the repetitions of the glyph
    Glyph(String),
}

impl RatingDecoder {
    /// Decode a non-empty, trimmed rating token
    pub fn decode(&self, token: &str) -> Option<u8> {
        let value = match self {
            RatingDecoder::Numeric => token.parse::<i64>().ok()?,
            RatingDecoder::Glyph(unit) => token.matches(unit.as_str()).count() as i64,
        };
        (1..=5).contains(&value).then_some(value as u8)
    }
}

impl From<&ParserConfig> for RatingDecoder {
    fn from(config: &ParserConfig) -> Self {
        match config.rating_encoding {
            RatingEncoding::Glyph if !config.rating_glyph.is_empty() => {
                RatingDecoder::Glyph(config.rating_glyph.clone())
            }
            _ => RatingDecoder::Numeric,
        }
    }
}

/// Which record field a header maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    OrderId,
    Date,
    Time,
    ItemName,
    ItemType,
    TransactionAmount,
    OrderType,
    CustomerId,
    Rating(usize),
    Ignored,
}

impl Column {
    fn from_header(name: &str) -> Self {
        match name {
            "order_id" => Column::OrderId,
            "date" => Column::Date,
            "time" => Column::Time,
            "item_name" => Column::ItemName,
            "item_type" => Column::ItemType,
            "transaction_amount" => Column::TransactionAmount,
            "order_type" => Column::OrderType,
            "customer_id" => Column::CustomerId,
            "taste_rating" => Column::Rating(0),
            "delivery_speed_rating" => Column::Rating(1),
            "environment_rating" => Column::Rating(2),
            "service_rating" => Column::Rating(3),
            _ => Column::Ignored,
        }
    }
}

/// Result of parsing one payload
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Accepted records, in payload order
    pub records: Vec<Record>,
    /// Rows that were dropped
    pub rejected: Vec<ParseError>,
}

/// Payload parser
#[derive(Debug, Clone)]
pub struct Parser {
    ratings: RatingDecoder,
}

impl Parser {
    pub fn new(ratings: RatingDecoder) -> Self {
        Self { ratings }
    }

    /// Parse a payload, picking CSV or JSON from its first non-blank character
    pub fn parse(&self, text: &str) -> Result<ParseOutcome, DataError> {
        let text = text.trim_start_matches('\u{feff}');
        if text.trim_start().starts_with('[') {
            Ok(self.parse_json(text)?)
        } else {
            Ok(self.parse_csv(text)?)
        }
    }

    /// Parse a CSV payload
    pub fn parse_csv(&self, text: &str) -> Result<ParseOutcome, HeaderError> {
        let mut lines = text
            .trim_start_matches('\u{feff}')
            .lines()
            .enumerate()
            .skip_while(|(_, line)| line.trim().is_empty());

        let (_, header_line) = lines.next().ok_or(HeaderError::Empty)?;
        let headers: Vec<String> = split_fields(header_line)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let columns = resolve_columns(&headers)?;

        let mut outcome = ParseOutcome::default();
        for (index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let cells = split_fields(line);
            if cells.len() > columns.len() {
                outcome.rejected.push(ParseError::new(
                    line_no,
                    format!(
                        "row has {} fields but header has {}",
                        cells.len(),
                        columns.len()
                    ),
                ));
                continue;
            }

            let row = columns
                .iter()
                .zip(cells.iter().map(String::as_str).chain(std::iter::repeat("")));
            match self.coerce(row, line_no) {
                Ok(record) => outcome.records.push(record),
                Err(e) => outcome.rejected.push(e),
            }
        }

        Ok(outcome)
    }

    /// Parse a JSON array payload
    pub fn parse_json(&self, text: &str) -> Result<ParseOutcome, DecodeError> {
        let rows: Vec<serde_json::Map<String, Value>> =
            serde_json::from_str(text).map_err(|e| DecodeError::Json(e.to_string()))?;

        let mut outcome = ParseOutcome::default();
        for (index, object) in rows.iter().enumerate() {
            let tokens: Vec<(Column, String)> = object
                .iter()
                .map(|(key, value)| (Column::from_header(key.trim()), json_token(value)))
                .collect();
            let row = tokens.iter().map(|(column, token)| (column, token.as_str()));
            match self.coerce(row, index + 1) {
                Ok(record) => outcome.records.push(record),
                Err(e) => outcome.rejected.push(e),
            }
        }

        Ok(outcome)
    }

    /// The single coercion stage shared by both payload shapes
    fn coerce<'a>(
        &self,
        row: impl Iterator<Item = (&'a Column, &'a str)>,
        line: usize,
    ) -> Result<Record, ParseError> {
        let mut order_id = None;
        let mut record = Record::new(0);

        for (column, raw) in row {
            let value = raw.trim();
            match column {
                Column::OrderId => {
                    let id = value
                        .parse::<u64>()
                        .ok()
                        .filter(|id| *id >= 1)
                        .ok_or_else(|| {
                            ParseError::new(
                                line,
                                format!("order_id '{}' is not a positive integer", value),
                            )
                        })?;
                    order_id = Some(id);
                }
                Column::TransactionAmount => {
                    record.transaction_amount = parse_amount(value, line)?;
                }
                Column::Rating(slot) => {
                    let rating = if value.is_empty() {
                        None
                    } else {
                        self.ratings.decode(value)
                    };
                    match *slot {
                        0 => record.taste_rating = rating,
                        1 => record.delivery_speed_rating = rating,
                        2 => record.environment_rating = rating,
                        _ => record.service_rating = rating,
                    }
                }
                Column::Date => record.date = value.to_string(),
                Column::Time => record.time = value.to_string(),
                Column::ItemName => record.item_name = value.to_string(),
                Column::ItemType => record.item_type = value.to_string(),
                Column::OrderType => record.order_type = value.to_string(),
                Column::CustomerId => record.customer_id = value.to_string(),
                Column::Ignored => {}
            }
        }

        record.order_id = order_id.ok_or_else(|| ParseError::new(line, "missing order_id"))?;
        Ok(record)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(RatingDecoder::Numeric)
    }
}

/// Split one CSV line into cells
///
/// A `"` toggles quoted state and is not copied into the cell.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn resolve_columns(headers: &[String]) -> Result<Vec<Column>, HeaderError> {
    if headers.iter().all(|h| h.is_empty()) {
        return Err(HeaderError::Empty);
    }

    let mut seen = std::collections::HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header.as_str()) {
            return Err(HeaderError::DuplicateColumn(header.clone()));
        }
    }
    if !seen.contains("order_id") {
        return Err(HeaderError::MissingColumn("order_id".to_string()));
    }

    for header in unknown_rating_headers(headers) {
        tracing::debug!(header = %header, "Ignoring unrecognized rating column");
    }

    Ok(headers.iter().map(|h| Column::from_header(h)).collect())
}

/// Headers that look like ratings but map to no known rating column
fn unknown_rating_headers(headers: &[String]) -> impl Iterator<Item = &str> {
    headers
        .iter()
        .map(String::as_str)
        .filter(|h| h.contains("rating") && Column::from_header(h) == Column::Ignored)
}

fn parse_amount(value: &str, line: usize) -> Result<Option<f64>, ParseError> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(Some(amount)),
        _ => Err(ParseError::new(
            line,
            format!("transaction_amount '{}' is not a non-negative decimal", value),
        )),
    }
}

fn json_token(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "order_id,date,time,item_name,item_type,transaction_amount,order_type,customer_id,taste_rating,delivery_speed_rating,environment_rating,service_rating";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_parse_full_row() {
        let text = csv(&["1,03-13-2022,21:04,干煸豆角,主食,35.0,外卖,CUST_19833,5,5,,"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();

        assert!(outcome.rejected.is_empty());
        let record = &outcome.records[0];
        assert_eq!(record.order_id, 1);
        assert_eq!(record.date, "03-13-2022");
        assert_eq!(record.time, "21:04");
        assert_eq!(record.item_name, "干煸豆角");
        assert_eq!(record.item_type, "主食");
        assert_eq!(record.transaction_amount, Some(35.0));
        assert_eq!(record.order_type, "外卖");
        assert_eq!(record.customer_id, "CUST_19833");
        assert_eq!(record.taste_rating, Some(5));
        assert_eq!(record.delivery_speed_rating, Some(5));
        assert_eq!(record.environment_rating, None);
        assert_eq!(record.service_rating, None);
    }

    #[test]
    fn test_blank_lines_skipped_and_order_kept() {
        let text = csv(&["3,,,a,,1,,,,,,", "", "   ", "1,,,b,,2,,,,,,", "2,,,c,,3,,,,,,", ""]);
        let outcome = Parser::default().parse_csv(&text).unwrap();

        let ids: Vec<u64> = outcome.records.iter().map(|r| r.order_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = format!("{}\r\n1,,,a,,1.5,,,,,,\r\n", HEADER);
        let outcome = Parser::default().parse_csv(&text).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].transaction_amount, Some(1.5));
    }

    #[test]
    fn test_quoted_field_with_comma() {
        let text = csv(&["1,,,\"Rice, fried\",主食,12,堂食,C1,4,,4,5"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();
        assert_eq!(outcome.records[0].item_name, "Rice, fried");
        assert_eq!(outcome.records[0].item_type, "主食");
        assert_eq!(outcome.records[0].service_rating, Some(5));
    }

    #[test]
    fn test_invalid_order_id_drops_row() {
        let text = csv(&["abc,,,a,,1,,,,,,", "0,,,b,,1,,,,,,", "2,,,c,,1,,,,,,"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].order_id, 2);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].line, 2);
        assert_eq!(outcome.rejected[1].line, 3);
    }

    #[test]
    fn test_unknown_rating_column_is_ignored() {
        let headers: Vec<String> = ["order_id", "taste_rating", "value_rating", "notes"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(
            unknown_rating_headers(&headers).collect::<Vec<_>>(),
            vec!["value_rating"]
        );

        let outcome = Parser::default()
            .parse_csv("order_id,taste_rating,value_rating\n7,4,5\n")
            .unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].taste_rating, Some(4));
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_amount_coercion() {
        let text = csv(&["1,,,a,,,,,,,,", "2,,,b,,-3,,,,,,", "3,,,c,,abc,,,,,,", "4,,,d,,0,,,,,,"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();

        let ids: Vec<u64> = outcome.records.iter().map(|r| r.order_id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(outcome.records[0].transaction_amount, None);
        assert_eq!(outcome.records[1].transaction_amount, Some(0.0));
        assert_eq!(outcome.rejected.len(), 2);
    }

    #[test]
    fn test_numeric_rating_coercion() {
        let text = csv(&["1,,,a,,1,,,x,0,6,3"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();
        let record = &outcome.records[0];

        assert_eq!(record.taste_rating, None);
        assert_eq!(record.delivery_speed_rating, None);
        assert_eq!(record.environment_rating, None);
        assert_eq!(record.service_rating, Some(3));
    }

    #[test]
    fn test_glyph_rating_coercion() {
        let parser = Parser::new(RatingDecoder::Glyph("★".to_string()));
        let text = csv(&["1,,,a,,1,外卖,,★★★★,★★,,★★★★★★"]);
        let outcome = parser.parse_csv(&text).unwrap();
        let record = &outcome.records[0];

        assert_eq!(record.taste_rating, Some(4));
        assert_eq!(record.delivery_speed_rating, Some(2));
        assert_eq!(record.environment_rating, None);
        assert_eq!(record.service_rating, None);
    }

    #[test]
    fn test_short_row_fills_empty_and_long_row_rejected() {
        let text = csv(&["1,03-13-2022", "2,,,,,,,,,,,,extra"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].date, "03-13-2022");
        assert_eq!(outcome.records[0].item_name, "");
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].line, 3);
    }

    #[test]
    fn test_text_fields_trimmed() {
        let text = csv(&["  7 , 03-13-2022 ,21:04,  鱼香肉丝  ,,,,,,,,"]);
        let outcome = Parser::default().parse_csv(&text).unwrap();
        assert_eq!(outcome.records[0].order_id, 7);
        assert_eq!(outcome.records[0].date, "03-13-2022");
        assert_eq!(outcome.records[0].item_name, "鱼香肉丝");
    }

    #[test]
    fn test_header_errors() {
        let parser = Parser::default();
        assert_eq!(parser.parse_csv("").unwrap_err(), HeaderError::Empty);
        assert_eq!(parser.parse_csv("\n\n").unwrap_err(), HeaderError::Empty);
        assert_eq!(
            parser.parse_csv("date,time\n1,2").unwrap_err(),
            HeaderError::MissingColumn("order_id".to_string())
        );
        assert_eq!(
            parser.parse_csv("order_id,date,date\n1,2,3").unwrap_err(),
            HeaderError::DuplicateColumn("date".to_string())
        );
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let outcome = Parser::default().parse_csv(HEADER).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_bom_and_reordered_columns() {
        let text = "\u{feff}item_name,order_id,extra_column\n宫保鸡丁,9,ignored\n";
        let outcome = Parser::default().parse(text).unwrap();
        assert_eq!(outcome.records[0].order_id, 9);
        assert_eq!(outcome.records[0].item_name, "宫保鸡丁");
    }

    #[test]
    fn test_parse_json_payload() {
        let text = r#"[
            {"order_id": 1, "item_name": "干煸豆角", "transaction_amount": 35.0,
             "order_type": "外卖", "taste_rating": 5, "delivery_speed_rating": 5,
             "environment_rating": null, "service_rating": null},
            {"order_id": "x", "item_name": "bad"},
            {"order_id": 2, "transaction_amount": "", "taste_rating": "4"}
        ]"#;
        let outcome = Parser::default().parse(text).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].transaction_amount, Some(35.0));
        assert_eq!(outcome.records[0].environment_rating, None);
        assert_eq!(outcome.records[1].transaction_amount, None);
        assert_eq!(outcome.records[1].taste_rating, Some(4));
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].line, 2);
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = Parser::default().parse("[{\"order_id\": 1,").unwrap_err();
        assert!(matches!(err, DataError::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a,b,,c"), vec!["a", "b", "", "c"]);
        assert_eq!(split_fields("\"x,y\",z"), vec!["x,y", "z"]);
        assert_eq!(split_fields(""), vec![""]);
    }
}
