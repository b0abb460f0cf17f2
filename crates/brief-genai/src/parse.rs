//! Response decoding: generated text for summaries, structured fields for
//! extraction.

use brief_core::expense::ExtractedExpense;
use serde_json::{Map, Value};

use crate::{Error, Result, wire::GenerateContentResponse};

/// Decode a response body against [`GenerateContentResponse`].
///
/// A body that is not JSON at all is [`Error::Json`]; JSON of the wrong shape
/// is [`Error::InvalidResponseFormat`].
pub fn decode_response(body: &str) -> Result<GenerateContentResponse> {
  let value: Value = serde_json::from_str(body)?;
  serde_json::from_value(value).map_err(|e| Error::InvalidResponseFormat(e.to_string()))
}

/// Extract `candidates[0].content.parts[0].text`.
pub fn parse_summary(body: &str) -> Result<String> {
  decode_response(body)?.into_first_text()
}

/// Extract the generated text and decode it as an [`ExtractedExpense`],
/// tolerating a surrounding markdown code fence.
pub fn parse_extraction(body: &str) -> Result<ExtractedExpense> {
  let text = parse_summary(body)?;
  parse_expense_json(strip_code_fences(&text))
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` marker and a trailing
/// ```` ``` ```` marker, plus surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
  let mut s = text.trim();
  if let Some(rest) = s.strip_prefix("```") {
    s = rest
      .strip_prefix("json")
      .or_else(|| rest.strip_prefix("JSON"))
      .unwrap_or(rest);
  }
  if let Some(rest) = s.trim_end().strip_suffix("```") {
    s = rest;
  }
  s.trim()
}

/// Decode the four expense fields from a JSON object.
///
/// Numbers are accepted and rendered as strings (`10.5` → `"10.5"`); a key
/// that is absent or `null` is [`Error::MissingField`].
pub fn parse_expense_json(text: &str) -> Result<ExtractedExpense> {
  let value: Value =
    serde_json::from_str(text).map_err(|e| Error::InvalidExtraction(e.to_string()))?;
  let Value::Object(map) = value else {
    return Err(Error::InvalidExtraction("expected a JSON object".into()));
  };

  let [vendor, price, date, detail] = ExtractedExpense::KEYS;
  Ok(ExtractedExpense {
    vendor_name:    string_field(&map, vendor)?,
    price:          string_field(&map, price)?,
    expense_date:   string_field(&map, date)?,
    expense_detail: string_field(&map, detail)?,
  })
}

fn string_field(map: &Map<String, Value>, key: &'static str) -> Result<String> {
  match map.get(key) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(Value::Number(n)) => Ok(n.to_string()),
    None | Some(Value::Null) => Err(Error::MissingField(key)),
    Some(other) => Err(Error::InvalidExtraction(format!(
      "{key} must be a string, got {other}"
    ))),
  }
}
