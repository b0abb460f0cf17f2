//! Expense types: structured extraction output and the persisted line item
//! created when a user accepts it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Date format the extraction prompt asks for and line items accept.
pub const EXPENSE_DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Extraction output ───────────────────────────────────────────────────────

/// The four string fields requested from the model for a receipt or invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedExpense {
  pub vendor_name:    String,
  pub price:          String,
  pub expense_date:   String,
  pub expense_detail: String,
}

impl ExtractedExpense {
  /// JSON keys in the order the model is asked to produce them.
  pub const KEYS: [&'static str; 4] =
    ["vendorName", "price", "expenseDate", "expenseDetail"];
}

// ─── Line item ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ActivityStore::insert_expense`]; validated.
#[derive(Debug, Clone)]
pub struct NewExpense {
  pub vendor_name:     String,
  pub price_cents:     i64,
  pub expense_date:    NaiveDate,
  pub detail:          String,
  pub account_id:      Option<Uuid>,
  pub file_version_id: Option<Uuid>,
}

impl NewExpense {
  /// Validate accepted extraction output.
  ///
  /// Every field must be non-blank, `price` must be a non-negative amount with
  /// at most two decimals, and `expense_date` must be `YYYY-MM-DD`.
  pub fn from_extracted(
    fields: &ExtractedExpense,
    account_id: Option<Uuid>,
    file_version_id: Option<Uuid>,
  ) -> Result<Self> {
    let vendor_name = required("vendorName", &fields.vendor_name)?;
    let price = required("price", &fields.price)?;
    let date = required("expenseDate", &fields.expense_date)?;
    let detail = required("expenseDetail", &fields.expense_detail)?;

    let expense_date = NaiveDate::parse_from_str(date, EXPENSE_DATE_FORMAT)
      .map_err(|_| Error::InvalidDate(date.to_owned()))?;

    Ok(Self {
      vendor_name: vendor_name.to_owned(),
      price_cents: parse_price_cents(price)?,
      expense_date,
      detail: detail.to_owned(),
      account_id,
      file_version_id,
    })
  }
}

/// A persisted expense line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseLineItem {
  pub expense_id:      Uuid,
  pub vendor_name:     String,
  pub price_cents:     i64,
  pub expense_date:    NaiveDate,
  pub detail:          String,
  pub account_id:      Option<Uuid>,
  pub file_version_id: Option<Uuid>,
  pub created_at:      DateTime<Utc>,
}

impl ExpenseLineItem {
  /// `12.50`-style rendering of `price_cents`.
  pub fn price_display(&self) -> String {
    format!("{}.{:02}", self.price_cents / 100, self.price_cents % 100)
  }

  /// Title given to the renamed copy of the receipt file.
  pub fn receipt_title(&self) -> String {
    format!(
      "{} - {}",
      self.vendor_name,
      self.expense_date.format(EXPENSE_DATE_FORMAT)
    )
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn required<'a>(key: &'static str, value: &'a str) -> Result<&'a str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::MissingField(key))
  } else {
    Ok(trimmed)
  }
}

/// Parse a money amount such as `"10"`, `"10.5"`, `"$1,234.00"` into cents.
pub fn parse_price_cents(raw: &str) -> Result<i64> {
  let invalid = || Error::InvalidPrice(raw.to_owned());

  let cleaned: String = raw
    .trim()
    .trim_start_matches(&['$', '€', '£'][..])
    .trim()
    .chars()
    .filter(|c| *c != ',')
    .collect();

  let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
  let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());

  if (whole.is_empty() && frac.is_empty())
    || !all_digits(whole)
    || !all_digits(frac)
    || frac.len() > 2
  {
    return Err(invalid());
  }

  let whole_cents = if whole.is_empty() {
    0
  } else {
    whole
      .parse::<i64>()
      .ok()
      .and_then(|w| w.checked_mul(100))
      .ok_or_else(invalid)?
  };
  let frac_cents = match frac.len() {
    0 => 0,
    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
    _ => frac.parse::<i64>().map_err(|_| invalid())?,
  };

  whole_cents.checked_add(frac_cents).ok_or_else(invalid)
}
