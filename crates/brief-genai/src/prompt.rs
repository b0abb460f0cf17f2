//! Prompt builders for the activity summary and the receipt extraction.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use brief_core::{activity::ActivityRecord, file::FileVersion};

use crate::wire::{GenerateContentRequest, InlineData};

/// Returned instead of a prompt (and as the summary) when there is no
/// activity to summarize.
pub const NO_ACTIVITY_SUMMARY: &str = "No recent activities found for this account.";

/// Line separating one activity block from the next.
pub const RECORD_DELIMITER: &str = "---";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

const SUMMARY_PREAMBLE: &str = "\
You are an assistant preparing a briefing on recent customer activity for an account manager.
Summarize the activities listed below.

Content guidelines:
- Highlight key interactions, decisions, and commitments.
- Call out open tasks and follow-ups that still need attention.
- Describe the overall engagement level of the customer.
- Only use information present in the activities; do not invent details.

Formatting rules:
- Start with a one-sentence overview.
- Follow with at most five short bullet points.
- Use plain text without headings or tables.

Activities:
";

const SUMMARY_CLOSING: &str = "Write the summary now, following the guidelines and formatting rules above.";

const EXTRACTION_INSTRUCTIONS: &str = "\
Extract the expense details from the attached receipt or invoice.
Respond with a JSON object that has exactly these four string fields:
{\"vendorName\": \"...\", \"price\": \"...\", \"expenseDate\": \"YYYY-MM-DD\", \"expenseDetail\": \"...\"}
- vendorName: the merchant or vendor that issued the document.
- price: the total amount charged, digits and a decimal point only.
- expenseDate: the transaction date in YYYY-MM-DD format.
- expenseDetail: a short description of what was purchased.
Return only the JSON object. Do not use markdown, code fences, or any other text.";

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Build the summary prompt for `records` (already sorted newest first).
///
/// An empty slice yields [`NO_ACTIVITY_SUMMARY`].
pub fn build_prompt(records: &[ActivityRecord]) -> String {
  if records.is_empty() {
    return NO_ACTIVITY_SUMMARY.to_owned();
  }

  let blocks: Vec<String> = records.iter().map(record_block).collect();

  let mut prompt = String::from(SUMMARY_PREAMBLE);
  prompt.push_str(&blocks.join(&format!("\n{RECORD_DELIMITER}\n")));
  prompt.push_str("\n\n");
  prompt.push_str(SUMMARY_CLOSING);
  prompt
}

fn record_block(record: &ActivityRecord) -> String {
  let mut block = format!(
    "Type: {}\nSubject: {}\nDate: {}\nStatus: {}",
    record.kind,
    record.subject.as_deref().unwrap_or("(no subject)"),
    record.occurred_at.format(DATE_FORMAT),
    record.status,
  );
  if let Some(body) = record.non_blank_body() {
    block.push_str("\nDescription: ");
    block.push_str(body);
  }
  block
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Instruction text plus the document to send alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionPrompt {
  pub text:       String,
  pub attachment: InlineData,
}

impl ExtractionPrompt {
  pub fn into_request(self) -> GenerateContentRequest {
    GenerateContentRequest::with_attachment(self.text, self.attachment)
  }
}

pub fn build_extraction_prompt(document: &FileVersion) -> ExtractionPrompt {
  ExtractionPrompt {
    text:       EXTRACTION_INSTRUCTIONS.to_owned(),
    attachment: InlineData {
      mime_type: document.mime_type.clone(),
      data:      B64.encode(&document.content),
    },
  }
}
