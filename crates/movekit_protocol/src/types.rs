//! Submission payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Form source discriminator
// ============================================================================

/// Which kind of form produced a submission.
///
/// Contact-style forms route to the contact endpoint and never trigger the
/// automatic WhatsApp handoff (nor offer the manual handoff control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSource {
    Lead,
    Contact,
}

impl FormSource {
    /// Parse the form's source label. Anything that is not a contact label
    /// is treated as a lead.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("contact") {
            FormSource::Contact
        } else {
            FormSource::Lead
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormSource::Lead => "lead",
            FormSource::Contact => "contact",
        }
    }

    pub fn is_contact(&self) -> bool {
        matches!(self, FormSource::Contact)
    }
}

// ============================================================================
// Submission record
// ============================================================================

/// One quote request, built at submit time and consumed immediately by the
/// sink and the handoff builder. Not retained anywhere.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub pickup: String,
    pub dropoff: String,
    pub message: String,
    pub contact_method: String,
    /// Raw selected-items field value (display projection, `"Bed (x2)"`).
    pub selected_items: String,
    /// Compact projection (`"Bed x2"`), recomputed from the store at submit.
    pub items_formatted: String,
    /// Label for where the submission came from (page URL or form name).
    pub page: String,
    pub timestamp: DateTime<Utc>,
    pub source: FormSource,
}

impl SubmissionRecord {
    /// An all-empty record stamped now. Callers fill in what they have;
    /// every consumer tolerates empty fields.
    pub fn empty(source: FormSource) -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            pickup: String::new(),
            dropoff: String::new(),
            message: String::new(),
            contact_method: String::new(),
            selected_items: String::new(),
            items_formatted: String::new(),
            page: String::new(),
            timestamp: Utc::now(),
            source,
        }
    }

    /// Best available items string: compact projection, else the raw
    /// selected-items field, else empty.
    pub fn items_or_raw(&self) -> &str {
        if !self.items_formatted.is_empty() {
            &self.items_formatted
        } else {
            &self.selected_items
        }
    }
}

// ============================================================================
// Remote-log payload
// ============================================================================

/// The exact shape the webhook endpoint expects. Every field is always
/// present in the serialized JSON; missing source data becomes `""`, never
/// null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPayload {
    pub name: String,
    pub phone: String,
    pub pickup: String,
    pub dropoff: String,
    pub selected_items_formatted: String,
    pub contact_method: String,
    pub email: String,
    pub message: String,
}

impl SheetPayload {
    pub fn from_record(record: &SubmissionRecord) -> Self {
        Self {
            name: record.name.clone(),
            phone: record.phone.clone(),
            pickup: record.pickup.clone(),
            dropoff: record.dropoff.clone(),
            selected_items_formatted: record.items_or_raw().to_string(),
            contact_method: record.contact_method.clone(),
            email: record.email.clone(),
            message: record.message.clone(),
        }
    }
}

// ============================================================================
// Projection helpers
// ============================================================================

/// Rewrite a display-format items string into the compact format:
/// `"Bed (x3), Sofa"` -> `"Bed x3, Sofa"`. Entries without a quantity
/// suffix pass through untouched, as does anything that does not look like
/// a quantity suffix at all.
pub fn compact_from_display(display: &str) -> String {
    display
        .split(", ")
        .map(rewrite_entry)
        .collect::<Vec<_>>()
        .join(", ")
}

fn rewrite_entry(entry: &str) -> String {
    let Some(open) = entry.rfind(" (x") else {
        return entry.to_string();
    };
    if !entry.ends_with(')') {
        return entry.to_string();
    }
    let digits = &entry[open + 3..entry.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return entry.to_string();
    }
    format!("{} x{}", &entry[..open], digits)
}
