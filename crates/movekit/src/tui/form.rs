//! Form field state.

use movekit_protocol::{FormSource, SubmissionRecord};
use movekit_selection::SelectionStore;

/// The text inputs on the quote form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Name,
    Phone,
    Email,
    Pickup,
    Dropoff,
    ContactMethod,
    Message,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub id: FieldId,
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(id: FieldId, label: &'static str) -> Self {
        Self {
            id,
            label,
            value: String::new(),
        }
    }
}

/// All form state for one submission attempt.
///
/// `selected_items` is the equivalent of the web form's hidden field: the
/// chip row rewrites it with the display projection after every mutation,
/// and it rides into the record as the raw selection string.
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<Field>,
    pub selected_items: String,
    pub source: FormSource,
    pub page: String,
}

impl FormState {
    pub fn new(source: FormSource) -> Self {
        Self {
            fields: vec![
                Field::new(FieldId::Name, "Name"),
                Field::new(FieldId::Phone, "Phone"),
                Field::new(FieldId::Email, "Email"),
                Field::new(FieldId::Pickup, "Pickup postcode"),
                Field::new(FieldId::Dropoff, "Dropoff postcode"),
                Field::new(FieldId::ContactMethod, "Preferred contact"),
                Field::new(FieldId::Message, "Message"),
            ],
            selected_items: String::new(),
            source,
            page: format!("movekit://form/{}", source.as_str()),
        }
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }

    /// Hidden-field write: the sole channel by which selection state
    /// reaches the submission payload.
    pub fn set_selected_items(&mut self, display: String) {
        self.selected_items = display;
    }

    /// Build the submission record. The compact projection is recomputed
    /// from the store here, in case the hidden field is ever stale.
    pub fn record(&self, store: &SelectionStore) -> SubmissionRecord {
        let mut record = SubmissionRecord::empty(self.source);
        record.name = self.value(FieldId::Name).to_string();
        record.phone = self.value(FieldId::Phone).to_string();
        record.email = self.value(FieldId::Email).to_string();
        record.pickup = self.value(FieldId::Pickup).to_string();
        record.dropoff = self.value(FieldId::Dropoff).to_string();
        record.contact_method = self.value(FieldId::ContactMethod).to_string();
        record.message = self.value(FieldId::Message).to_string();
        record.selected_items = self.selected_items.clone();
        record.items_formatted = store.compact_string();
        record.page = self.page.clone();
        record
    }
}
