//! WhatsApp handoff: deep-link construction and the opener seam.
//!
//! Building the link and the manual control is pure; navigation only
//! happens through a [`HandoffOpener`], injected as an explicit optional
//! collaborator. A missing opener means automatic handoff is skipped and
//! only the manual control is offered.

use movekit_protocol::SubmissionRecord;
use thiserror::Error;
use tracing::info;

pub type Result<T> = std::result::Result<T, HandoffError>;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("configured WhatsApp phone number contains no digits: {0:?}")]
    NoPhoneDigits(String),

    #[error("failed to launch URL opener: {0}")]
    Open(#[from] std::io::Error),
}

/// A clickable fallback offered on the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualHandoff {
    pub label: String,
    pub url: String,
}

/// Something that can navigate to a URL. The submission flow treats this as
/// optional; link construction never depends on it.
pub trait HandoffOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform launcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl HandoffOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        info!(url, "opening WhatsApp handoff");
        let mut command = launcher_command(url);
        command.spawn()?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn launcher_command(url: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn launcher_command(url: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher_command(url: &str) -> std::process::Command {
    let mut cmd = std::process::Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Builds `wa.me` links carrying a prefilled quote-request message.
#[derive(Debug, Clone)]
pub struct WhatsappHandoff {
    phone: String,
    business_name: String,
}

impl WhatsappHandoff {
    pub fn new(phone: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            business_name: business_name.into(),
        }
    }

    /// The prefilled message. Total over arbitrary records: every missing
    /// field substitutes its literal fallback phrase.
    pub fn message(&self, record: &SubmissionRecord) -> String {
        let name = fallback(&record.name, "Customer");
        let items = fallback(record.items_or_raw(), "Various items");
        let pickup = fallback(&record.pickup, "Not specified");
        let dropoff = fallback(&record.dropoff, "Not specified");
        let phone = fallback(&record.phone, "Not provided");

        format!(
            "Hi {business}, \n\n\
             My name is {name} and I've just submitted a quote request on your website. \n\n\
             Here are my details:\n\
             • Items to move: {items}\n\
             • Pickup address: {pickup}\n\
             • Dropoff address: {dropoff}\n\
             • My phone: {phone}\n\n\
             Please take a look at my request and get back to me with a quotation. \n\n\
             Thank you!",
            business = self.business_name,
        )
    }

    /// The deep-link URL: digits-only phone, percent-encoded message.
    pub fn link(&self, record: &SubmissionRecord) -> Result<String> {
        let digits: String = self.phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(HandoffError::NoPhoneDigits(self.phone.clone()));
        }
        let encoded = urlencoding::encode(&self.message(record)).into_owned();
        Ok(format!("https://wa.me/{digits}?text={encoded}"))
    }

    /// The confirmation screen's fallback control. Pure: building it never
    /// navigates.
    pub fn manual_control(&self, record: &SubmissionRecord, label: &str) -> Result<ManualHandoff> {
        Ok(ManualHandoff {
            label: label.to_string(),
            url: self.link(record)?,
        })
    }
}

fn fallback<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}
