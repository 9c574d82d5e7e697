//! Best-effort outbound side-channels for the ARIA agent.
//!
//! Two collaborators live here: transactional email (client confirmations
//! and internal back-office notifications, SendGrid-style HTTP API) and
//! the advisor-callback calendar. Both are *best-effort*: a failure is
//! reported to the caller as an error value, and the tool layer degrades
//! to a spoken fallback — a failed email or calendar write must never
//! take the conversation down or touch identity state.
//!
//! The transports are trait objects so tests can inject recording or
//! failing doubles without any network.

mod calendar;
mod error;
mod mail;

pub use calendar::{CalendarConfig, CalendarEvent, CalendarTransport, HttpCalendar};
pub use error::NotifyError;
pub use mail::{MailConfig, MailTransport, Notifier, SendGridMailer};
