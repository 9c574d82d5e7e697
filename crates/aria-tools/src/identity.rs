//! Identification tools: client lookup, identity confirmation, context
//! clearing.
//!
//! None of these are gated; they are how the gate gets opened. The
//! confirmation handler owns the one best-effort enrichment of the
//! system: the upcoming-appointments check that runs right after a
//! successful confirmation.

use aria_session::{CallSession, ConfirmOutcome, LookupDisposition};
use aria_types::{Client, LookupSource};

use crate::context::ToolContext;
use crate::history::format_event_date;

pub(crate) const NOT_FOUND: &str =
    "Désolé, aucun client correspondant n'a été trouvé avec ces informations.";

pub(crate) const AMBIGUOUS: &str = "J'ai trouvé plusieurs clients correspondants. \
     Pour vous identifier précisément, pouvez-vous me donner votre adresse e-mail ?";

pub(crate) const CONFIRM_WITHOUT_LOOKUP: &str =
    "Veuillez d'abord rechercher un client avant de confirmer une identité.";

/// Looks up a client by email address.
pub(crate) async fn lookup_client_by_email(
    ctx: &ToolContext,
    session: &mut CallSession,
    email: &str,
) -> String {
    let email = email.trim().to_string();
    tracing::info!(call_id = session.call_id(), "lookup by email");

    let found = ctx
        .with_conn(move |conn| {
            aria_directory::find_client_by_email(conn, &email)
                .map(|c| c.into_iter().collect::<Vec<_>>())
        })
        .await;
    finish_lookup(session, found, LookupSource::Email)
}

/// Looks up clients by phone number (suffix match).
pub(crate) async fn lookup_client_by_phone(
    ctx: &ToolContext,
    session: &mut CallSession,
    phone: &str,
) -> String {
    let phone = phone.trim().to_string();
    tracing::info!(call_id = session.call_id(), "lookup by phone");

    let found = ctx
        .with_conn(move |conn| aria_directory::find_clients_by_phone(conn, &phone))
        .await;
    finish_lookup(session, found, LookupSource::Phone)
}

/// Looks up clients by exact full name.
pub(crate) async fn lookup_client_by_fullname(
    ctx: &ToolContext,
    session: &mut CallSession,
    last_name: &str,
    first_name: &str,
) -> String {
    let last_name = last_name.trim().to_string();
    let first_name = first_name.trim().to_string();
    tracing::info!(call_id = session.call_id(), "lookup by full name");

    let found = ctx
        .with_conn(move |conn| {
            aria_directory::find_clients_by_fullname(conn, &last_name, &first_name)
        })
        .await;
    finish_lookup(session, found, LookupSource::FullName)
}

/// Applies a lookup result to the session and phrases the outcome.
///
/// A directory failure is phrased as "not found" without touching the
/// session, so the caller can simply retry.
fn finish_lookup(
    session: &mut CallSession,
    found: Result<Vec<Client>, crate::ToolError>,
    source: LookupSource,
) -> String {
    let matches = match found {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(call_id = session.call_id(), %source, "lookup failed: {e}");
            return "Désolé, une erreur technique est survenue pendant la recherche. \
                    Pouvez-vous répéter ?"
                .to_string();
        }
    };

    match session.apply_lookup(matches) {
        LookupDisposition::NotFound => NOT_FOUND.to_string(),
        LookupDisposition::Multiple(count) => {
            tracing::info!(call_id = session.call_id(), %source, count, "ambiguous lookup");
            AMBIGUOUS.to_string()
        }
        LookupDisposition::Single(client) => {
            tracing::info!(
                call_id = session.call_id(),
                %source,
                client_id = client.id,
                "unconfirmed candidate set"
            );
            format!(
                "J'ai trouvé un dossier pour {}. Pouvez-vous me confirmer que c'est bien \
                 vous, afin que j'accède au dossier en toute sécurité ?",
                client.full_name()
            )
        }
    }
}

/// Resolves the pending confirmation.
///
/// On acceptance the confirmed client is recorded on the call journal and
/// the upcoming-appointments enrichment runs, both strictly *after* the
/// state transition and both best-effort.
pub(crate) async fn confirm_identity(
    ctx: &ToolContext,
    session: &mut CallSession,
    accepted: bool,
) -> String {
    match session.confirm(accepted) {
        ConfirmOutcome::NothingPending => CONFIRM_WITHOUT_LOOKUP.to_string(),
        ConfirmOutcome::Denied => {
            tracing::warn!(call_id = session.call_id(), "identity denied by caller");
            "Très bien, je n'accéderai pas à ce dossier. Comment puis-je vous aider ?".to_string()
        }
        ConfirmOutcome::Confirmed(client) => {
            tracing::info!(
                call_id = session.call_id(),
                client_id = client.id,
                "identity confirmed"
            );

            if let Some(journal_id) = session.journal_id() {
                let client_id = client.id;
                let recorded = ctx
                    .with_conn(move |conn| {
                        aria_observe::set_call_client(conn, journal_id, client_id)
                    })
                    .await;
                if let Err(e) = recorded {
                    tracing::warn!(journal_id, "failed to record confirmed client: {e}");
                }
            }

            let mut response = format!(
                "Merci ! Identité confirmée. Le dossier de {} est maintenant ouvert. \
                 Comment puis-je vous aider ?",
                client.full_name()
            );

            let client_id = client.id;
            match ctx
                .with_conn(move |conn| aria_directory::upcoming_appointments(conn, client_id))
                .await
            {
                Ok(events) if !events.is_empty() => {
                    response.push_str(
                        "\n\nAu fait, je vois que vous avez des rendez-vous à venir :",
                    );
                    for event in &events {
                        response.push_str(&format!(
                            "\n- le {} : {}",
                            format_event_date(&event.for_date),
                            event.comment
                        ));
                    }
                }
                Ok(_) => {}
                // Enrichment is best-effort: confirmation stands regardless.
                Err(e) => {
                    tracing::warn!(client_id, "upcoming-appointments enrichment failed: {e}")
                }
            }

            response
        }
    }
}

/// Unconditionally resets the identity state. Used between callers
/// sharing one session.
pub(crate) async fn clear_context(session: &mut CallSession) -> String {
    session.clear();
    tracing::info!(call_id = session.call_id(), "context cleared");
    "Le contexte a été réinitialisé. Comment puis-je vous aider ?".to_string()
}
