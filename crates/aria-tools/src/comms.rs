//! Communication and escalation tools: client email, advisor callback
//! scheduling, escalation routing, and end-of-call feedback.

use aria_notify::CalendarEvent;
use aria_session::CallSession;
use chrono::{Duration, NaiveDateTime};

use crate::context::ToolContext;

pub(crate) const EMAIL_REFUSAL: &str = "Action impossible. L'identité du client doit être \
     confirmée et une adresse e-mail doit être enregistrée.";

pub(crate) const CALLBACK_REFUSAL: &str =
    "L'identité du client doit être confirmée avant de planifier un rappel.";

/// Length of an advisor callback slot.
const CALLBACK_SLOT_MINUTES: i64 = 30;

/// Sends a confirmation email to the confirmed client.
///
/// A transport failure degrades to an offered advisor callback: the
/// back office is notified (best-effort) and the caller hears a
/// recoverable apology, never an error.
pub(crate) async fn send_confirmation_email(
    ctx: &ToolContext,
    session: &mut CallSession,
    subject: &str,
    body: &str,
) -> String {
    let Some(client) = session.confirmed() else {
        return EMAIL_REFUSAL.to_string();
    };
    if client.email.is_none() {
        return EMAIL_REFUSAL.to_string();
    }
    let client = client.clone();

    match ctx.notifier().send_client_email(&client, subject, body).await {
        Ok(()) => {
            let address = client.email.as_deref().unwrap_or_default();
            format!("Un e-mail de confirmation a bien été envoyé à l'adresse {address}.")
        }
        Err(e) => {
            tracing::error!(client_id = client.id, "client email failed: {e}");

            // Fallback: ask the back office to call back. Its own failure
            // is only logged; the caller already gets the fallback line.
            let notify_body = format!(
                "L'envoi d'un e-mail au client {} (ID : {}) a échoué.\n\
                 Sujet demandé : {}\nMerci de rappeler le client.",
                client.full_name(),
                client.id,
                subject
            );
            if let Err(e) = ctx
                .notifier()
                .send_notification("Échec d'envoi e-mail : rappel client demandé", &notify_body)
                .await
            {
                tracing::warn!("back-office fallback notification failed: {e}");
            }

            "Désolé, une erreur technique majeure est survenue lors de l'envoi de \
             l'e-mail. Je planifie un rappel avec un conseiller qui pourra vous \
             transmettre ces informations."
                .to_string()
        }
    }
}

/// Schedules a 30-minute advisor callback for the confirmed client.
///
/// `datetime_str` must be ISO 8601 (`2024-12-25T14:30:00`); the caller's
/// natural-language time has already been normalised by the conversation
/// loop.
pub(crate) async fn schedule_callback(
    ctx: &ToolContext,
    session: &mut CallSession,
    reason: &str,
    datetime_str: &str,
) -> String {
    let Some(client) = session.confirmed() else {
        return CALLBACK_REFUSAL.to_string();
    };

    let start = match NaiveDateTime::parse_from_str(datetime_str.trim(), "%Y-%m-%dT%H:%M:%S") {
        Ok(start) => start,
        Err(_) => {
            tracing::warn!(datetime_str, "invalid callback datetime");
            return "Le format de la date est invalide. Merci d'utiliser le format ISO, \
                    par exemple '2024-12-25T14:30:00'."
                .to_string();
        }
    };

    let event = CalendarEvent {
        summary: format!("Rappel pour : {} (ID : {})", client.full_name(), client.id),
        description: format!("Motif : {reason}"),
        start,
        end: start + Duration::minutes(CALLBACK_SLOT_MINUTES),
    };

    match ctx.calendar().create_event(&event).await {
        Ok(()) => {
            tracing::info!(client_id = client.id, "callback scheduled");
            format!(
                "J'ai programmé un rappel pour vous le {}. Un conseiller vous appellera.",
                start.format("%d/%m/%Y à %H:%M")
            )
        }
        Err(e) => {
            tracing::error!(client_id = client.id, "calendar event failed: {e}");
            "Une erreur est survenue lors de la communication avec le service d'agenda. \
             Je transmets votre demande de rappel à un conseiller."
                .to_string()
        }
    }
}

/// Finds an active employee to take over the call. Deliberately ungated:
/// escalation routing involves no client data.
pub(crate) async fn find_employee_for_escalation(
    ctx: &ToolContext,
    name: Option<String>,
    function: Option<String>,
) -> String {
    let employees = ctx
        .with_conn(move |conn| {
            aria_directory::find_active_employees(conn, name.as_deref(), function.as_deref())
        })
        .await;

    match employees {
        Ok(employees) => match employees.first() {
            Some(employee) => format!(
                "J'ai trouvé {} ({}) qui peut prendre votre dossier en charge.",
                employee.full_name(),
                employee.function
            ),
            None => "Je n'ai pas trouvé de conseiller disponible correspondant à cette \
                 demande."
                .to_string(),
        },
        Err(e) => {
            tracing::error!("employee lookup failed: {e}");
            "Désolé, je n'arrive pas à joindre l'annuaire interne pour le moment.".to_string()
        }
    }
}

/// Records the caller's 1–5 satisfaction note for this call. Requires an
/// open journal, not a confirmed identity.
pub(crate) async fn record_call_feedback(
    ctx: &ToolContext,
    session: &mut CallSession,
    note: i64,
    comment: Option<String>,
) -> String {
    let Some(journal_id) = session.journal_id() else {
        return "Je ne peux pas enregistrer de retour car je n'ai pas d'identifiant \
                d'appel."
            .to_string();
    };

    if !(1..=5).contains(&note) {
        return "La note doit être comprise entre 1 et 5.".to_string();
    }

    let recorded = ctx
        .with_conn(move |conn| {
            aria_observe::record_feedback(conn, journal_id, note, comment.as_deref())
        })
        .await;

    match recorded {
        Ok(_) => {
            "Merci beaucoup pour votre retour, il nous est précieux pour nous améliorer."
                .to_string()
        }
        Err(e) => {
            tracing::error!(journal_id, "feedback write failed: {e}");
            "Je suis désolée, une erreur technique est survenue et je n'ai pas pu \
             enregistrer votre retour."
                .to_string()
        }
    }
}
