//! Gated history tools: interaction history, upcoming appointments, and
//! the advisory-duty summary.

use aria_session::CallSession;
use chrono::NaiveDateTime;

use crate::client::DETAILS_REFUSAL;
use crate::context::ToolContext;

/// Number of history entries read back to the caller.
const HISTORY_LIMIT: u32 = 5;

/// Renders a stored ISO 8601 date-time as "25/12/2024 à 14:30" for
/// speech. Unparseable values fall back to the raw string.
pub(crate) fn format_event_date(iso: &str) -> String {
    match NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => dt.format("%d/%m/%Y à %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Summarises the confirmed client's recent interactions, most recent
/// first.
pub(crate) async fn get_client_interaction_history(
    ctx: &ToolContext,
    session: &mut CallSession,
) -> String {
    let Some(client) = session.confirmed() else {
        return DETAILS_REFUSAL.to_string();
    };
    let client_id = client.id;

    let history = ctx
        .with_conn(move |conn| aria_directory::client_history(conn, client_id, HISTORY_LIMIT))
        .await;

    match history {
        Ok(events) if events.is_empty() => {
            "Je ne trouve aucune interaction récente dans votre dossier.".to_string()
        }
        Ok(events) => {
            let mut lines = vec!["Voici un résumé des dernières interactions :".to_string()];
            for event in &events {
                lines.push(format!(
                    "- le {} : {}",
                    format_event_date(&event.for_date),
                    event.comment
                ));
            }
            lines.join("\n")
        }
        Err(e) => {
            tracing::error!(client_id, "history lookup failed: {e}");
            "Désolé, je n'arrive pas à consulter l'historique pour le moment.".to_string()
        }
    }
}

/// Lists the confirmed client's upcoming appointments, ascending by date.
pub(crate) async fn check_upcoming_appointments(
    ctx: &ToolContext,
    session: &mut CallSession,
) -> String {
    let Some(client) = session.confirmed() else {
        return DETAILS_REFUSAL.to_string();
    };
    let client_id = client.id;

    let upcoming = ctx
        .with_conn(move |conn| aria_directory::upcoming_appointments(conn, client_id))
        .await;

    match upcoming {
        Ok(events) if events.is_empty() => {
            "Je ne vois aucun rendez-vous à venir dans votre dossier.".to_string()
        }
        Ok(events) => {
            let mut lines = vec!["Vous avez des rendez-vous à venir :".to_string()];
            for event in &events {
                lines.push(format!(
                    "- le {} : {}",
                    format_event_date(&event.for_date),
                    event.comment
                ));
            }
            lines.join("\n")
        }
        Err(e) => {
            tracing::error!(client_id, "appointment lookup failed: {e}");
            "Désolé, je n'arrive pas à consulter l'agenda pour le moment.".to_string()
        }
    }
}

/// Reads back the advisory-duty record captured when the client
/// subscribed.
pub(crate) async fn summarize_advisory_duty(
    ctx: &ToolContext,
    session: &mut CallSession,
) -> String {
    let Some(client) = session.confirmed() else {
        return DETAILS_REFUSAL.to_string();
    };
    let client_id = client.id;

    let duty = ctx
        .with_conn(move |conn| aria_directory::advisory_duty_for_client(conn, client_id))
        .await;

    match duty {
        Ok(Some(duty)) => {
            let mut parts = Vec::new();
            if let Some(situation) = &duty.client_situation {
                parts.push(format!("situation : {situation}"));
            }
            if let Some(budget) = &duty.budget {
                parts.push(format!("budget : {budget}"));
            }
            let needs = duty.needs();
            if !needs.is_empty() {
                parts.push(format!("besoins exprimés : {}", needs.join(", ")));
            }
            format!(
                "Pour vous rassurer sur le choix de votre contrat, voici ce que nous avions \
                 noté lors de la souscription : {}.",
                parts.join(" ; ")
            )
        }
        Ok(None) => {
            "Je n'ai pas retrouvé de document de devoir de conseil pour votre dossier."
                .to_string()
        }
        Err(e) => {
            tracing::error!(client_id, "advisory duty lookup failed: {e}");
            "Désolé, je n'arrive pas à consulter ce document pour le moment.".to_string()
        }
    }
}
