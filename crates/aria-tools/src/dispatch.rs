//! Name-indexed tool dispatch with audit wrapping.

use std::sync::Arc;

use aria_observe::ActionKind;
use aria_session::CallSession;
use serde_json::Value;

use crate::context::ToolContext;
use crate::{client, comms, contracts, history, identity};

fn arg_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

fn missing(parameter: &str) -> String {
    format!("Il me manque une information pour utiliser cet outil : {parameter}.")
}

/// Dispatches one tool invocation for a call.
///
/// The session mutex is held for the whole invocation, serializing tool
/// calls per call. Every invocation is bracketed by `TOOL_CALL` /
/// `TOOL_RESULT` audit records (fire-and-forget). The return value is
/// the agent's spoken response; dispatch never fails.
pub async fn dispatch(
    ctx: &ToolContext,
    session: &Arc<tokio::sync::Mutex<CallSession>>,
    name: &str,
    args: &Value,
) -> String {
    let mut session = session.lock().await;
    let journal_id = session.journal_id();

    tracing::info!(
        call_id = session.call_id(),
        tool = name,
        "tool invocation"
    );
    ctx.audit(
        journal_id,
        ActionKind::ToolCall,
        name,
        Some(args.clone()),
        None,
    )
    .await;

    let response = match name {
        // Identification
        "lookup_client_by_email" => match arg_str(args, "email") {
            Some(email) => identity::lookup_client_by_email(ctx, &mut session, &email).await,
            None => missing("l'adresse e-mail"),
        },
        "lookup_client_by_phone" => match arg_str(args, "phone") {
            Some(phone) => identity::lookup_client_by_phone(ctx, &mut session, &phone).await,
            None => missing("le numéro de téléphone"),
        },
        "lookup_client_by_fullname" => {
            match (arg_str(args, "last_name"), arg_str(args, "first_name")) {
                (Some(last), Some(first)) => {
                    identity::lookup_client_by_fullname(ctx, &mut session, &last, &first).await
                }
                _ => missing("le nom et le prénom"),
            }
        }
        "confirm_identity" => match args.get("confirmation").and_then(Value::as_bool) {
            Some(accepted) => identity::confirm_identity(ctx, &mut session, accepted).await,
            None => missing("la confirmation (oui ou non)"),
        },
        "clear_context" => identity::clear_context(&mut session).await,

        // Client file
        "get_client_details" => client::get_client_details(&mut session).await,
        "update_contact_information" => match serde_json::from_value(args.clone()) {
            Ok(update) => client::update_contact_information(ctx, &mut session, update).await,
            Err(_) => missing("les champs à mettre à jour"),
        },

        // Contracts
        "list_client_contracts" => contracts::list_client_contracts(ctx, &mut session).await,
        "get_contract_details" => match arg_str(args, "contract_reference") {
            Some(reference) => {
                contracts::get_contract_details(ctx, &mut session, &reference).await
            }
            None => missing("la référence du contrat"),
        },
        "get_contract_company_info" => match arg_str(args, "contract_reference") {
            Some(reference) => {
                contracts::get_contract_company_info(ctx, &mut session, &reference).await
            }
            None => missing("la référence du contrat"),
        },
        "get_contract_formula_details" => match arg_str(args, "contract_reference") {
            Some(reference) => {
                contracts::get_contract_formula_details(ctx, &mut session, &reference).await
            }
            None => missing("la référence du contrat"),
        },

        // History
        "get_client_interaction_history" => {
            history::get_client_interaction_history(ctx, &mut session).await
        }
        "check_upcoming_appointments" => {
            history::check_upcoming_appointments(ctx, &mut session).await
        }
        "summarize_advisory_duty" => history::summarize_advisory_duty(ctx, &mut session).await,

        // Communication
        "send_confirmation_email" => match (arg_str(args, "subject"), arg_str(args, "body")) {
            (Some(subject), Some(body)) => {
                comms::send_confirmation_email(ctx, &mut session, &subject, &body).await
            }
            _ => missing("le sujet et le corps de l'e-mail"),
        },
        "schedule_callback" => match (arg_str(args, "reason"), arg_str(args, "datetime_str")) {
            (Some(reason), Some(datetime_str)) => {
                comms::schedule_callback(ctx, &mut session, &reason, &datetime_str).await
            }
            _ => missing("le motif et la date du rappel"),
        },
        "find_employee_for_escalation" => {
            comms::find_employee_for_escalation(
                ctx,
                arg_str(args, "name"),
                arg_str(args, "function"),
            )
            .await
        }
        "record_call_feedback" => match args.get("note").and_then(Value::as_i64) {
            Some(note) => {
                comms::record_call_feedback(ctx, &mut session, note, arg_str(args, "comment"))
                    .await
            }
            None => missing("la note de satisfaction"),
        },

        _ => {
            tracing::warn!(tool = name, "unknown tool requested");
            format!("Je ne dispose pas de l'outil '{name}'.")
        }
    };

    ctx.audit(
        journal_id,
        ActionKind::ToolResult,
        name,
        None,
        Some(response.clone()),
    )
    .await;

    response
}
