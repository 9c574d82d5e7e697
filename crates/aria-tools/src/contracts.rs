//! Gated contract tools: listing, detail, managing company, and formula.

use aria_session::CallSession;
use aria_types::Contract;

use crate::context::{ToolContext, ToolError};

pub(crate) const CONTRACTS_REFUSAL: &str = "Veuillez d'abord confirmer l'identité du client.";

/// Resolves a contract by reference *and* verifies it belongs to the
/// confirmed client. Unknown and not-owned references are
/// indistinguishable to the caller.
async fn owned_contract(
    ctx: &ToolContext,
    client_id: i64,
    reference: &str,
) -> Result<Option<Contract>, ToolError> {
    let reference = reference.trim().to_string();
    let contract = ctx
        .with_conn(move |conn| aria_directory::contract_by_reference(conn, &reference))
        .await?;
    Ok(contract.filter(|c| c.client_id == client_id))
}

fn not_in_file(reference: &str) -> String {
    format!(
        "Je n'ai pas trouvé de contrat {} dans votre dossier.",
        reference.trim()
    )
}

const TECHNICAL_HICCUP: &str =
    "Désolé, une erreur technique est survenue. Pouvez-vous reformuler votre demande ?";

/// Lists all contracts held by the confirmed client.
pub(crate) async fn list_client_contracts(ctx: &ToolContext, session: &mut CallSession) -> String {
    let Some(client) = session.confirmed() else {
        return CONTRACTS_REFUSAL.to_string();
    };
    let client_id = client.id;
    let name = client.full_name();

    let contracts = ctx
        .with_conn(move |conn| aria_directory::contracts_for_client(conn, client_id))
        .await;

    match contracts {
        Ok(contracts) if contracts.is_empty() => {
            format!("Aucun contrat trouvé pour {name}.")
        }
        Ok(contracts) => {
            let mut lines = vec![format!("Voici les contrats pour {name} :")];
            for contract in &contracts {
                lines.push(format!(
                    "- Contrat {}, statut : {}",
                    contract.reference, contract.status
                ));
            }
            lines.join("\n")
        }
        Err(e) => {
            tracing::error!(client_id, "contract listing failed: {e}");
            TECHNICAL_HICCUP.to_string()
        }
    }
}

/// Reads status and dates for one of the confirmed client's contracts.
pub(crate) async fn get_contract_details(
    ctx: &ToolContext,
    session: &mut CallSession,
    reference: &str,
) -> String {
    let Some(client) = session.confirmed() else {
        return CONTRACTS_REFUSAL.to_string();
    };

    match owned_contract(ctx, client.id, reference).await {
        Ok(Some(contract)) => {
            let end = match &contract.end_date {
                Some(date) => format!(", se termine le {date}"),
                None => String::new(),
            };
            format!(
                "Détails du contrat {} : statut {}, débuté le {}{}.",
                contract.reference, contract.status, contract.start_date, end
            )
        }
        Ok(None) => not_in_file(reference),
        Err(e) => {
            tracing::error!("contract detail lookup failed: {e}");
            TECHNICAL_HICCUP.to_string()
        }
    }
}

/// Names the company managing one of the confirmed client's contracts.
pub(crate) async fn get_contract_company_info(
    ctx: &ToolContext,
    session: &mut CallSession,
    reference: &str,
) -> String {
    let Some(client) = session.confirmed() else {
        return CONTRACTS_REFUSAL.to_string();
    };

    let contract = match owned_contract(ctx, client.id, reference).await {
        Ok(Some(contract)) => contract,
        Ok(None) => return not_in_file(reference),
        Err(e) => {
            tracing::error!("contract company lookup failed: {e}");
            return TECHNICAL_HICCUP.to_string();
        }
    };

    let company_id = contract.company_id;
    let company = ctx
        .with_conn(move |conn| aria_directory::get_company(conn, company_id))
        .await;

    match company {
        Ok(Some(company)) => {
            let phone = match &company.phone_number {
                Some(number) => format!(" Vous pouvez les joindre au {number}."),
                None => String::new(),
            };
            format!(
                "Le contrat {} est géré par {}.{}",
                contract.reference, company.name, phone
            )
        }
        Ok(None) => {
            tracing::warn!(company_id, "contract references an unknown company");
            format!(
                "Je n'ai pas retrouvé la compagnie gestionnaire du contrat {}.",
                contract.reference
            )
        }
        Err(e) => {
            tracing::error!(company_id, "company lookup failed: {e}");
            TECHNICAL_HICCUP.to_string()
        }
    }
}

/// Describes the formula backing one of the confirmed client's contracts.
pub(crate) async fn get_contract_formula_details(
    ctx: &ToolContext,
    session: &mut CallSession,
    reference: &str,
) -> String {
    let Some(client) = session.confirmed() else {
        return CONTRACTS_REFUSAL.to_string();
    };

    let contract = match owned_contract(ctx, client.id, reference).await {
        Ok(Some(contract)) => contract,
        Ok(None) => return not_in_file(reference),
        Err(e) => {
            tracing::error!("contract formula lookup failed: {e}");
            return TECHNICAL_HICCUP.to_string();
        }
    };

    let formula_id = contract.formula_id;
    let formula = ctx
        .with_conn(move |conn| aria_directory::get_formula(conn, formula_id))
        .await;

    match formula {
        Ok(Some(formula)) => {
            let description = formula
                .description
                .as_deref()
                .unwrap_or("pas de description enregistrée");
            format!(
                "Le contrat {} est basé sur la formule '{}' : {} Tarif mensuel de base : {}.",
                contract.reference,
                formula.name,
                description,
                formula.monthly_price_display()
            )
        }
        Ok(None) => {
            tracing::warn!(formula_id, "contract references an unknown formula");
            format!(
                "Je n'ai pas retrouvé la formule du contrat {}.",
                contract.reference
            )
        }
        Err(e) => {
            tracing::error!(formula_id, "formula lookup failed: {e}");
            TECHNICAL_HICCUP.to_string()
        }
    }
}
