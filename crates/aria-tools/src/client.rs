//! Gated tools over the confirmed client's own file: detail retrieval
//! and contact updates.

use aria_directory::ContactUpdate;
use aria_session::CallSession;

use crate::context::ToolContext;

pub(crate) const DETAILS_REFUSAL: &str = "Aucun client n'est actuellement sélectionné et \
     confirmé. Veuillez d'abord rechercher et confirmer l'identité d'un client.";

pub(crate) const UPDATE_REFUSAL: &str = "Action impossible. L'identité du client doit être \
     confirmée avant de pouvoir modifier des informations.";

fn unspecified(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("non renseigné")
}

/// Reads the personal details of the confirmed client.
pub(crate) async fn get_client_details(session: &mut CallSession) -> String {
    let Some(client) = session.confirmed() else {
        return DETAILS_REFUSAL.to_string();
    };

    format!(
        "Détails pour {} (ID : {}) : e-mail : {}, téléphone : {}, adresse : {}, {} {}.",
        client.full_name(),
        client.id,
        unspecified(&client.email),
        unspecified(&client.phone),
        unspecified(&client.address),
        unspecified(&client.postal_code),
        unspecified(&client.city),
    )
}

/// Updates the confirmed client's contact fields, then refreshes the
/// confirmed context from the database so later reads in this call see
/// the new values.
pub(crate) async fn update_contact_information(
    ctx: &ToolContext,
    session: &mut CallSession,
    update: ContactUpdate,
) -> String {
    let Some(client) = session.confirmed() else {
        return UPDATE_REFUSAL.to_string();
    };
    // The id comes from the confirmed context, never from caller input.
    let client_id = client.id;

    let updated = ctx
        .with_conn(move |conn| {
            let changed = aria_directory::update_client_contact(conn, client_id, &update)?;
            if !changed {
                return Ok(None);
            }
            aria_directory::get_client(conn, client_id)
        })
        .await;

    match updated {
        Ok(Some(fresh)) => {
            if !session.refresh_confirmed(fresh) {
                tracing::warn!(client_id, "confirmed context refresh was rejected");
            }
            "Les informations de contact ont été mises à jour avec succès.".to_string()
        }
        Ok(None) => "Une erreur s'est produite lors de la mise à jour des informations, \
             ou aucune information n'a été modifiée."
            .to_string(),
        Err(e) => {
            tracing::error!(client_id, "contact update failed: {e}");
            "Une erreur s'est produite lors de la mise à jour des informations, \
             ou aucune information n'a été modifiée."
                .to_string()
        }
    }
}
