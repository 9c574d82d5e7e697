//! End-to-end tests of the tool layer: identification flow, gating,
//! enrichment, degradation of best-effort side actions, and audit trail.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use aria_db::{create_pool, DbPool, DbRuntimeSettings};
use aria_notify::{CalendarEvent, CalendarTransport, MailTransport, Notifier, NotifyError};
use aria_session::CallSession;
use aria_tools::{dispatch, ToolContext};
use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Default)]
struct RecordingMailer {
    fail: AtomicBool,
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected(500));
        }
        self.sent.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingCalendar {
    fail: AtomicBool,
    events: Mutex<Vec<CalendarEvent>>,
}

#[async_trait]
impl CalendarTransport for RecordingCalendar {
    async fn create_event(&self, event: &CalendarEvent) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected(502));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct Harness {
    pool: DbPool,
    ctx: ToolContext,
    session: Arc<tokio::sync::Mutex<CallSession>>,
    journal_id: i64,
    mailer: Arc<RecordingMailer>,
    calendar: Arc<RecordingCalendar>,
    _db_file: tempfile::NamedTempFile,
}

fn harness() -> Harness {
    let db_file = tempfile::NamedTempFile::new().expect("create temp db");
    let pool = create_pool(
        db_file.path().to_str().expect("temp path is utf-8"),
        DbRuntimeSettings::default(),
    )
    .expect("create pool");

    let journal_id = {
        let conn = pool.get().expect("get connection");
        aria_db::run_migrations(&conn).expect("run migrations");
        conn.execute_batch(
            "INSERT INTO clients (id, first_name, last_name, email, phone, city) VALUES
                (1, 'Jean', 'Dupont', 'jean.dupont@email.com', '0123456789', 'Paris'),
                (2, 'Marie', 'Durand', 'marie.durand@email.com', '0987654321', 'Lyon');
             INSERT INTO companies (id, name, phone_number) VALUES
                (1, 'Assurance Alpha', '111-222-3333'),
                (2, 'Garantie Gamma', '444-555-6666');
             INSERT INTO formulas (id, name, description, monthly_price_cents) VALUES
                (1, 'Formule Essentielle', 'Couverture de base.', 2999),
                (2, 'Formule Pro', 'Couverture complète pour les professionnels.', 7999);
             INSERT INTO contracts (id, client_id, reference, status, company_id, formula_id, start_date) VALUES
                (101, 1, 'CONTRAT-A', 'Actif', 1, 1, '2022-01-01'),
                (102, 2, 'CONTRAT-B', 'Actif', 2, 2, '2023-06-15');
             INSERT INTO employees (id, first_name, last_name, function, is_active) VALUES
                ('emp-1', 'Alice', 'Martin', 'Support', 1);
             INSERT INTO client_events (id, client_id, comment, for_date, is_completed) VALUES
                (1001, 1, 'Premier contact', '2023-01-15T10:00:00', 1);
             INSERT INTO advisory_duties (id, client_id, client_situation, budget, need1) VALUES
                (1, 1, 'Recherche une assurance santé.', '50€/mois', 'Soins dentaires');",
        )
        .expect("seed fixtures");
        aria_observe::open_call(&conn, "room-test", None).expect("open call journal")
    };

    let mailer = Arc::new(RecordingMailer::default());
    let calendar = Arc::new(RecordingCalendar::default());
    let notifier = Notifier::new(mailer.clone(), "backoffice@artex-business.com");
    let ctx = ToolContext::new(pool.clone(), notifier, calendar.clone());

    let mut session = CallSession::new("room-test");
    session.set_journal_id(journal_id);

    Harness {
        pool,
        ctx,
        session: Arc::new(tokio::sync::Mutex::new(session)),
        journal_id,
        mailer,
        calendar,
        _db_file: db_file,
    }
}

impl Harness {
    async fn call(&self, name: &str, args: Value) -> String {
        dispatch(&self.ctx, &self.session, name, &args).await
    }

    /// Runs the canonical identification flow for Jean Dupont.
    async fn identify_jean(&self) -> String {
        self.call(
            "lookup_client_by_email",
            json!({"email": "jean.dupont@email.com"}),
        )
        .await;
        self.call("confirm_identity", json!({"confirmation": true}))
            .await
    }

    fn add_upcoming_appointment(&self, comment: &str, for_date: &str) {
        let conn = self.pool.get().expect("get connection");
        conn.execute(
            "INSERT INTO client_events (client_id, comment, for_date, is_completed)
             VALUES (1, ?1, ?2, 0)",
            rusqlite::params![comment, for_date],
        )
        .expect("insert appointment");
    }

    async fn confirmed_id(&self) -> Option<i64> {
        self.session.lock().await.confirmed().map(|c| c.id)
    }

    async fn pending_id(&self) -> Option<i64> {
        self.session.lock().await.pending().map(|c| c.id)
    }
}

#[tokio::test]
async fn lookup_by_email_sets_unconfirmed_candidate() {
    let h = harness();

    let response = h
        .call(
            "lookup_client_by_email",
            json!({"email": "jean.dupont@email.com"}),
        )
        .await;

    assert!(response.contains("J'ai trouvé un dossier pour Jean Dupont"));
    assert_eq!(h.pending_id().await, Some(1));
    assert_eq!(h.confirmed_id().await, None, "a lookup never confirms");
}

#[tokio::test]
async fn lookup_by_email_not_found_clears_candidate() {
    let h = harness();
    h.call(
        "lookup_client_by_email",
        json!({"email": "jean.dupont@email.com"}),
    )
    .await;

    let response = h
        .call(
            "lookup_client_by_email",
            json!({"email": "nonexistent@email.com"}),
        )
        .await;

    assert!(response.contains("aucun client correspondant"));
    assert_eq!(h.pending_id().await, None);
}

#[tokio::test]
async fn lookup_input_is_trimmed() {
    let h = harness();
    let response = h
        .call(
            "lookup_client_by_email",
            json!({"email": "  jean.dupont@email.com  "}),
        )
        .await;
    assert!(response.contains("Jean Dupont"));
}

#[tokio::test]
async fn ambiguous_lookup_asks_for_email_and_adopts_nobody() {
    let h = harness();
    {
        let conn = h.pool.get().expect("get connection");
        conn.execute(
            "INSERT INTO clients (first_name, last_name, email) VALUES ('Jean', 'Dupont', 'autre.jean@email.com')",
            [],
        )
        .expect("insert homonym");
    }

    let response = h
        .call(
            "lookup_client_by_fullname",
            json!({"last_name": "Dupont", "first_name": "Jean"}),
        )
        .await;

    assert!(response.contains("plusieurs clients"));
    assert!(response.contains("adresse e-mail"));
    assert_eq!(h.pending_id().await, None);
    assert_eq!(h.confirmed_id().await, None);
}

#[tokio::test]
async fn confirm_identity_success_without_proactive_message() {
    let h = harness();
    let response = h.identify_jean().await;

    assert!(response.contains("Identité confirmée"));
    assert!(
        !response.contains("rendez-vous à venir"),
        "no enrichment without upcoming appointments"
    );
    assert_eq!(h.confirmed_id().await, Some(1));
    assert_eq!(h.pending_id().await, None);

    // The confirmed client is recorded on the call journal.
    let conn = h.pool.get().expect("get connection");
    let call = aria_observe::get_call(&conn, h.journal_id)
        .expect("get_call")
        .expect("journal row exists");
    assert_eq!(call.client_id, Some(1));
}

#[tokio::test]
async fn confirm_identity_success_with_proactive_check() {
    let h = harness();
    h.add_upcoming_appointment("Rappel pour discuter du contrat", "2099-01-10T14:30:00");

    let response = h.identify_jean().await;

    assert!(response.contains("Identité confirmée"));
    assert!(response.contains("je vois que vous avez des rendez-vous à venir"));
    assert!(response.contains("Rappel pour discuter du contrat"));
    assert!(response.contains("10/01/2099 à 14:30"));
    assert_eq!(h.confirmed_id().await, Some(1));
    assert_eq!(h.pending_id().await, None);
}

#[tokio::test]
async fn enrichment_lists_appointments_in_ascending_order() {
    let h = harness();
    h.add_upcoming_appointment("Point annuel", "2099-06-01T10:00:00");
    h.add_upcoming_appointment("Rappel contrat", "2099-01-10T14:30:00");

    let response = h.identify_jean().await;

    let first = response.find("Rappel contrat").expect("first appointment");
    let second = response.find("Point annuel").expect("second appointment");
    assert!(first < second, "appointments must be ascending by date");
}

#[tokio::test]
async fn confirm_identity_denied_drops_candidate() {
    let h = harness();
    h.call(
        "lookup_client_by_email",
        json!({"email": "jean.dupont@email.com"}),
    )
    .await;

    let response = h
        .call("confirm_identity", json!({"confirmation": false}))
        .await;

    assert!(response.contains("n'accéderai pas à ce dossier"));
    assert_eq!(h.confirmed_id().await, None);
    assert_eq!(h.pending_id().await, None);
}

#[tokio::test]
async fn confirm_without_lookup_returns_guidance() {
    let h = harness();
    let response = h
        .call("confirm_identity", json!({"confirmation": true}))
        .await;

    assert!(response.contains("rechercher un client avant de confirmer"));
    assert_eq!(h.confirmed_id().await, None);
}

#[tokio::test]
async fn client_details_require_confirmation() {
    let h = harness();

    let refused = h.call("get_client_details", json!({})).await;
    assert!(refused.contains("Aucun client n'est actuellement sélectionné"));

    h.identify_jean().await;
    let details = h.call("get_client_details", json!({})).await;
    assert!(details.contains("Détails pour Jean Dupont"));
    assert!(details.contains("jean.dupont@email.com"));
}

#[tokio::test]
async fn pending_candidate_opens_nothing() {
    let h = harness();
    h.call(
        "lookup_client_by_email",
        json!({"email": "jean.dupont@email.com"}),
    )
    .await;

    // Candidate found but not confirmed: still refused.
    let refused = h.call("get_client_details", json!({})).await;
    assert!(refused.contains("Aucun client n'est actuellement sélectionné"));
}

#[tokio::test]
async fn contact_update_refreshes_confirmed_context() {
    let h = harness();
    h.identify_jean().await;

    let response = h
        .call(
            "update_contact_information",
            json!({"city": "Marseille", "phone": "0711111111"}),
        )
        .await;
    assert!(response.contains("mises à jour avec succès"));

    // A subsequent read within the same call sees the fresh record.
    let details = h.call("get_client_details", json!({})).await;
    assert!(details.contains("Marseille"));
    assert!(details.contains("0711111111"));
}

#[tokio::test]
async fn contact_update_requires_confirmation() {
    let h = harness();
    let response = h
        .call("update_contact_information", json!({"city": "Marseille"}))
        .await;
    assert!(response.contains("Action impossible"));
}

#[tokio::test]
async fn empty_contact_update_reports_no_change() {
    let h = harness();
    h.identify_jean().await;

    let response = h.call("update_contact_information", json!({})).await;
    assert!(response.contains("aucune information n'a été modifiée"));
}

#[tokio::test]
async fn contracts_list_for_confirmed_client() {
    let h = harness();

    let refused = h.call("list_client_contracts", json!({})).await;
    assert!(refused.contains("confirmer l'identité"));

    h.identify_jean().await;
    let response = h.call("list_client_contracts", json!({})).await;
    assert!(response.contains("Voici les contrats pour Jean Dupont"));
    assert!(response.contains("CONTRAT-A"));
}

#[tokio::test]
async fn contract_details_resolve_own_contract() {
    let h = harness();
    h.identify_jean().await;

    let response = h
        .call(
            "get_contract_details",
            json!({"contract_reference": "CONTRAT-A"}),
        )
        .await;
    assert!(response.contains("Détails du contrat CONTRAT-A"));
    assert!(response.contains("Actif"));
}

#[tokio::test]
async fn someone_elses_contract_is_invisible() {
    let h = harness();
    h.identify_jean().await;

    // CONTRAT-B belongs to Marie Durand; Jean's session must not see it.
    let response = h
        .call(
            "get_contract_details",
            json!({"contract_reference": "CONTRAT-B"}),
        )
        .await;
    assert!(response.contains("Je n'ai pas trouvé de contrat CONTRAT-B"));

    let company = h
        .call(
            "get_contract_company_info",
            json!({"contract_reference": "CONTRAT-B"}),
        )
        .await;
    assert!(company.contains("Je n'ai pas trouvé de contrat CONTRAT-B"));
}

#[tokio::test]
async fn contract_company_and_formula_details() {
    let h = harness();
    h.identify_jean().await;

    let company = h
        .call(
            "get_contract_company_info",
            json!({"contract_reference": "CONTRAT-A"}),
        )
        .await;
    assert!(company.contains("géré par Assurance Alpha"));

    let formula = h
        .call(
            "get_contract_formula_details",
            json!({"contract_reference": "CONTRAT-A"}),
        )
        .await;
    assert!(formula.contains("basé sur la formule 'Formule Essentielle'"));
    assert!(formula.contains("29,99 €"));
}

#[tokio::test]
async fn interaction_history_reads_back() {
    let h = harness();
    h.identify_jean().await;

    let response = h.call("get_client_interaction_history", json!({})).await;
    assert!(response.contains("Voici un résumé des dernières interactions"));
    assert!(response.contains("Premier contact"));
}

#[tokio::test]
async fn upcoming_appointments_tool_matches_enrichment_data() {
    let h = harness();
    h.add_upcoming_appointment("Rendez-vous bilan", "2099-03-01T09:00:00");
    h.identify_jean().await;

    let response = h.call("check_upcoming_appointments", json!({})).await;
    assert!(response.contains("rendez-vous à venir"));
    assert!(response.contains("Rendez-vous bilan"));
}

#[tokio::test]
async fn advisory_duty_summary() {
    let h = harness();
    h.identify_jean().await;

    let response = h.call("summarize_advisory_duty", json!({})).await;
    assert!(response.contains("Pour vous rassurer sur le choix de votre contrat"));
    assert!(response.contains("Soins dentaires"));
}

#[tokio::test]
async fn escalation_lookup_bypasses_the_gate() {
    let h = harness();

    // No lookup, no confirmation: escalation still works.
    let response = h
        .call("find_employee_for_escalation", json!({"function": "Support"}))
        .await;
    assert!(response.contains("J'ai trouvé Alice Martin (Support)"));
}

#[tokio::test]
async fn confirmation_email_success() {
    let h = harness();
    h.identify_jean().await;

    let response = h
        .call(
            "send_confirmation_email",
            json!({"subject": "Votre demande", "body": "Voici le récapitulatif."}),
        )
        .await;
    assert!(response.contains("jean.dupont@email.com"));

    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "jean.dupont@email.com");
    assert!(sent[0].2.contains("Bonjour Jean Dupont"));
}

#[tokio::test]
async fn confirmation_email_failure_degrades_to_callback_offer() {
    let h = harness();
    h.identify_jean().await;
    h.mailer.fail.store(true, Ordering::SeqCst);

    let response = h
        .call(
            "send_confirmation_email",
            json!({"subject": "Test", "body": "Test"}),
        )
        .await;

    assert!(response.contains("erreur technique majeure"));
    assert!(response.contains("planifie un rappel"));
    // The failure never disturbs identity state.
    assert_eq!(h.confirmed_id().await, Some(1));
}

#[tokio::test]
async fn confirmation_email_requires_confirmed_identity() {
    let h = harness();
    let response = h
        .call(
            "send_confirmation_email",
            json!({"subject": "Test", "body": "Test"}),
        )
        .await;
    assert!(response.contains("Action impossible"));
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn callback_scheduling_creates_a_slot() {
    let h = harness();
    h.identify_jean().await;

    let response = h
        .call(
            "schedule_callback",
            json!({"reason": "Question sur un remboursement", "datetime_str": "2025-12-25T14:30:00"}),
        )
        .await;
    assert!(response.contains("25/12/2025 à 14:30"));

    let events = h.calendar.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].summary.contains("Jean Dupont"));
    assert_eq!(
        (events[0].end - events[0].start).num_minutes(),
        30,
        "callback slots are half an hour"
    );
}

#[tokio::test]
async fn callback_rejects_invalid_datetime() {
    let h = harness();
    h.identify_jean().await;

    let response = h
        .call(
            "schedule_callback",
            json!({"reason": "Question", "datetime_str": "demain à 14h"}),
        )
        .await;
    assert!(response.contains("format de la date est invalide"));
    assert!(h.calendar.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn callback_degrades_when_calendar_is_down() {
    let h = harness();
    h.identify_jean().await;
    h.calendar.fail.store(true, Ordering::SeqCst);

    let response = h
        .call(
            "schedule_callback",
            json!({"reason": "Question", "datetime_str": "2025-12-25T14:30:00"}),
        )
        .await;
    assert!(response.contains("service d'agenda"));
    assert_eq!(h.confirmed_id().await, Some(1));
}

#[tokio::test]
async fn feedback_is_recorded_and_range_checked() {
    let h = harness();

    let response = h
        .call(
            "record_call_feedback",
            json!({"note": 5, "comment": "Très efficace"}),
        )
        .await;
    assert!(response.contains("Merci beaucoup pour votre retour"));

    let out_of_range = h.call("record_call_feedback", json!({"note": 9})).await;
    assert!(out_of_range.contains("entre 1 et 5"));

    let conn = h.pool.get().expect("get connection");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM call_feedback", [], |row| row.get(0))
        .expect("count feedback");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn clear_context_resets_everything_idempotently() {
    let h = harness();
    h.identify_jean().await;
    assert_eq!(h.confirmed_id().await, Some(1));

    let response = h.call("clear_context", json!({})).await;
    assert!(response.contains("contexte a été réinitialisé"));
    assert_eq!(h.confirmed_id().await, None);
    assert_eq!(h.pending_id().await, None);

    // Clearing an already-empty context is fine.
    let again = h.call("clear_context", json!({})).await;
    assert!(again.contains("contexte a été réinitialisé"));
    assert_eq!(h.confirmed_id().await, None);
}

#[tokio::test]
async fn every_dispatch_is_audited() {
    let h = harness();
    h.call(
        "lookup_client_by_email",
        json!({"email": "jean.dupont@email.com"}),
    )
    .await;

    let conn = h.pool.get().expect("get connection");
    let actions = aria_observe::actions_for_call(&conn, h.journal_id).expect("actions");
    assert_eq!(actions.len(), 2);

    assert_eq!(actions[0].kind, "TOOL_CALL");
    assert_eq!(actions[0].tool_name.as_deref(), Some("lookup_client_by_email"));
    assert!(actions[0]
        .params_json
        .as_deref()
        .expect("params recorded")
        .contains("jean.dupont@email.com"));

    assert_eq!(actions[1].kind, "TOOL_RESULT");
    assert!(actions[1]
        .result
        .as_deref()
        .expect("result recorded")
        .contains("Jean Dupont"));
}

#[tokio::test]
async fn unknown_tool_is_refused_politely() {
    let h = harness();
    let response = h.call("open_the_vault", json!({})).await;
    assert!(response.contains("Je ne dispose pas de l'outil 'open_the_vault'"));
}
