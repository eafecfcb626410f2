//! Facade-level tests: the command surface wired over the in-memory store
//! with stubbed external capabilities.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use eligo_ledger::RedeemOutcome;
use eligo_service::{App, CheckInReply, RegisterReply, ServiceConfig, ServiceError};
use eligo_store_memory::MemoryStore;
use eligo_types::{ServiceType, Timestamp, UserId};
use eligo_verification::{
    AttemptOutcome, QueryError, RemoteStatus, StatusBackend, Submission, Verifier, VerifierError,
};

const ADMIN: UserId = UserId::new(1_000);

/// Status backend that always reports an open review.
struct IdleBackend;

#[async_trait]
impl StatusBackend for IdleBackend {
    async fn fetch(&self, _external_id: &str) -> Result<RemoteStatus, QueryError> {
        Ok(RemoteStatus::Pending)
    }
}

/// Verifier that accepts any well-formed link and completes immediately.
struct InstantVerifier;

#[async_trait]
impl Verifier for InstantVerifier {
    fn parse_verification_id(&self, url: &str) -> Option<String> {
        url.split("verificationId=")
            .nth(1)
            .map(str::to_string)
            .filter(|id| !id.is_empty())
    }

    async fn verify(&self, verification_id: &str) -> Result<Submission, VerifierError> {
        Ok(Submission::Complete {
            reward_code: Some(format!("OK-{verification_id}")),
            redirect_url: None,
        })
    }
}

fn app() -> App {
    let mut verifiers: HashMap<ServiceType, Arc<dyn Verifier>> = HashMap::new();
    for service in ServiceType::ALL {
        verifiers.insert(service, Arc::new(InstantVerifier));
    }
    App::new(
        ServiceConfig::with_admin(ADMIN.as_i64()),
        Arc::new(MemoryStore::new()),
        verifiers,
        Arc::new(IdleBackend),
    )
    .unwrap()
}

fn register(app: &App, id: i64) -> UserId {
    let user = UserId::new(id);
    assert_eq!(
        app.start(user, &format!("u{id}"), &format!("User {id}"), None)
            .unwrap(),
        RegisterReply::Created { invited: false }
    );
    user
}

// ---------------------------------------------------------------------------
// Registration and membership gates
// ---------------------------------------------------------------------------

#[test]
fn start_registers_once_and_credits_inviter() {
    let app = app();
    let inviter = register(&app, 1);

    let invitee = UserId::new(2);
    let reply = app
        .start(invitee, "bob", "Bob", Some(&inviter.to_string()))
        .unwrap();
    assert_eq!(reply, RegisterReply::Created { invited: true });

    // Registration bonus 1, referral bonus 2.
    assert_eq!(app.balance(inviter).unwrap(), 3);
    assert_eq!(app.balance(invitee).unwrap(), 1);

    assert_eq!(
        app.start(invitee, "bob", "Bob", None).unwrap(),
        RegisterReply::AlreadyRegistered
    );
}

#[test]
fn junk_invite_payload_is_ignored() {
    let app = app();
    let reply = app
        .start(UserId::new(2), "bob", "Bob", Some("not-a-number"))
        .unwrap();
    assert_eq!(reply, RegisterReply::Created { invited: false });

    let reply = app
        .start(UserId::new(3), "eve", "Eve", Some("999999"))
        .unwrap();
    assert_eq!(reply, RegisterReply::Created { invited: false });
}

#[test]
fn member_commands_gate_on_registration_and_block() {
    let app = app();

    assert!(matches!(
        app.balance(UserId::new(9)),
        Err(ServiceError::NotRegistered(_))
    ));

    let user = register(&app, 9);
    app.block(admin_user(&app), user).unwrap();
    assert!(matches!(
        app.balance(user),
        Err(ServiceError::Blocked(_))
    ));
}

/// The admin gate is identity-based, but registering the admin keeps it
/// visible in listings like `broadcast_targets`.
fn admin_user(app: &App) -> UserId {
    let _ = app.start(ADMIN, "admin", "Admin", None);
    ADMIN
}

// ---------------------------------------------------------------------------
// Check-in and redemption
// ---------------------------------------------------------------------------

#[test]
fn check_in_twice_same_day_fails_once() {
    let app = app();
    let user = register(&app, 1);
    let now = Timestamp::new(1_700_000_000);

    let reply = app.check_in(user, now).unwrap();
    assert_eq!(reply, CheckInReply { bonus: 1, balance: 2 });

    let later = Timestamp::new(now.as_secs() + 3_600);
    assert!(matches!(
        app.check_in(user, later),
        Err(ServiceError::AlreadyCheckedIn)
    ));
    assert_eq!(app.balance(user).unwrap(), 2);

    // Tomorrow works again.
    assert!(app.check_in(user, now.plus_days(1)).is_ok());
}

#[test]
fn redeem_reports_outcome_and_fresh_balance() {
    let app = app();
    let admin = admin_user(&app);
    let user = register(&app, 1);

    app.create_code(admin, "wandouyu", 20, 1, None).unwrap();

    let reply = app
        .redeem(user, "wandouyu", Timestamp::now())
        .unwrap();
    assert_eq!(reply.outcome, RedeemOutcome::Credited(20));
    assert_eq!(reply.balance, 21);

    let again = app.redeem(user, "wandouyu", Timestamp::now()).unwrap();
    assert_eq!(again.outcome, RedeemOutcome::AlreadyUsed);
    assert_eq!(again.balance, 21);

    let missing = app.redeem(user, "nope", Timestamp::now()).unwrap();
    assert_eq!(missing.outcome, RedeemOutcome::NotFound);
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

#[test]
fn admin_gate_rejects_everyone_else() {
    let app = app();
    let user = register(&app, 1);

    assert!(matches!(
        app.add_balance(user, user, 10),
        Err(ServiceError::PermissionDenied)
    ));
    assert!(matches!(
        app.block(user, user),
        Err(ServiceError::PermissionDenied)
    ));
    assert!(matches!(
        app.create_code(user, "x", 10, 1, None),
        Err(ServiceError::PermissionDenied)
    ));
    assert!(matches!(
        app.list_codes(user),
        Err(ServiceError::PermissionDenied)
    ));
    assert!(matches!(
        app.broadcast_targets(user),
        Err(ServiceError::PermissionDenied)
    ));
}

#[test]
fn admin_balance_mutations() {
    let app = app();
    let admin = admin_user(&app);
    let user = register(&app, 1);

    assert_eq!(app.add_balance(admin, user, 10).unwrap(), 11);
    assert_eq!(app.deduct_balance(admin, user, 4).unwrap(), 7);

    assert!(matches!(
        app.deduct_balance(admin, user, 100),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert!(matches!(
        app.add_balance(admin, UserId::new(404), 10),
        Err(ServiceError::NotRegistered(_))
    ));
    assert!(matches!(
        app.add_balance(admin, user, 0),
        Err(ServiceError::InvalidArgument(_))
    ));
}

#[test]
fn blacklist_round_trip() {
    let app = app();
    let admin = admin_user(&app);
    let user = register(&app, 1);

    app.block(admin, user).unwrap();
    let listed = app.blacklist(admin).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, user);

    app.unblock(admin, user).unwrap();
    assert!(app.blacklist(admin).unwrap().is_empty());
    assert!(app.balance(user).is_ok());
}

#[test]
fn code_listing_is_capped_at_twenty() {
    let app = app();
    let admin = admin_user(&app);

    for i in 0..25 {
        assert!(app
            .create_code(admin, &format!("code{i}"), 10, 1, None)
            .unwrap());
    }
    let listed = app.list_codes(admin).unwrap();
    assert_eq!(listed.len(), 20);
    // Newest first.
    assert_eq!(listed[0].code, "code24");
}

#[test]
fn broadcast_targets_cover_every_registered_user() {
    let app = app();
    let admin = admin_user(&app);
    for i in 1..=5 {
        register(&app, i);
    }

    let targets = app.broadcast_targets(admin).unwrap();
    assert_eq!(targets.len(), 6); // five users + the registered admin
}

// ---------------------------------------------------------------------------
// Verification through the facade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verify_and_check_status_flow() {
    let app = app();
    let admin = admin_user(&app);
    let user = register(&app, 1);
    app.add_balance(admin, user, 4).unwrap(); // 1 + 4 = cost

    let outcome = app
        .verify(
            user,
            ServiceType::GeminiOnePro,
            "https://services.sheerid.com/verify/p/?verificationId=vid7",
        )
        .await
        .unwrap();
    match outcome {
        AttemptOutcome::Completed { reward_code, .. } => {
            assert_eq!(reward_code.as_deref(), Some("OK-vid7"));
        }
        other => panic!("expected Completed, got {other:?}"),
    }
    assert_eq!(app.balance(user).unwrap(), 0);

    let history = app.history(user, 10).unwrap();
    assert_eq!(history.len(), 1);

    // On-demand queries require membership but cost nothing.
    assert!(app.check_status(user, "vid7").await.is_ok());
    assert!(matches!(
        app.check_status(UserId::new(404), "vid7").await,
        Err(ServiceError::NotRegistered(_))
    ));
}
