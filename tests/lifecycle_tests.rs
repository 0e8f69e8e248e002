//! Store-level tests for the visit state machine and principal
//! resolution: guarded transitions under concurrency and id collisions
//! across the two account tables.

use tokio::sync::broadcast;
use visitarr::config::{CodesConfig, SecurityConfig};
use visitarr::db::{NewVisit, Store};
use visitarr::domain::{Principal, PrincipalKind, VisitStatus};
use visitarr::services::{
    AuthError, AuthService, SeaOrmAuthService, SeaOrmVisitService, VisitError, VisitService,
};

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("visitarr-lifecycle-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

async fn seed_visit(store: &Store) -> i32 {
    let visit = store
        .create_visit(NewVisit {
            pass_id: format!("VIS-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
            full_name: "Ada Visitor".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            company: None,
            purpose: "Maintenance".to_string(),
            visit_date: "2026-09-01".to_string(),
            host_name: "Harriet Host".to_string(),
            host_email: "harriet@example.com".to_string(),
        })
        .await
        .expect("failed to create visit");
    visit.id
}

#[tokio::test]
async fn transitions_are_guarded_by_current_state() {
    let store = test_store().await;
    let id = seed_visit(&store).await;

    // Pending: check-in and check-out are not reachable.
    assert!(!store.check_in_visit(id).await.unwrap());
    assert!(!store.check_out_visit(id).await.unwrap());

    assert!(store.approve_visit(id, "AAAAAA", "BBBBBB").await.unwrap());
    assert!(!store.approve_visit(id, "CCCCCC", "DDDDDD").await.unwrap());

    // Approved: check-out still requires a prior check-in.
    assert!(!store.check_out_visit(id).await.unwrap());
    assert!(store.check_in_visit(id).await.unwrap());

    // Checked-in: rejection is off the table.
    assert!(!store.reject_visit(id, "too late").await.unwrap());

    assert!(store.check_out_visit(id).await.unwrap());

    // Checked-out is terminal.
    assert!(!store.check_in_visit(id).await.unwrap());
    assert!(!store.check_out_visit(id).await.unwrap());
    assert!(!store.reject_visit(id, "after the fact").await.unwrap());

    let visit = store.get_visit(id).await.unwrap().unwrap();
    assert_eq!(visit.status, VisitStatus::CheckedOut.as_str());
    assert_eq!(visit.entry_code.as_deref(), Some("AAAAAA"));
    assert!(visit.check_in_time.is_some());
    assert!(visit.check_out_time.is_some());
}

#[tokio::test]
async fn reject_works_from_pending_and_approved() {
    let store = test_store().await;

    let pending = seed_visit(&store).await;
    assert!(store.reject_visit(pending, "no meeting").await.unwrap());
    let visit = store.get_visit(pending).await.unwrap().unwrap();
    assert_eq!(visit.status, VisitStatus::Rejected.as_str());
    assert_eq!(visit.host_confirmation_reason.as_deref(), Some("no meeting"));

    let approved = seed_visit(&store).await;
    assert!(store.approve_visit(approved, "AAAAAA", "BBBBBB").await.unwrap());
    assert!(store.reject_visit(approved, "schedule conflict").await.unwrap());
    let visit = store.get_visit(approved).await.unwrap().unwrap();
    assert_eq!(
        visit.host_confirmation_reason.as_deref(),
        Some("schedule conflict")
    );

    // A rejected visit cannot be revived.
    assert!(!store.approve_visit(pending, "EEEEEE", "FFFFFF").await.unwrap());
}

#[tokio::test]
async fn in_memory_database_leaves_no_file_behind() {
    let store = Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open in-memory store");
    assert!(store.ping().await.is_ok());
    assert!(!std::path::Path::new(":memory:").exists());
}

#[tokio::test]
async fn reject_requires_a_nonblank_reason() {
    let store = test_store().await;
    let id = seed_visit(&store).await;

    let (tx, _rx) = broadcast::channel(16);
    let service = SeaOrmVisitService::new(store.clone(), CodesConfig::default(), tx);

    for reason in ["", "   "] {
        let err = service.reject(id, reason, None).await.unwrap_err();
        assert!(matches!(err, VisitError::Validation(_)));
    }

    // A refused rejection leaves the visit untouched.
    let visit = store.get_visit(id).await.unwrap().unwrap();
    assert_eq!(visit.status, VisitStatus::Pending.as_str());
    assert!(visit.host_confirmation_reason.is_none());

    let visit = service
        .reject(id, "no meeting scheduled", None)
        .await
        .unwrap();
    assert_eq!(visit.status, VisitStatus::Rejected.as_str());
    assert_eq!(
        visit.host_confirmation_reason.as_deref(),
        Some("no meeting scheduled")
    );
}

#[tokio::test]
async fn concurrent_check_in_admits_exactly_once() {
    let store = test_store().await;
    let id = seed_visit(&store).await;
    assert!(store.approve_visit(id, "AAAAAA", "BBBBBB").await.unwrap());

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.check_in_visit(id).await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.check_in_visit(id).await })
    };

    let results = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
    assert_eq!(results.iter().filter(|&&won| won).count(), 1);
}

#[tokio::test]
async fn concurrent_approval_issues_a_single_code_pair() {
    let store = test_store().await;
    let id = seed_visit(&store).await;

    let a = {
        let store = store.clone();
        tokio::spawn(async move { store.approve_visit(id, "AAAAAA", "A2A2A2").await })
    };
    let b = {
        let store = store.clone();
        tokio::spawn(async move { store.approve_visit(id, "BBBBBB", "B2B2B2").await })
    };

    let won_a = a.await.unwrap().unwrap();
    let won_b = b.await.unwrap().unwrap();
    assert!(won_a ^ won_b, "exactly one approval must win");

    // The winner's codes must land together; no mixing across callers.
    let visit = store.get_visit(id).await.unwrap().unwrap();
    let codes = (visit.entry_code.as_deref(), visit.exit_code.as_deref());
    if won_a {
        assert_eq!(codes, (Some("AAAAAA"), Some("A2A2A2")));
    } else {
        assert_eq!(codes, (Some("BBBBBB"), Some("B2B2B2")));
    }
}

#[tokio::test]
async fn colliding_ids_resolve_by_session_kind() {
    let store = test_store().await;
    let (bus, _rx) = broadcast::channel(16);
    let auth = SeaOrmAuthService::new(store.clone(), SecurityConfig::default(), bus);

    // Seeded staff occupy ids 1 and 2; the first host also gets id 1.
    let host = store
        .create_host(
            "harriet",
            "harriet@example.com",
            "Harriet Host",
            None,
            None,
            "host-password-1",
            None,
        )
        .await
        .unwrap();
    assert_eq!(host.id, 1);
    store.set_host_approval(host.id, true).await.unwrap();

    // An explicit kind is authoritative.
    let resolved = auth.resolve_principal(1, Some("host")).await.unwrap();
    assert!(matches!(resolved.principal, Principal::Host(_)));
    assert_eq!(resolved.principal.username(), "harriet");
    assert!(resolved.healed_kind.is_none());

    let resolved = auth.resolve_principal(1, Some("admin")).await.unwrap();
    assert!(matches!(resolved.principal, Principal::Staff(_)));
    assert_eq!(resolved.principal.username(), "admin");

    // A kind-less session probes staff first and reports the kind back.
    let resolved = auth.resolve_principal(1, None).await.unwrap();
    assert_eq!(resolved.principal.username(), "admin");
    assert_eq!(resolved.healed_kind, Some(PrincipalKind::Admin));

    // A host id with no staff counterpart heals to host. Seeded staff
    // stop at id 2, so the third host id is host-only.
    for (username, email) in [("second", "second@example.com"), ("third", "third@example.com")] {
        let created = store
            .create_host(username, email, username, None, None, "host-password-1", None)
            .await
            .unwrap();
        store.set_host_approval(created.id, true).await.unwrap();
    }
    assert!(store.get_user(3).await.unwrap().is_none());
    let resolved = auth.resolve_principal(3, None).await.unwrap();
    assert_eq!(resolved.principal.username(), "third");
    assert_eq!(resolved.healed_kind, Some(PrincipalKind::Host));

    // An unknown kind string never falls back to probing.
    let err = auth.resolve_principal(1, Some("visitor")).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound));
}

#[tokio::test]
async fn unapproved_host_cannot_resolve_or_log_in() {
    let store = test_store().await;
    let (bus, _rx) = broadcast::channel(16);
    let auth = SeaOrmAuthService::new(store.clone(), SecurityConfig::default(), bus);

    let host = store
        .create_host(
            "pending",
            "pending@example.com",
            "Pending Host",
            None,
            None,
            "host-password-1",
            None,
        )
        .await
        .unwrap();

    let err = auth
        .login(Some(PrincipalKind::Host), "pending", "host-password-1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Inactive));

    let err = auth
        .resolve_principal(host.id, Some("host"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Inactive));

    store.set_host_approval(host.id, true).await.unwrap();
    let principal = auth
        .login(Some(PrincipalKind::Host), "pending", "host-password-1")
        .await
        .unwrap();
    assert_eq!(principal.kind(), PrincipalKind::Host);
}

#[tokio::test]
async fn login_prefers_staff_on_username_collision() {
    let store = test_store().await;
    let (bus, _rx) = broadcast::channel(16);
    let auth = SeaOrmAuthService::new(store.clone(), SecurityConfig::default(), bus);

    // A host registered under the same username as seeded staff.
    let host = store
        .create_host(
            "admin",
            "admin-host@example.com",
            "Admin Impersonator",
            None,
            None,
            "host-password-1",
            None,
        )
        .await
        .unwrap();
    store.set_host_approval(host.id, true).await.unwrap();

    // Without a kind, staff wins.
    let principal = auth.login(None, "admin", "admin123").await.unwrap();
    assert!(matches!(principal, Principal::Staff(_)));

    // The staff password does not unlock the host account.
    let err = auth
        .login(Some(PrincipalKind::Host), "admin", "admin123")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // An explicit host kind reaches the host account with its own password.
    let principal = auth
        .login(Some(PrincipalKind::Host), "admin", "host-password-1")
        .await
        .unwrap();
    assert!(matches!(principal, Principal::Host(_)));

    // And the host password falls through to the host table when no kind
    // is given, since the staff probe rejects it.
    let principal = auth.login(None, "admin", "host-password-1").await.unwrap();
    assert!(matches!(principal, Principal::Host(_)));
}
