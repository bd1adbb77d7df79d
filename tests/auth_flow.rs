use linkchat::auth::AuthManager;
use tempfile::tempdir;

#[tokio::test]
async fn register_creates_user_and_session() {
    let dir = tempdir().unwrap();
    let auth = AuthManager::new(dir.path()).await.unwrap();

    let (user, session) = auth
        .register("alice".into(), "pw1".into(), "alice-link".into())
        .await
        .unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.profile_link, "alice-link");

    // The session opened at registration is immediately valid
    let me = auth.validate_session(&session.token).await.unwrap();
    assert_eq!(me.id, user.id);
    assert_eq!(me.profile_link, "alice-link");
}

#[tokio::test]
async fn login_failure_is_generic() {
    let dir = tempdir().unwrap();
    let auth = AuthManager::new(dir.path()).await.unwrap();

    auth.register("alice".into(), "pw1".into(), "alice-link".into())
        .await
        .unwrap();

    let ok = auth.login("alice", "pw1").await.unwrap();
    let (user, _session) = ok.expect("correct credentials should log in");
    assert_eq!(user.profile_link, "alice-link");

    // Wrong password and unknown user are indistinguishable to the caller
    assert!(auth.login("alice", "wrong").await.unwrap().is_none());
    assert!(auth.login("nobody", "pw1").await.unwrap().is_none());
}

#[tokio::test]
async fn sessions_survive_a_manager_restart() {
    let dir = tempdir().unwrap();

    let token = {
        let auth = AuthManager::new(dir.path()).await.unwrap();
        let (_, session) = auth
            .register("alice".into(), "pw1".into(), "alice-link".into())
            .await
            .unwrap();
        session.token
    };

    // Fresh manager, empty cache: validation falls through to the database
    let auth = AuthManager::new(dir.path()).await.unwrap();
    let me = auth.validate_session(&token).await.unwrap();
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn logout_invalidates_session() {
    let dir = tempdir().unwrap();
    let auth = AuthManager::new(dir.path()).await.unwrap();

    let (_, session) = auth
        .register("alice".into(), "pw1".into(), "alice-link".into())
        .await
        .unwrap();

    auth.logout(&session.token).await.unwrap();
    assert!(auth.validate_session(&session.token).await.is_err());
}

#[tokio::test]
async fn find_by_link_resolves_profiles() {
    let dir = tempdir().unwrap();
    let auth = AuthManager::new(dir.path()).await.unwrap();

    let (alice, _) = auth
        .register("alice".into(), "pw1".into(), "alice-link".into())
        .await
        .unwrap();

    let resolved = auth.find_by_link("alice-link").await.unwrap().unwrap();
    assert_eq!(resolved.id, alice.id);
    assert_eq!(resolved.username, "alice");

    assert!(auth.find_by_link("no-such-link").await.unwrap().is_none());
}
