#![allow(clippy::unwrap_used)]

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::{net::TcpListener, time::Duration};
use syncflow::auth::{
    session::{AUTH_TOKEN_KEY, USER_KEY},
    ApiConfig, AuthClient, AuthError, AuthFlow, AuthMode, Credentials, FileStorage,
    MemoryStorage, SessionStore, SignupRequest, Storage, User,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn config(server: &MockServer) -> ApiConfig {
    ApiConfig::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new(
        "ada@example.com",
        SecretString::from("analytical".to_string()),
    )
}

fn signup_request() -> SignupRequest {
    SignupRequest {
        email: "ada@example.com".to_string(),
        password: SecretString::from("analytical".to_string()),
        password_confirm: SecretString::from("analytical".to_string()),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

fn stored_user() -> User {
    User {
        id: "1".to_string(),
        email: "old@example.com".to_string(),
        name: "Old User".to_string(),
    }
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "analytical"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "jwt-access",
            "refresh": "jwt-refresh",
            "user": { "id": 7, "email": "ada@example.com", "name": "Ada Lovelace" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_persists_token_and_user() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_ok(&server).await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    assert!(!client.is_authenticated());

    client.login(&credentials()).await?;

    assert!(client.is_authenticated());
    let session = client.session();
    assert_eq!(session.token().unwrap().expose_secret(), "jwt-access");
    assert_eq!(session.user().unwrap().id, "7");
    assert_eq!(session.user().unwrap().name, "Ada Lovelace");

    let storage = client.store().storage();
    assert_eq!(
        storage.get_item(AUTH_TOKEN_KEY)?,
        Some("jwt-access".to_string())
    );
    let user: User = serde_json::from_str(&storage.get_item(USER_KEY)?.unwrap())?;
    assert_eq!(user.email, "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn failed_login_keeps_previous_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let mut store = SessionStore::new(MemoryStorage::new());
    store.set(&SecretString::from("old-token".to_string()), &stored_user())?;

    let mut client = AuthClient::new(config(&server), store.into_storage())?;
    let err = client.login(&credentials()).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );

    assert!(client.is_authenticated());
    assert_eq!(
        client.session().token().unwrap().expose_secret(),
        "old-token"
    );
    assert_eq!(client.session().user(), Some(&stored_user()));
    assert_eq!(
        client.store().storage().get_item(AUTH_TOKEN_KEY)?,
        Some("old-token".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn login_error_without_message_uses_generic_text() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let err = client.login(&credentials()).await.unwrap_err();

    assert_eq!(err.user_message(), "Login failed");
    assert!(!client.is_authenticated());
    assert!(client.store().storage().is_empty());
    Ok(())
}

#[tokio::test]
async fn login_with_unexpected_shape_is_parse_error() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "x" })))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let err = client.login(&credentials()).await.unwrap_err();

    assert!(matches!(err, AuthError::Parse(_)));
    assert!(!client.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn invalid_input_never_reaches_the_network() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;

    let bad_login = Credentials::new("not-an-email", SecretString::from("x".to_string()));
    assert!(matches!(
        client.login(&bad_login).await,
        Err(AuthError::Validation(_))
    ));

    let mut bad_signup = signup_request();
    bad_signup.password_confirm = SecretString::from("mismatch!".to_string());
    assert!(matches!(
        client.signup(&bad_signup).await,
        Err(AuthError::Validation(_))
    ));

    assert!(matches!(
        client.forgot_password("").await,
        Err(AuthError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn logout_clears_memory_and_storage() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_ok(&server).await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    client.login(&credentials()).await?;
    assert!(client.is_authenticated());

    client.logout()?;

    assert!(!client.is_authenticated());
    assert!(client.session().user().is_none());
    assert_eq!(client.store().storage().get_item(AUTH_TOKEN_KEY)?, None);
    assert_eq!(client.store().storage().get_item(USER_KEY)?, None);

    // logging out twice is harmless
    client.logout()?;
    assert!(!client.is_authenticated());
    Ok(())
}

#[test]
fn corrupt_session_file_logs_out_cleanly() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"auth_token":"tok","user":5}"#)?;

    let config = ApiConfig::new("http://127.0.0.1:9/api/", Duration::from_secs(1))?;
    let mut client = AuthClient::new(config, FileStorage::new(&path))?;
    assert!(!client.is_authenticated());

    client.logout()?;

    assert!(!client.is_authenticated());
    assert_eq!(FileStorage::new(&path).get_item(AUTH_TOKEN_KEY)?, None);
    assert!(!std::fs::read_to_string(&path)?.contains("tok"));
    Ok(())
}

#[tokio::test]
async fn session_survives_restart_with_file_storage() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_ok(&server).await;

    let dir = tempfile::tempdir()?;
    let session_file = dir.path().join("session.json");

    let mut client = AuthClient::new(config(&server), FileStorage::new(&session_file))?;
    client.login(&credentials()).await?;
    drop(client);

    let restored = AuthClient::new(config(&server), FileStorage::new(&session_file))?;
    assert!(restored.is_authenticated());
    assert_eq!(
        restored.session().token().unwrap().expose_secret(),
        "jwt-access"
    );
    assert_eq!(restored.session().user().unwrap().email, "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn signup_posts_backend_schema_without_logging_in() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password1": "analytical",
            "password2": "analytical",
            "first_name": "Ada",
            "last_name": "Lovelace"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "detail": "Verification e-mail sent."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    client.signup(&signup_request()).await?;

    assert!(!client.is_authenticated());
    assert!(client.store().storage().is_empty());
    Ok(())
}

#[tokio::test]
async fn signup_surfaces_field_errors() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["A user is already registered with this e-mail address."]
        })))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let err = client.signup(&signup_request()).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "A user is already registered with this e-mail address."
    );
    Ok(())
}

#[tokio::test]
async fn signup_then_unverified_stays_on_verify() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "ada@example.com",
            "is_active": false
        })))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Signup);

    flow.submit_signup(&mut client, &signup_request()).await?;
    assert_eq!(flow.mode(), AuthMode::Verify);
    assert!(flow.is_open());

    let verified = flow.confirm_verified(&client).await?;
    assert!(!verified);
    assert_eq!(flow.mode(), AuthMode::Verify);
    assert!(flow.is_open());
    Ok(())
}

#[tokio::test]
async fn signup_then_verified_closes_flow() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_active": true
        })))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Signup);

    flow.submit_signup(&mut client, &signup_request()).await?;
    assert!(flow.confirm_verified(&client).await?);
    assert!(!flow.is_open());
    Ok(())
}

#[tokio::test]
async fn failed_signup_keeps_signup_mode() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "password1": ["This password is too common."]
        })))
        .mount(&server)
        .await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Signup);

    assert!(flow.submit_signup(&mut client, &signup_request()).await.is_err());
    assert_eq!(flow.mode(), AuthMode::Signup);
    assert!(flow.is_open());
    Ok(())
}

#[tokio::test]
async fn check_verified_sends_bearer_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("Authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = SessionStore::new(MemoryStorage::new());
    store.set(&SecretString::from("old-token".to_string()), &stored_user())?;

    let client = AuthClient::new(config(&server), store.into_storage())?;
    assert!(client.check_verified().await?);
    Ok(())
}

#[tokio::test]
async fn check_verified_reports_http_errors() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .mount(&server)
        .await;

    let client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Verify);

    let err = flow.confirm_verified(&client).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(flow.mode(), AuthMode::Verify);
    assert!(flow.is_open());
    Ok(())
}

#[tokio::test]
async fn login_through_flow_closes_it() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_ok(&server).await;

    let mut client = AuthClient::new(config(&server), MemoryStorage::new())?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Signup);

    // login is only submitted from the login step
    assert!(matches!(
        flow.submit_login(&mut client, &credentials()).await,
        Err(AuthError::InvalidTransition { .. })
    ));
    assert!(!client.is_authenticated());

    flow.switch_mode(AuthMode::Login)?;
    flow.submit_login(&mut client, &credentials()).await?;

    assert!(!flow.is_open());
    assert!(client.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn switching_modes_never_touches_the_session() -> Result<()> {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set(&SecretString::from("old-token".to_string()), &stored_user())?;
    let storage = store.into_storage();
    let before = storage.clone();

    let client = AuthClient::new(ApiConfig::default(), storage)?;
    let mut flow = AuthFlow::new();
    flow.open(AuthMode::Login);
    for mode in [
        AuthMode::Signup,
        AuthMode::Login,
        AuthMode::Signup,
        AuthMode::Login,
    ] {
        flow.switch_mode(mode)?;
    }
    flow.close();

    assert!(client.is_authenticated());
    assert_eq!(
        client.store().storage().get_item(AUTH_TOKEN_KEY)?,
        before.get_item(AUTH_TOKEN_KEY)?
    );
    assert_eq!(
        client.store().storage().get_item(USER_KEY)?,
        before.get_item(USER_KEY)?
    );
    Ok(())
}

#[tokio::test]
async fn password_reset_and_email_verification_endpoints() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/forgot-password/"))
        .and(body_json(json!({ "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/reset-password/"))
        .and(body_json(json!({
            "token": "reset-token",
            "new_password1": "new-password",
            "new_password2": "new-password"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-email/"))
        .and(body_json(json!({ "key": "verify-key" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Not found."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(config(&server), MemoryStorage::new())?;

    client.forgot_password(" ada@example.com ").await?;
    client
        .reset_password(
            &SecretString::from("reset-token".to_string()),
            &SecretString::from("new-password".to_string()),
            &SecretString::from("new-password".to_string()),
        )
        .await?;

    let err = client
        .verify_email(&SecretString::from("verify-key".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Not found.");
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_network_error() -> Result<()> {
    // port 9 (discard) is closed on test hosts; the connect fails fast
    let config = ApiConfig::new("http://127.0.0.1:9/api/", Duration::from_secs(2))?;
    let mut client = AuthClient::new(config, MemoryStorage::new())?;

    let err = client.login(&credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        AuthError::Network(_) | AuthError::Timeout(_)
    ));
    assert!(!client.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn slow_server_times_out() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "is_active": true }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ApiConfig::new(&format!("{}/api/", server.uri()), Duration::from_millis(200))?;
    let client = AuthClient::new(config, MemoryStorage::new())?;

    let err = client.check_verified().await.unwrap_err();
    assert!(matches!(err, AuthError::Timeout(_)));
    Ok(())
}

#[tokio::test]
async fn stalled_response_body_times_out() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut buf = [0_u8; 4096];
        let _ = socket.read(&mut buf).await;
        // headers and the first byte of the body, then nothing
        let _ = socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{",
            )
            .await;
        let _ = socket.flush().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let config = ApiConfig::new(&format!("http://{addr}/api/"), Duration::from_millis(500))?;
    let mut client = AuthClient::new(config, MemoryStorage::new())?;

    let err = client.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Timeout(_)), "unexpected error: {err:?}");
    assert!(!client.is_authenticated());
    Ok(())
}
