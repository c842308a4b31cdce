/// End-to-end tests: the client against a live API server
///
/// Each test starts the API over an in-memory store on an ephemeral port.

use std::sync::Arc;
use taskdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdesk_client::{
    api::{ApiClient, NewTask, TaskPatch},
    error::{ClientError, LOGIN_FAILED, REGISTER_FAILED},
    forms::{LoginForm, RegisterForm},
    session::{Session, TokenStorage},
};
use taskdesk_shared::store::memory::MemoryStore;
use tempfile::TempDir;

async fn spawn_api() -> String {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("memory:".to_string()),
        "JWT_SECRET" => Some("client-test-secret-at-least-32-bytes!".to_string()),
        "PASSWORD_HASH_MEMORY_KIB" => Some("1024".to_string()),
        "PASSWORD_HASH_ITERATIONS" => Some("1".to_string()),
        "PASSWORD_HASH_PARALLELISM" => Some("1".to_string()),
        _ => None,
    })
    .unwrap();
    let app = build_router(AppState::new(Arc::new(MemoryStore::new()), config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str, dir: &TempDir, name: &str) -> ApiClient {
    let session = Session::restore(TokenStorage::new(dir.path().join(name))).unwrap();
    ApiClient::new(base_url, session).unwrap()
}

async fn logged_in(base_url: &str, dir: &TempDir, username: &str) -> ApiClient {
    let client = client(base_url, dir, username);
    client
        .register(&RegisterForm::new(username, "secret1", "secret1"))
        .await
        .unwrap();
    client
        .login(&LoginForm::new(username, "secret1"))
        .await
        .unwrap();
    client
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base_url, &dir, "alice");

    client
        .register(&RegisterForm::new("alice", "secret1", "secret1"))
        .await
        .unwrap();

    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_login_persists_token() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    logged_in(&base_url, &dir, "alice").await;

    // A fresh process would restore the same token
    let restored = client(&base_url, &dir, "alice");
    assert!(restored.session().is_authenticated());
    assert!(restored.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failures_use_generic_messages() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let alice = logged_in(&base_url, &dir, "alice").await;

    let result = alice
        .register(&RegisterForm::new("alice", "secret1", "secret1"))
        .await;
    assert!(matches!(result, Err(ClientError::Rejected(m)) if m == REGISTER_FAILED));

    let stranger = client(&base_url, &dir, "stranger");
    let result = stranger.login(&LoginForm::new("alice", "wrong-password")).await;
    assert!(matches!(result, Err(ClientError::Rejected(m)) if m == LOGIN_FAILED));
    assert!(!stranger.session().is_authenticated());
}

#[tokio::test]
async fn test_task_lifecycle() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let client = logged_in(&base_url, &dir, "alice").await;

    let task = client
        .create_task(&NewTask {
            title: "buy milk".to_string(),
            description: Some("2 litres".to_string()),
        })
        .await
        .unwrap();
    assert!(!task.is_complete);

    let toggled = client.toggle_complete(&task).await.unwrap();
    assert!(toggled.is_complete);
    let restored = client.toggle_complete(&toggled).await.unwrap();
    assert_eq!(restored, task);

    let edited = client
        .update_task(
            task.id,
            &TaskPatch {
                title: Some("buy oat milk".to_string()),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.title, "buy oat milk");
    assert_eq!(edited.description, None);

    let message = client.delete_task(task.id).await.unwrap();
    assert_eq!(message, "Task deleted successfully");
    assert!(client.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_other_accounts_tasks_are_not_found() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let alice = logged_in(&base_url, &dir, "alice").await;
    let bob = logged_in(&base_url, &dir, "bob").await;

    let task = alice
        .create_task(&NewTask {
            title: "private".to_string(),
            description: None,
        })
        .await
        .unwrap();

    assert!(bob.list_tasks().await.unwrap().is_empty());
    let err = bob.delete_task(task.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    assert_eq!(alice.list_tasks().await.unwrap(), vec![task]);
}

#[tokio::test]
async fn test_logout_stops_authenticated_calls() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let alice = logged_in(&base_url, &dir, "alice").await;

    alice.logout().unwrap();

    assert!(matches!(
        alice.list_tasks().await,
        Err(ClientError::NotLoggedIn)
    ));
    assert!(!client(&base_url, &dir, "alice").session().is_authenticated());
}

#[tokio::test]
async fn test_stale_token_is_rejected_by_server() {
    let base_url = spawn_api().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client(&base_url, &dir, "alice");
    client.session().login("not-a-real-token").unwrap();

    let err = client.list_tasks().await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}
