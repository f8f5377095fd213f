//! Client calls against a real server on an ephemeral port.

use std::sync::Arc;

use tokio::net::TcpListener;
use verso_client::UsersClient;
use verso_core::{ErrorCode, MemoryTable, NewUser, StoreConfig, UserPatch, UserStore};
use verso_server::{create_server, create_server_with_auth, AppState};

async fn spawn(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn state() -> AppState {
    AppState::new(UserStore::new(
        Arc::new(MemoryTable::new()),
        StoreConfig::default(),
    ))
}

#[tokio::test]
async fn crud_round_trip() {
    let client = UsersClient::new(&spawn(create_server(state())).await);

    let user = client
        .create(&NewUser::new("A", "a@x.com").with_phone("+1"))
        .await
        .unwrap();
    let updated = client
        .update(&user.user_id, &UserPatch::default().age(5))
        .await
        .unwrap();
    assert_eq!(updated.age, 5);
    assert_eq!(updated.phone.as_deref(), Some("+1"));

    assert_eq!(client.get(&user.user_id).await.unwrap(), Some(updated.clone()));
    assert_eq!(client.list().await.unwrap(), vec![updated]);

    let history = client.query_history(&user.user_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1], user);

    assert_eq!(client.delete(&user.user_id).await.unwrap(), 2);
    assert_eq!(client.get(&user.user_id).await.unwrap(), None);
    assert!(client.query_history(&user.user_id).await.unwrap().is_empty());

    let err = client.delete(&user.user_id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UsrNotFound);
}

#[tokio::test]
async fn ids_with_reserved_characters_round_trip() {
    let client = UsersClient::new(&spawn(create_server(state())).await);

    for id in ["team/ada", "ada?x=1", "ada#1", "ada lovelace"] {
        let user = client
            .create(&NewUser::new("Ada", "ada@x.com").with_user_id(id))
            .await
            .unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(client.get(id).await.unwrap(), Some(user));

        let updated = client
            .update(id, &UserPatch::default().age(36))
            .await
            .unwrap();
        assert_eq!(updated.user_id, id);
        assert_eq!(client.delete(id).await.unwrap(), 2);
        assert_eq!(client.get(id).await.unwrap(), None);
    }
}

#[tokio::test]
async fn validation_errors_surface() {
    let client = UsersClient::new(&spawn(create_server(state())).await);

    let err = client
        .create(&NewUser {
            name: Some("No Email".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(err.to_string().contains("email"));
}

#[tokio::test]
async fn batch_and_queries() {
    let client = UsersClient::new(&spawn(create_server(state())).await);

    let samples = client.populate_sample_data().await.unwrap();
    assert_eq!(samples.len(), 8);

    let outcome = client
        .batch_write(&[
            NewUser::new("Extra", "extra@x.com").with_age(70),
            NewUser::default(),
        ])
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.failed.len(), 1);

    let ids = vec![samples[0].user_id.clone(), "ghost".to_string()];
    let read = client.batch_read(&ids).await.unwrap();
    assert_eq!(read.found, vec![samples[0].clone()]);
    assert_eq!(read.not_found, vec!["ghost"]);

    let scan = client.scan_by_age(Some(60), None).await.unwrap();
    assert_eq!((scan.min_age, scan.max_age), (60, 200));
    assert_eq!(scan.users.len(), 1);
    assert_eq!(scan.users[0].name, "Extra");

    let hits = client.query_by_email("jane.smith@example.com").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(client.query_by_email("nobody@x.com").await.unwrap().is_empty());

    let recent = client.query_recent(Some(2)).await.unwrap();
    assert_eq!(recent.hours, 2);
    assert_eq!(recent.users.len(), 9);

    let health = client.health().await.unwrap();
    assert_eq!(health.backend, "memory");
    assert_eq!(health.record_count, 9);
}

#[tokio::test]
async fn api_key_is_sent() {
    let base = spawn(create_server_with_auth(state(), "secret")).await;

    let anonymous = UsersClient::new(&base);
    assert!(anonymous.list().await.is_err());

    let authed = UsersClient::with_options(Some(&base), Some("secret"));
    assert!(authed.list().await.unwrap().is_empty());
}
