use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::net::TcpListener;

use notes_api::{
    AppState, build_router,
    config::{Config, RateLimitConfig, StorageKind},
    repository::MemoryRepository,
};
use notes_client::{
    ApiClient, ClientError, NoteInput, Route, Toast,
    pages::{CreatePage, HomePage, NoteDetailPage},
};

/// Serves a fresh in-memory API on an ephemeral port and returns a client for it.
async fn spawn_api(max_requests: u64) -> ApiClient {
    let config = Config {
        storage: StorageKind::Memory,
        rate_limit: RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
            per_client: true,
        },
        ..Config::default()
    };
    let state = AppState::new(Arc::new(MemoryRepository::new()), &config);
    let router = build_router(state, &config.cors_origin).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    ApiClient::new(&format!("http://{addr}/api")).unwrap()
}

#[tokio::test]
async fn create_page_checks_fields_before_sending() {
    let api = spawn_api(100).await;

    let mut page = CreatePage::new("  ", "content");
    let outcome = page.submit(&api).await;

    assert_eq!(outcome.toast, Some(Toast::error("Please fill in all fields")));
    assert_eq!(outcome.navigate, None);
    assert!(api.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_then_list() {
    let api = spawn_api(100).await;

    let mut page = CreatePage::new("Groceries", "milk, eggs");
    let outcome = page.submit(&api).await;
    assert_eq!(outcome.toast, Some(Toast::success("Note created successfully")));
    assert_eq!(outcome.navigate, Some(Route::Home));
    assert!(!page.is_loading);

    let mut home = HomePage::new();
    assert!(home.load(&api).await.is_none());
    assert!(!home.loading);
    assert_eq!(home.visible_notes().len(), 1);
    assert_eq!(home.notes[0].title, "Groceries");
}

#[tokio::test]
async fn blank_fields_never_leave_the_client() {
    let api = spawn_api(1).await;

    let err = api
        .create_note(&NoteInput::new("title", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(message) if message == "Title and content are required"));
    assert_eq!(err.status(), None);

    let err = api
        .update_note(1, &NoteInput::new("  ", "content"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));

    // The single request of the window is still available.
    assert!(api.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn detail_page_load_save_delete() {
    let api = spawn_api(100).await;
    let note = api
        .create_note(&NoteInput::new("Draft", "first"))
        .await
        .unwrap();

    let mut page = NoteDetailPage::new(note.id);
    assert!(page.load(&api).await.is_none());
    assert_eq!(page.title, "Draft");
    assert_eq!(page.content, "first");

    page.content = String::new();
    let outcome = page.save(&api).await;
    assert_eq!(outcome.toast, Some(Toast::error("Please fill in all fields")));

    page.content = "second".to_string();
    let outcome = page.save(&api).await;
    assert_eq!(outcome.toast, Some(Toast::success("Note updated successfully")));
    assert_eq!(outcome.navigate, Some(Route::Home));
    assert_eq!(api.get_note(note.id).await.unwrap().content, "second");

    let outcome = page.delete(&api, false).await;
    assert_eq!(outcome.toast, None);
    assert!(api.get_note(note.id).await.is_ok());

    let outcome = page.delete(&api, true).await;
    assert_eq!(outcome.toast, Some(Toast::success("Note deleted successfully")));
    assert!(api.list_notes().await.unwrap().is_empty());

    let outcome = page.delete(&api, true).await;
    assert_eq!(outcome.toast, Some(Toast::error("Failed to delete note")));
}

#[tokio::test]
async fn missing_note_shows_fetch_toast() {
    let api = spawn_api(100).await;

    let mut page = NoteDetailPage::new(404);
    assert_eq!(
        page.load(&api).await,
        Some(Toast::error("Failed to fetch note details"))
    );
    assert!(!page.is_loading);

    let err = api.get_note(404).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn home_delete_removes_card_locally() {
    let api = spawn_api(100).await;
    let keep = api.create_note(&NoteInput::new("keep", "a")).await.unwrap();
    let gone = api.create_note(&NoteInput::new("gone", "b")).await.unwrap();

    let mut home = HomePage::new();
    home.load(&api).await;
    assert_eq!(home.notes.len(), 2);

    let toast = home.delete_note(&api, gone.id).await;
    assert_eq!(toast, Toast::success("Note deleted successfully"));
    assert_eq!(home.notes, vec![keep]);
}

#[tokio::test]
async fn home_shows_banner_when_rate_limited() {
    let api = spawn_api(1).await;
    api.create_note(&NoteInput::new("only", "note")).await.unwrap();

    let mut home = HomePage::new();
    let toast = home.load(&api).await;

    assert!(toast.is_none());
    assert!(home.is_rate_limited);
    assert!(home.visible_notes().is_empty());

    let err = api.list_notes().await.unwrap_err();
    assert!(err.is_rate_limited());
    assert!(matches!(
        err,
        ClientError::RateLimited {
            retry_after: Some(_)
        }
    ));
}
