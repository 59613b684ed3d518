use photopoet::{
    ai::MockPoemClient,
    app::App,
    photo::{PhotoDataUri, MAX_PHOTO_BYTES},
    session::{Phase, SelectionError, UploadSession},
};
use pretty_assertions::assert_eq;
use std::io::Write;

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

fn photo_of_size(magic: &[u8], size: usize) -> PhotoDataUri {
    let mut bytes = magic.to_vec();
    bytes.resize(size, 0);
    PhotoDataUri::from_bytes(&bytes).unwrap()
}

#[tokio::test]
async fn test_two_mib_jpeg_generates_exact_poem_text() {
    let service = MockPoemClient::new().with_poem_response("Autumn light...".to_string());
    let mut session = UploadSession::new();

    session.select(photo_of_size(JPEG_MAGIC, 2 * 1024 * 1024)).unwrap();
    assert_eq!(session.phase(), Phase::Selected);

    let phase = session.run_generation(&service).await;
    assert_eq!(phase, Phase::Completed);
    assert_eq!(session.poem(), Some("Autumn light..."));
    assert_eq!(session.error(), None);
    assert_eq!(service.get_call_count(), 1);
}

#[tokio::test]
async fn test_five_mib_png_is_rejected_before_any_call() {
    let service = MockPoemClient::new();
    let mut session = UploadSession::new();

    let err = session
        .select(photo_of_size(PNG_MAGIC, 5 * 1024 * 1024))
        .unwrap_err();
    assert!(matches!(err, SelectionError::TooLarge { .. }));
    assert!(err.to_string().contains("File Too Large"));
    assert_eq!(session.phase(), Phase::Idle);

    // Generation never starts without a selection.
    let phase = session.run_generation(&service).await;
    assert_eq!(phase, Phase::Idle);
    assert_eq!(service.get_call_count(), 0);
}

#[tokio::test]
async fn test_boundary_sized_photo_is_accepted() {
    let mut session = UploadSession::new();
    session
        .select(photo_of_size(PNG_MAGIC, MAX_PHOTO_BYTES))
        .unwrap();
    assert_eq!(session.phase(), Phase::Selected);
}

#[tokio::test]
async fn test_model_fault_surfaces_as_failed_with_cause() {
    let service = MockPoemClient::new().with_failure("network unreachable".to_string());
    let mut session = UploadSession::new();

    session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
    let phase = session.run_generation(&service).await;

    assert_eq!(phase, Phase::Failed);
    let message = session.error().unwrap();
    assert!(message.contains("network unreachable"), "got: {}", message);
    assert!(session.photo().is_some());
}

#[tokio::test]
async fn test_retry_after_failure_reaches_completed() {
    let service = MockPoemClient::new()
        .with_failure("transient fault".to_string())
        .with_poem_response("Second try sings".to_string());
    let mut session = UploadSession::new();

    session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
    assert_eq!(session.run_generation(&service).await, Phase::Failed);
    assert_eq!(session.run_generation(&service).await, Phase::Completed);
    assert_eq!(session.poem(), Some("Second try sings"));
    assert_eq!(service.get_call_count(), 2);
}

#[tokio::test]
async fn test_reselect_after_completion_discards_result() {
    let service = MockPoemClient::new().with_poem_response("First poem".to_string());
    let mut session = UploadSession::new();

    session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
    session.run_generation(&service).await;
    assert_eq!(session.phase(), Phase::Completed);

    session.select(photo_of_size(JPEG_MAGIC, 64)).unwrap();
    assert_eq!(session.phase(), Phase::Selected);
    assert_eq!(session.poem(), None);
    assert_eq!(session.error(), None);
}

#[tokio::test]
async fn test_clear_returns_to_idle_from_every_state() {
    let failing = MockPoemClient::new().with_failure("boom".to_string());
    let succeeding = MockPoemClient::new();

    for phase in ["selected", "completed", "failed", "generating"] {
        let mut session = UploadSession::new();
        session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
        match phase {
            "completed" => {
                session.run_generation(&succeeding).await;
            }
            "failed" => {
                session.run_generation(&failing).await;
            }
            "generating" => {
                session.begin_generation().unwrap();
            }
            _ => {}
        }

        session.clear();
        assert_eq!(session.phase(), Phase::Idle, "after clear from {}", phase);
        assert!(session.photo().is_none());
        assert!(session.poem().is_none());
        assert!(session.error().is_none());
    }
}

#[tokio::test]
async fn test_generate_while_in_flight_makes_no_outbound_call() {
    let service = MockPoemClient::new();
    let mut session = UploadSession::new();

    session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
    let pending = session.begin_generation().unwrap();
    assert_eq!(session.phase(), Phase::Generating);

    // A second generate while one request is outstanding is a no-op.
    let phase = session.run_generation(&service).await;
    assert_eq!(phase, Phase::Generating);
    assert_eq!(service.get_call_count(), 0);

    session.finish_generation(pending.request_id, Ok("a poem".to_string()));
    assert_eq!(session.phase(), Phase::Completed);
}

#[tokio::test]
async fn test_stale_response_never_overwrites_newer_selection() {
    let mut session = UploadSession::new();

    session.select(photo_of_size(PNG_MAGIC, 64)).unwrap();
    let stale = session.begin_generation().unwrap();

    session.select(photo_of_size(JPEG_MAGIC, 64)).unwrap();
    assert_eq!(session.phase(), Phase::Selected);

    let applied = session.finish_generation(stale.request_id, Ok("late poem".to_string()));
    assert!(!applied);
    assert_eq!(session.phase(), Phase::Selected);
    assert_eq!(session.poem(), None);
}

#[tokio::test]
async fn test_app_generates_poem_for_photo_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PNG_MAGIC).unwrap();

    let service = MockPoemClient::new().with_poem_response("A file, a frame, a verse".to_string());
    let mut app = App::with_service(Box::new(service));

    let poem = app.run(file.path()).await.unwrap();
    assert_eq!(poem, "A file, a frame, a verse");
    assert_eq!(app.session().phase(), Phase::Completed);
}

#[tokio::test]
async fn test_app_rejects_non_image_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"just some text").unwrap();

    let service = MockPoemClient::new();
    let mut app = App::with_service(Box::new(service));

    let err = app.run(file.path()).await.unwrap_err();
    assert!(matches!(err, photopoet::Error::Validation(_)));
    assert_eq!(app.session().phase(), Phase::Idle);
}

#[tokio::test]
async fn test_app_surfaces_model_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PNG_MAGIC).unwrap();

    let service = MockPoemClient::new().with_failure("quota exceeded".to_string());
    let mut app = App::with_service(Box::new(service));

    let err = app.run(file.path()).await.unwrap_err();
    match err {
        photopoet::Error::AiProvider(message) => {
            assert!(message.contains("quota exceeded"), "got: {}", message)
        }
        other => panic!("expected AiProvider error, got {:?}", other),
    }
    assert_eq!(app.session().phase(), Phase::Failed);
}
