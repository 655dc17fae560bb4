// tests/uploader_batch_test.rs

use clap::Parser;
use imgur_upload::{
    UploadJobContext,
    cli::Cli,
    client::ImgurClient,
    config::AppConfig,
    error::{AppError, AppResult},
    models::UploadConfig,
    uploader::AlbumUploader,
};
use mockito::{Matcher, ServerGuard};
use std::sync::Arc;
use tempfile::tempdir;

fn album_body() -> String {
    std::fs::read_to_string("tests/fixtures/album_created_response.json").unwrap()
}

fn image_body(id: &str) -> String {
    std::fs::read_to_string("tests/fixtures/image_uploaded_response.json")
        .unwrap()
        .replace("k9X2mQs", id)
}

fn error_body() -> String {
    std::fs::read_to_string("tests/fixtures/upload_error_response.json").unwrap()
}

fn context_for(server: &ServerGuard, argv: &[&str]) -> AppResult<UploadJobContext> {
    let config = Arc::new(AppConfig::for_tests(&server.url()));
    let mut client = ImgurClient::new(&config)?;
    client.set_client_credentials("test-client-id", "test-client-secret");
    Ok(UploadJobContext {
        config,
        args: Arc::new(Cli::parse_from(argv)),
        client,
        interactive: false,
    })
}

#[tokio::test]
async fn test_single_target_batch_shares_metadata_with_image() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .match_header("authorization", "Client-ID test-client-id")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "Holiday 2024".into()),
            Matcher::UrlEncoded("description".into(), "Beach day".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    // With exactly one target, the image inherits the album metadata next
    // to the association deletehash.
    let image_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("image".into(), "https://example.com/cat.png".into()),
            Matcher::UrlEncoded("type".into(), "URL".into()),
            Matcher::UrlEncoded("album".into(), "al0bum1De7eteHash".into()),
            Matcher::UrlEncoded("title".into(), "Holiday 2024".into()),
            Matcher::UrlEncoded("description".into(), "Beach day".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("k9X2mQs"))
        .create_async()
        .await;

    let context = context_for(
        &server,
        &[
            "imgur-upload",
            "https://example.com/cat.png",
            "-t",
            "Holiday 2024",
            "-d",
            "Beach day",
        ],
    )?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    image_mock.assert_async().await;
    assert_eq!(outcome.album_id, "dUfnKGL");
    assert_eq!(outcome.image_ids, vec!["k9X2mQs".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_multi_target_batch_keeps_metadata_on_album_only() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .match_body(Matcher::UrlEncoded("title".into(), "Cats".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    // Exact bodies: with two targets, no title or description may ride
    // along with the individual images.
    let first_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::Exact(
            "image=https%3A%2F%2Fexample.com%2Fa.png&type=URL&album=al0bum1De7eteHash".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("img0001"))
        .create_async()
        .await;
    let second_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::Exact(
            "image=https%3A%2F%2Fexample.com%2Fb.png&type=URL&album=al0bum1De7eteHash".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("img0002"))
        .create_async()
        .await;

    let context = context_for(
        &server,
        &[
            "imgur-upload",
            "https://example.com/a.png",
            "https://example.com/b.png",
            "-t",
            "Cats",
        ],
    )?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    first_mock.assert_async().await;
    second_mock.assert_async().await;
    assert_eq!(
        outcome.image_ids,
        vec!["img0001".to_string(), "img0002".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_is_reported_and_batch_continues() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    let bad_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![Matcher::UrlEncoded(
            "image".into(),
            "https://example.com/broken.png".into(),
        )]))
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(error_body())
        .create_async()
        .await;
    let good_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![Matcher::UrlEncoded(
            "image".into(),
            "https://example.com/fine.png".into(),
        )]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("okimg01"))
        .create_async()
        .await;

    let context = context_for(
        &server,
        &[
            "imgur-upload",
            "https://example.com/broken.png",
            "https://example.com/fine.png",
        ],
    )?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    bad_mock.assert_async().await;
    good_mock.assert_async().await;
    // The broken target costs one diagnostic line, not the batch.
    assert_eq!(outcome.image_ids, vec!["okimg01".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_object_shaped_error_surfaces_its_message() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    // Some endpoints wrap the failure in an error object instead of a bare
    // string; the nested message is the one worth showing.
    let image_mock = server
        .mock("POST", "/3/image")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"data":{"error":{"code":1003,"message":"File is over the size limit","type":"ImgurException"},"request":"/3/image","method":"POST"},"success":false,"status":400}"#,
        )
        .create_async()
        .await;

    let config = AppConfig::for_tests(&server.url());
    let mut client = ImgurClient::new(&config)?;
    client.set_client_credentials("test-client-id", "test-client-secret");

    // --- Act ---
    let result = client
        .upload_from_url("https://example.com/huge.png", &UploadConfig::default())
        .await;

    // --- Assert ---
    image_mock.assert_async().await;
    match result {
        Err(AppError::Api(message)) => assert_eq!(message, "File is over the size limit"),
        other => panic!("expected an API error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_album_creation_failure_aborts_the_batch() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(error_body())
        .create_async()
        .await;
    // No /3/image mock on purpose: nothing may be uploaded once the album
    // fails.

    let context = context_for(&server, &["imgur-upload", "https://example.com/cat.png"])?;

    // --- Act ---
    let result = AlbumUploader::new(&context).run().await;

    // --- Assert ---
    album_mock.assert_async().await;
    match result {
        Err(AppError::Api(message)) => assert!(message.contains("Invalid URL")),
        other => panic!("expected an API error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_directory_target_expands_shallow_and_sorted() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    // Only the two top-level files produce requests, base64-encoded. The
    // dotfile is skipped outright and the nested subdirectory fails the
    // local read before any request goes out.
    let image_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "base64".into()),
            Matcher::UrlEncoded("album".into(), "al0bum1De7eteHash".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("dirimg1"))
        .expect(2)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), b"not-really-a-png").unwrap();
    std::fs::write(dir.path().join("b.png"), b"also-not-a-png").unwrap();
    std::fs::write(dir.path().join(".hidden.png"), b"dotfile").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested").join("c.png"), b"nested").unwrap();

    let dir_str = dir.path().to_str().unwrap();
    let context = context_for(&server, &["imgur-upload", dir_str])?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    image_mock.assert_async().await;
    assert_eq!(
        outcome.image_ids,
        vec!["dirimg1".to_string(), "dirimg1".to_string()]
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_directory_is_reported_and_batch_continues() -> AppResult<()> {
    use std::os::unix::fs::PermissionsExt;

    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    let image_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("image".into(), "https://example.com/after.png".into()),
            Matcher::UrlEncoded("type".into(), "URL".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("afterimg"))
        .expect(1)
        .create_async()
        .await;

    // A directory that exists but carries no read permission. Privileged
    // runners bypass the mode and enumerate it as empty; either way the
    // batch must carry on to the next target.
    let base = tempdir().unwrap();
    let locked = base.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    let locked_str = locked.to_str().unwrap();
    let context = context_for(
        &server,
        &["imgur-upload", locked_str, "https://example.com/after.png"],
    )?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    image_mock.assert_async().await;
    assert_eq!(outcome.image_ids, vec!["afterimg".to_string()]);

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    Ok(())
}

#[tokio::test]
async fn test_invalid_target_is_skipped_without_a_request() -> AppResult<()> {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;

    let album_mock = server
        .mock("POST", "/3/album")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(album_body())
        .create_async()
        .await;

    let image_mock = server
        .mock("POST", "/3/image")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("image".into(), "http://example.com/img.png".into()),
            Matcher::UrlEncoded("type".into(), "URL".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(image_body("urlimg1"))
        .expect(1)
        .create_async()
        .await;

    let context = context_for(
        &server,
        &[
            "imgur-upload",
            "http://example.com/img.png",
            "/definitely/missing.jpg",
        ],
    )?;

    // --- Act ---
    let outcome = AlbumUploader::new(&context).run().await?;

    // --- Assert ---
    album_mock.assert_async().await;
    image_mock.assert_async().await;
    assert_eq!(outcome.image_ids, vec!["urlimg1".to_string()]);
    Ok(())
}
