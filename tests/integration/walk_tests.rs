//! Integration tests for the page walker
//!
//! These tests use wiremock to stand up a mock document viewer and walk it
//! end-to-end.

mod support;

use manual_downloader::config::OutputFormat;
use manual_downloader::output::{assemble_outcome_with_interrupt, AssembleError, ProgressReporter};
use manual_downloader::state::WalkState;
use manual_downloader::storage::DirectoryStore;
use manual_downloader::traversal::{download, walk, Walker};
use manual_downloader::{Artifact, ManualError};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use support::{file_names, png, test_config, viewer_page};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `page_path`
async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a PNG image at `image_path`
async fn mount_image(server: &MockServer, image_path: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes)
                .insert_header("content-type", "image/png"),
        )
        .mount(server)
        .await;
}

/// Mounts a viewer of `pages` pages starting at page 1
///
/// Page 1 lives at `/viewer/doc`, page n at `/viewer/doc/n?p=n`. Every
/// href and src is relative to the site root, not to the page.
async fn mount_viewer(server: &MockServer, pages: u32) {
    for page in 1..=pages {
        let page_path = if page == 1 {
            "/viewer/doc".to_string()
        } else {
            format!("/viewer/doc/{}", page)
        };
        let image_src = format!("files/doc/{}.png", page);
        let next_href = format!("viewer/doc/{}?p={}", page + 1, page + 1);
        let next = if page < pages {
            Some(next_href.as_str())
        } else {
            None
        };

        mount_page(
            server,
            &page_path,
            viewer_page(Some(pages), Some(&image_src), next),
        )
        .await;
        mount_image(server, &format!("/{}", image_src), png(10 + page, 20, page as u8 * 40)).await;
    }
}

#[derive(Clone, Default)]
struct RecordingProgress {
    total: Arc<Mutex<Option<u32>>>,
    saved: Arc<Mutex<Vec<u32>>>,
    finished: Arc<Mutex<bool>>,
    abandoned: Arc<Mutex<bool>>,
}

impl ProgressReporter for RecordingProgress {
    fn on_start(&mut self, total_pages: u32) {
        *self.total.lock().unwrap() = Some(total_pages);
    }

    fn on_page_saved(&mut self, page: u32, _total_pages: Option<u32>) {
        self.saved.lock().unwrap().push(page);
    }

    fn on_finish(&mut self) {
        *self.finished.lock().unwrap() = true;
    }

    fn on_abandon(&mut self) {
        *self.abandoned.lock().unwrap() = true;
    }
}

#[tokio::test]
async fn test_three_page_document_to_pdf() {
    let server = MockServer::start().await;
    mount_viewer(&server, 3).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let artifact = download(&config, &format!("{}/viewer/doc", server.uri()))
        .await
        .expect("Download failed");

    let pdf_path = dir.path().join("manual.pdf");
    assert_eq!(
        artifact,
        Some(Artifact::Document {
            path: pdf_path.clone(),
            page_count: 3
        })
    );
    assert_eq!(
        file_names(dir.path()),
        vec!["1.png", "2.png", "3.png", "manual.pdf"]
    );

    let doc = lopdf::Document::load(&pdf_path).expect("Failed to load PDF");
    assert_eq!(doc.get_pages().len(), 3);
}

#[tokio::test]
async fn test_persisted_images_match_served_bytes() {
    let server = MockServer::start().await;
    mount_viewer(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.format = OutputFormat::Png;

    let outcome = walk(&config, &format!("{}/viewer/doc", server.uri()))
        .await
        .expect("Walk failed");

    assert_eq!(outcome.first_page, 1);
    assert_eq!(outcome.last_page, Some(2));
    assert_eq!(outcome.total_pages, Some(2));
    assert_eq!(outcome.pages_saved, 2);
    assert_eq!(std::fs::read(dir.path().join("1.png")).unwrap(), png(11, 20, 40));
    assert_eq!(std::fs::read(dir.path().join("2.png")).unwrap(), png(12, 20, 80));
}

#[tokio::test]
async fn test_root_relative_resolution_across_hops() {
    let server = MockServer::start().await;
    // Each page sits one directory deeper; links stay relative to the root
    let paths = ["/a", "/a/b/2", "/a/b/c/3", "/a/b/c/d/4"];
    for (index, page_path) in paths.iter().enumerate() {
        let page = index as u32 + 1;
        let next = paths
            .get(index + 1)
            .map(|next| format!("{}?p={}", next.trim_start_matches('/'), page + 1));
        let image_src = format!("img/{}.png", page);

        mount_page(
            &server,
            page_path,
            viewer_page(Some(4), Some(&image_src), next.as_deref()),
        )
        .await;
        mount_image(&server, &format!("/{}", image_src), png(4, 4, 10)).await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.output.format = OutputFormat::Png;

    let outcome = walk(&config, &format!("{}/a", server.uri()))
        .await
        .expect("Walk failed");

    assert_eq!(outcome.page_range(), Some((1, 4)));
    assert_eq!(
        file_names(dir.path()),
        vec!["1.png", "2.png", "3.png", "4.png"]
    );
}

#[tokio::test]
async fn test_entry_page_number_is_first_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc/5",
        viewer_page(Some(6), Some("/img/5.png"), Some("/doc/6?p=6")),
    )
    .await;
    mount_page(&server, "/doc/6", viewer_page(Some(6), Some("/img/6.png"), None)).await;
    mount_image(&server, "/img/5.png", png(5, 5, 50)).await;
    mount_image(&server, "/img/6.png", png(6, 6, 60)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let outcome = walk(&config, &format!("{}/doc/5?p=5", server.uri()))
        .await
        .expect("Walk failed");

    assert_eq!(outcome.page_range(), Some((5, 6)));
    assert_eq!(file_names(dir.path()), vec!["5.png", "6.png"]);

    let artifact = manual_downloader::assemble_outcome(&config, &outcome)
        .expect("Assembly failed")
        .expect("Expected an artifact");
    assert!(matches!(artifact, Artifact::Document { page_count: 2, .. }));
}

#[tokio::test]
async fn test_missing_total_widget_fails_before_any_image() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc",
        viewer_page(None, Some("/img/1.png"), Some("/doc/2?p=2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(2, 2, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = download(&config, &format!("{}/doc", server.uri())).await;

    assert!(matches!(result, Err(ManualError::Structure { .. })));
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_total_read_from_first_page_only() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc",
        viewer_page(Some(2), Some("/img/1.png"), Some("/doc/2?p=2")),
    )
    .await;
    // Later pages without the toolbar widget are fine
    mount_page(&server, "/doc/2", viewer_page(None, Some("/img/2.png"), None)).await;
    mount_image(&server, "/img/1.png", png(3, 3, 30)).await;
    mount_image(&server, "/img/2.png", png(3, 3, 60)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let outcome = walk(&config, &format!("{}/doc", server.uri()))
        .await
        .expect("Walk failed");

    assert_eq!(outcome.total_pages, Some(2));
    assert_eq!(outcome.pages_saved, 2);
    assert_eq!(file_names(dir.path()), vec!["1.png", "2.png"]);
}

#[tokio::test]
async fn test_missing_image_ends_document() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc",
        viewer_page(Some(3), Some("/img/1.png"), Some("/doc/2?p=2")),
    )
    .await;
    // Page 2 still links onward, but without an image the walk is over
    mount_page(&server, "/doc/2", viewer_page(Some(3), None, Some("/doc/3?p=3"))).await;
    mount_image(&server, "/img/1.png", png(3, 3, 30)).await;
    Mock::given(method("GET"))
        .and(path("/doc/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(viewer_page(Some(3), None, None)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let artifact = download(&config, &format!("{}/doc", server.uri()))
        .await
        .expect("Download failed");

    assert!(matches!(
        artifact,
        Some(Artifact::Document { page_count: 1, .. })
    ));
    assert_eq!(file_names(dir.path()), vec!["1.png", "manual.pdf"]);
}

#[tokio::test]
async fn test_first_page_without_image_saves_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", viewer_page(Some(3), None, None)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let artifact = download(&config, &format!("{}/doc", server.uri()))
        .await
        .expect("Download failed");

    assert_eq!(artifact, None);
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_page_server_error_fails_without_assembly() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc",
        viewer_page(Some(3), Some("/img/1.png"), Some("/doc/2?p=2")),
    )
    .await;
    mount_image(&server, "/img/1.png", png(3, 3, 30)).await;
    Mock::given(method("GET"))
        .and(path("/doc/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = download(&config, &format!("{}/doc", server.uri())).await;

    match result {
        Err(ManualError::Transport { url, status, body }) => {
            assert!(url.ends_with("/doc/2?p=2"), "unexpected url {}", url);
            assert_eq!(status, 500);
            assert_eq!(body, "server exploded");
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    assert_eq!(file_names(dir.path()), vec!["1.png"]);
}

#[tokio::test]
async fn test_image_not_found_fails() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", viewer_page(Some(1), Some("/img/1.png"), None)).await;
    Mock::given(method("GET"))
        .and(path("/img/1.png"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = walk(&config, &format!("{}/doc", server.uri())).await;

    assert!(matches!(
        result,
        Err(ManualError::Transport { status: 404, .. })
    ));
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_backwards_next_link_is_rejected() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/doc/1",
        viewer_page(Some(2), Some("/img/1.png"), Some("/doc/2?p=2")),
    )
    .await;
    mount_page(
        &server,
        "/doc/2",
        viewer_page(Some(2), Some("/img/2.png"), Some("/doc/1?p=1")),
    )
    .await;
    mount_image(&server, "/img/1.png", png(3, 3, 30)).await;
    mount_image(&server, "/img/2.png", png(3, 3, 60)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = download(&config, &format!("{}/doc/1?p=1", server.uri())).await;

    assert!(matches!(
        result,
        Err(ManualError::NonIncreasingPage { current: 2, next: 1 })
    ));
    assert_eq!(file_names(dir.path()), vec!["1.png", "2.png"]);
}

#[tokio::test]
async fn test_undecodable_image_fails_assembly() {
    let server = MockServer::start().await;
    mount_page(&server, "/doc", viewer_page(Some(1), Some("/img/1.png"), None)).await;
    mount_image(&server, "/img/1.png", b"<html>not a png</html>".to_vec()).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = download(&config, &format!("{}/doc", server.uri())).await;

    assert!(matches!(
        result,
        Err(ManualError::Assemble(AssembleError::MissingAsset { page: 1, .. }))
    ));
    assert_eq!(file_names(dir.path()), vec!["1.png"]);
}

#[tokio::test]
async fn test_walker_reports_progress_and_state() {
    let server = MockServer::start().await;
    mount_viewer(&server, 3).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let progress = RecordingProgress::default();
    let store = DirectoryStore::create(dir.path()).unwrap();

    let mut walker =
        Walker::new(&config, store, Box::new(progress.clone())).expect("Failed to build walker");
    assert_eq!(walker.state(), WalkState::Init);

    walker
        .run(&format!("{}/viewer/doc", server.uri()))
        .await
        .expect("Walk failed");

    assert_eq!(walker.state(), WalkState::Done);
    assert_eq!(*progress.total.lock().unwrap(), Some(3));
    assert_eq!(*progress.saved.lock().unwrap(), vec![1, 2, 3]);
    assert!(*progress.finished.lock().unwrap());
    assert!(!*progress.abandoned.lock().unwrap());
}

#[tokio::test]
async fn test_walker_state_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let progress = RecordingProgress::default();
    let store = DirectoryStore::create(dir.path()).unwrap();

    let mut walker =
        Walker::new(&config, store, Box::new(progress.clone())).expect("Failed to build walker");
    let result = walker.run(&format!("{}/doc", server.uri())).await;

    assert!(matches!(
        result,
        Err(ManualError::Transport { status: 503, .. })
    ));
    assert_eq!(walker.state(), WalkState::Failed);
    assert!(*progress.abandoned.lock().unwrap());
    assert!(progress.total.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_entry_url() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let result = walk(&config, "ftp://example.com/doc").await;

    assert!(matches!(result, Err(ManualError::UrlError(_))));
}

#[tokio::test]
async fn test_interrupt_after_walk_keeps_images_only() {
    let server = MockServer::start().await;
    mount_viewer(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());

    let outcome = walk(&config, &format!("{}/viewer/doc", server.uri()))
        .await
        .expect("Walk failed");
    let result =
        assemble_outcome_with_interrupt(&config, &outcome, Arc::new(AtomicBool::new(true)));

    assert!(matches!(
        result,
        Err(ManualError::Assemble(AssembleError::Interrupted))
    ));
    assert_eq!(file_names(dir.path()), vec!["1.png", "2.png"]);
}
