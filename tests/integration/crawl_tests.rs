//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the library site and run the
//! full discovery → fetch → persist → emit cycle end-to-end.

use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;
use tululu_ripple::config::{CrawlRequest, UserAgentConfig};
use tululu_ripple::crawler::{
    build_http_client, discover_book_ids, fetch_book, BookPipeline, Coordinator, Fetcher,
    RetryPolicy,
};
use tululu_ripple::output::{ArtifactWriter, BookRecord, DESCRIPTIONS_FILE};
use tululu_ripple::{CrawlError, RunPhase};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENRE_PATH: &str = "/l55/";

/// Listing page with one thumbnail per ID and pagination up to `last_page`
fn listing_html(ids: &[&str], last_page: u32) -> String {
    let thumbnails: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td><div class="bookimage"><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></div></td></tr></table>"#
            )
        })
        .collect();
    let pagination: String = (1..=last_page)
        .map(|page| format!(r#"<a class="npage" href="/l55/{page}/">{page}</a>"#))
        .collect();
    format!(r#"<html><body>{thumbnails}<p class="center">{pagination}</p></body></html>"#)
}

/// Detail page in the site's layout
fn detail_html(id: &str, title: &str, author: &str) -> String {
    format!(
        r#"<html><body><table><tr><td class="ow_px_td"><div id="content">
        <h1>{title}&nbsp;&nbsp;::&nbsp;&nbsp;<a href="/a{id}/">{author}</a></h1>
        <table class="d_book"><tr><td><div class="bookimage"><a href="/txt.php?id={id}"><img src="/shots/{id}.jpg"></a></div></td></tr></table>
        <span class="d_book">Жанр книги: <a href="/l55/" title="Научная фантастика - перейти к книгам этого жанра">Научная фантастика</a></span>
        <div class="texts"><b>reader{id}:</b><span class="black">Comment on {id}</span></div>
        <form class="r_comm"><input type="hidden" name="bookid" value="{id}"></form>
        </div></td></tr></table></body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn mount_listing(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Mounts the genre front page and `pages` listing pages of two books each,
/// numbered from 1 in order
async fn mount_genre(server: &MockServer, pages: u32) {
    mount_listing(server, GENRE_PATH, listing_html(&["1", "2"], pages)).await;
    for page in 1..=pages {
        let first = (page * 2 - 1).to_string();
        let second = (page * 2).to_string();
        mount_listing(
            server,
            &format!("/l55/{}", page),
            listing_html(&[&first, &second], pages),
        )
        .await;
    }
}

async fn mount_book(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(format!("Текст книги {}", id).into_bytes()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/b{}/", id)))
        .respond_with(html(detail_html(id, &format!("Book {}?", id), "Автор")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/shots/{}.jpg", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xd8, id.len() as u8]))
        .mount(server)
        .await;
}

/// The site answers unknown IDs by redirecting to its front page
async fn mount_missing_book(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html><body>Front page</body></html>".to_string()))
        .mount(server)
        .await;
}

fn fetcher(timeout: Duration) -> Fetcher {
    let client = build_http_client(&UserAgentConfig::default(), timeout)
        .expect("Failed to build client");
    Fetcher::new(client)
}

fn request(server: &MockServer, dest: &Path, start_page: u32, end_page: u32) -> CrawlRequest {
    let base_url = Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL");
    CrawlRequest {
        genre_url: base_url.join(GENRE_PATH).expect("Failed to build genre URL"),
        base_url,
        start_page,
        end_page,
        dest_dir: dest.to_path_buf(),
        download_text: true,
        download_images: true,
    }
}

fn coordinator(request: CrawlRequest, workers: usize) -> Coordinator {
    Coordinator::with_fetcher(
        request,
        fetcher(Duration::from_secs(5)),
        RetryPolicy::new(1, Duration::ZERO),
        workers,
    )
}

fn pipeline(request: &CrawlRequest) -> BookPipeline {
    BookPipeline {
        fetcher: fetcher(Duration::from_secs(5)),
        writer: ArtifactWriter::new(&request.dest_dir),
        retry: RetryPolicy::new(1, Duration::ZERO),
        base_url: request.base_url.clone(),
        download_text: request.download_text,
        download_images: request.download_images,
    }
}

fn read_descriptions(dest: &Path) -> Vec<BookRecord> {
    let text = std::fs::read_to_string(dest.join(DESCRIPTIONS_FILE))
        .expect("descriptions.json missing");
    serde_json::from_str(&text).expect("descriptions.json is not a record array")
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_harvest_two_of_three_pages() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1", "2"], 3)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1", "2"], 3)).await;
    mount_listing(&server, "/l55/2", listing_html(&["3", "4"], 3)).await;
    Mock::given(method("GET"))
        .and(path("/l55/3"))
        .respond_with(html(listing_html(&["5", "6"], 3)))
        .expect(0)
        .mount(&server)
        .await;
    for id in ["1", "2", "3", "4"] {
        mount_book(&server, id).await;
    }

    let dest = TempDir::new().unwrap();
    let mut coordinator = coordinator(request(&server, dest.path(), 1, 2), 1);
    let result = coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert_eq!(result.total_pages, 3);
    assert!(result.started_at.is_some());
    assert_eq!(result.ids_discovered, 4);
    assert_eq!(result.books_skipped(), 0);

    let records = read_descriptions(dest.path());
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(records, result.records);

    let first = &records[0];
    assert_eq!(first.title, "Book 1");
    assert_eq!(first.author, "Автор");
    assert_eq!(first.genre, "Научная фантастика");
    assert_eq!(first.comments, vec!["Comment on 1"]);
    assert_eq!(first.cover_image_url, format!("{}/shots/1.jpg", server.uri()));
    assert_eq!(first.image_path, "images/1.jpg");
    assert_eq!(first.text_path, "books/Book 1.txt");

    assert_eq!(
        file_names(&dest.path().join("books")),
        vec!["Book 1.txt", "Book 2.txt", "Book 3.txt", "Book 4.txt"]
    );
    assert_eq!(
        std::fs::read(dest.path().join("books/Book 3.txt")).unwrap(),
        "Текст книги 3".as_bytes()
    );
    assert_eq!(file_names(&dest.path().join("images")).len(), 4);

    let json = std::fs::read_to_string(dest.path().join(DESCRIPTIONS_FILE)).unwrap();
    assert!(json.contains("Научная фантастика"));
}

#[tokio::test]
async fn test_missing_book_raises_not_found_and_writes_nothing() {
    let server = MockServer::start().await;
    mount_missing_book(&server, "999999").await;

    let dest = TempDir::new().unwrap();
    let request = request(&server, dest.path(), 1, 1);

    let err = fetch_book(&fetcher(Duration::from_secs(5)), &request.base_url, "999999")
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::BookNotFound { ref id } if id == "999999"));

    let err = pipeline(&request).harvest("999999").await.unwrap_err();
    assert!(matches!(err, CrawlError::BookNotFound { .. }));
    assert!(!dest.path().join("books").exists());
    assert!(!dest.path().join("images").exists());
}

#[tokio::test]
async fn test_missing_book_is_skipped_during_run() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1", "999999"], 1)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1", "999999", "2"], 1)).await;
    mount_book(&server, "1").await;
    mount_missing_book(&server, "999999").await;
    mount_book(&server, "2").await;

    let dest = TempDir::new().unwrap();
    let result = coordinator(request(&server, dest.path(), 1, 1), 1)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(result.books_not_found, 1);
    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(file_names(&dest.path().join("books")).len(), 2);
}

#[tokio::test]
async fn test_detail_page_redirect_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b7/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html></html>".to_string()))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let request = request(&server, dest.path(), 1, 1);
    let err = fetch_book(&fetcher(Duration::from_secs(5)), &request.base_url, "7")
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::BookNotFound { ref id } if id == "7"));
}

#[tokio::test]
async fn test_status_error_is_not_reported_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "8"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/gone"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let request = request(&server, dest.path(), 1, 1);
    let err = fetch_book(&fetcher(Duration::from_secs(5)), &request.base_url, "8")
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_skip_flags_leave_paths_empty() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1"], 1)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1"], 1)).await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(html(detail_html("1", "Only", "Author")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shots/1.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let mut request = request(&server, dest.path(), 1, 1);
    request.download_text = false;
    request.download_images = false;

    let result = coordinator(request, 1).run().await.expect("Harvest failed");

    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.title, "Only");
    assert_eq!(record.text_path, "");
    assert_eq!(record.image_path, "");
    assert_eq!(record.cover_image_url, "");
    assert!(!dest.path().join("books").exists());
    assert!(!dest.path().join("images").exists());
    assert!(dest.path().join(DESCRIPTIONS_FILE).is_file());
}

#[tokio::test]
async fn test_text_only_skips_images() {
    let server = MockServer::start().await;
    mount_book(&server, "4").await;

    let dest = TempDir::new().unwrap();
    let mut request = request(&server, dest.path(), 1, 1);
    request.download_images = false;

    let record = pipeline(&request).harvest("4").await.expect("Harvest failed");
    assert_eq!(record.text_path, "books/Book 4.txt");
    assert_eq!(record.image_path, "");
    assert!(dest.path().join("books/Book 4.txt").is_file());
    assert!(!dest.path().join("images").exists());
}

#[tokio::test]
async fn test_malformed_discovery_page_is_fatal() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        GENRE_PATH,
        "<html><body><div class=\"bookimage\"><a href=\"/b1/\"></a></div></body></html>"
            .to_string(),
    )
    .await;

    let dest = TempDir::new().unwrap();
    let err = coordinator(request(&server, dest.path(), 1, 2), 1)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::MalformedPage(_)));
    assert!(!dest.path().join(DESCRIPTIONS_FILE).exists());
}

#[tokio::test]
async fn test_unreachable_genre_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GENRE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let err = coordinator(request(&server, dest.path(), 1, 2), 1)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_broken_pages_during_walk_are_isolated() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1"], 4)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1", "2"], 4)).await;
    mount_listing(&server, "/l55/2", "<html><body>maintenance</body></html>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/l55/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_listing(&server, "/l55/4", listing_html(&["7"], 4)).await;

    let request = request(&server, Path::new("unused"), 1, 4);
    let discovery = discover_book_ids(
        &fetcher(Duration::from_secs(5)),
        &RetryPolicy::new(1, Duration::ZERO),
        &request.genre_url,
        request.start_page,
        request.end_page,
    )
    .await
    .expect("Discovery failed");

    assert_eq!(discovery.ids, vec!["1", "2", "7"]);
    assert_eq!(discovery.pages_walked, 4);
    assert_eq!(discovery.pages_failed, 2);
}

#[tokio::test]
async fn test_walk_stays_inside_requested_range() {
    let server = MockServer::start().await;
    mount_genre(&server, 5).await;

    let request = request(&server, Path::new("unused"), 2, 4);
    let discovery = discover_book_ids(
        &fetcher(Duration::from_secs(5)),
        &RetryPolicy::new(1, Duration::ZERO),
        &request.genre_url,
        request.start_page,
        request.end_page,
    )
    .await
    .expect("Discovery failed");

    // pages 2..=4 hold books 3..=8
    assert_eq!(discovery.ids, vec!["3", "4", "5", "6", "7", "8"]);
    assert_eq!(discovery.total_pages, 5);
}

#[tokio::test]
async fn test_end_page_is_clamped_to_page_count() {
    let server = MockServer::start().await;
    mount_genre(&server, 2).await;
    Mock::given(method("GET"))
        .and(path("/l55/3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let request = request(&server, Path::new("unused"), 1, 10);
    let discovery = discover_book_ids(
        &fetcher(Duration::from_secs(5)),
        &RetryPolicy::new(1, Duration::ZERO),
        &request.genre_url,
        request.start_page,
        request.end_page,
    )
    .await
    .expect("Discovery failed");

    assert_eq!(discovery.pages_walked, 2);
    assert_eq!(discovery.ids, vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn test_range_past_last_page_emits_nothing() {
    let server = MockServer::start().await;
    mount_genre(&server, 2).await;

    let dest = TempDir::new().unwrap();
    let mut coordinator = coordinator(request(&server, dest.path(), 5, 6), 1);
    let result = coordinator.run().await.expect("Harvest failed");

    assert!(result.records.is_empty());
    assert_eq!(result.ids_discovered, 0);
    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert!(!dest.path().join(DESCRIPTIONS_FILE).exists());
}

#[tokio::test]
async fn test_rerun_produces_identical_output() {
    let server = MockServer::start().await;
    mount_genre(&server, 1).await;
    mount_book(&server, "1").await;
    mount_book(&server, "2").await;

    let dest = TempDir::new().unwrap();

    let first = coordinator(request(&server, dest.path(), 1, 1), 1)
        .run()
        .await
        .expect("First harvest failed");
    let json_first = std::fs::read(dest.path().join(DESCRIPTIONS_FILE)).unwrap();
    let text_first = std::fs::read(dest.path().join("books/Book 1.txt")).unwrap();
    let image_first = std::fs::read(dest.path().join("images/1.jpg")).unwrap();

    let second = coordinator(request(&server, dest.path(), 1, 1), 1)
        .run()
        .await
        .expect("Second harvest failed");

    assert_eq!(first.records, second.records);
    assert_eq!(
        std::fs::read(dest.path().join(DESCRIPTIONS_FILE)).unwrap(),
        json_first
    );
    assert_eq!(
        std::fs::read(dest.path().join("books/Book 1.txt")).unwrap(),
        text_first
    );
    assert_eq!(
        std::fs::read(dest.path().join("images/1.jpg")).unwrap(),
        image_first
    );
    assert_eq!(file_names(&dest.path().join("books")).len(), 2);
}

#[tokio::test]
async fn test_worker_pool_preserves_discovery_order() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1"], 1)).await;
    mount_listing(
        &server,
        "/l55/1",
        listing_html(&["10", "11", "12", "13", "14", "15"], 1),
    )
    .await;
    for id in ["10", "11", "12", "13", "14", "15"] {
        // earlier books answer slower so they finish last
        let delay = Duration::from_millis(match id {
            "10" => 300,
            "11" => 200,
            "12" => 100,
            _ => 0,
        });
        Mock::given(method("GET"))
            .and(path("/txt.php"))
            .and(query_param("id", id))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!("text {}", id))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/b{}/", id)))
            .respond_with(html(detail_html(id, &format!("Title {}", id), "A")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/shots/{}.jpg", id)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
            .mount(&server)
            .await;
    }
    let dest = TempDir::new().unwrap();
    let result = coordinator(request(&server, dest.path(), 1, 1), 4)
        .run()
        .await
        .expect("Harvest failed");

    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "11", "12", "13", "14", "15"]);

    let written: Vec<String> = read_descriptions(dest.path())
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(written, vec!["10", "11", "12", "13", "14", "15"]);
}

#[tokio::test]
async fn test_failed_book_does_not_stop_pool() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1"], 1)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1", "2", "3"], 1)).await;
    mount_book(&server, "1").await;
    mount_book(&server, "3").await;
    // book 2 serves a detail page without the expected markup
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b2/"))
        .respond_with(html("<html><body>redesigned</body></html>".to_string()))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let result = coordinator(request(&server, dest.path(), 1, 1), 3)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(result.books_failed, 1);
    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[tokio::test]
async fn test_timeout_is_retried_then_skipped() {
    let server = MockServer::start().await;
    mount_listing(&server, GENRE_PATH, listing_html(&["1"], 1)).await;
    mount_listing(&server, "/l55/1", listing_html(&["1", "2"], 1)).await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;
    mount_book(&server, "2").await;

    let dest = TempDir::new().unwrap();
    let mut coordinator = Coordinator::with_fetcher(
        request(&server, dest.path(), 1, 1),
        fetcher(Duration::from_millis(500)),
        RetryPolicy::new(2, Duration::from_millis(10)),
        1,
    );
    let result = coordinator.run().await.expect("Harvest failed");

    assert_eq!(result.books_unreachable, 1);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].id, "2");
}

#[tokio::test]
async fn test_unwritable_destination_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GENRE_PATH))
        .respond_with(html(listing_html(&["1"], 1)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let err = coordinator(request(&server, &blocker.join("dest"), 1, 1), 1)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Io(_)));
}

#[tokio::test]
async fn test_failed_cover_write_leaves_no_text_behind() {
    let server = MockServer::start().await;
    mount_book(&server, "1").await;

    let dest = TempDir::new().unwrap();
    // a plain file where the images directory should go
    std::fs::write(dest.path().join("images"), b"in the way").unwrap();

    let request = request(&server, dest.path(), 1, 1);
    let err = pipeline(&request).harvest("1").await.unwrap_err();

    assert!(matches!(err, CrawlError::Io(_)));
    assert!(!dest.path().join("books/Book 1.txt").exists());
}

#[tokio::test]
async fn test_long_title_is_harvested() {
    let server = MockServer::start().await;
    let title = "Сборник рассказов ".repeat(10);
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b5/"))
        .respond_with(html(detail_html("5", &title, "Автор")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shots/5.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let request = request(&server, dest.path(), 1, 1);
    let record = pipeline(&request).harvest("5").await.expect("Harvest failed");

    let file_name = record.text_path.strip_prefix("books/").unwrap();
    assert!(file_name.len() <= 255);
    assert!(file_name.ends_with(".txt"));
    assert!(dest.path().join(&record.text_path).is_file());
}
