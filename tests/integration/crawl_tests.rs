//! Integration tests for the crawler
//!
//! These tests use wiremock to serve synthetic detail-page chains and run
//! the full fetch, extract and persist cycle end-to-end against a
//! temporary SQLite database.

use bizreg::config::{Config, RecordLimit};
use bizreg::crawler::Crawler;
use bizreg::state::StopReason;
use bizreg::storage::{SqliteStorage, Storage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(
    server: &MockServer,
    start_path: &str,
    limit: RecordLimit,
    db: &Path,
) -> Config {
    let mut config = Config::with_start_url(format!("{}{}", server.uri(), start_path));
    config.crawler.record_limit = limit;
    config.crawler.request_delay = 0;
    config.crawler.base_origin = server.uri();
    config.output.database_path = db.to_string_lossy().into_owned();
    config
}

/// Builds a detail page with the usual registry sections
fn detail_page(name: &str, next_href: Option<&str>) -> String {
    let next = next_href
        .map(|href| format!(r#"<a title="Next On List" href="{}">Next On List</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><body>
        <div class="searchResultDetail">
            <div class="detailSection corporationName">
                <p>Florida Limited Liability Company</p>
                <p>{name}</p>
            </div>
            <div class="detailSection filingInformation">
                <span>Filing Information</span>
                <span>
                    <div>
                        <label>Document Number</label>
                        <span>L23000000001</span>
                        <label>Status</label>
                        <span>ACTIVE</span>
                    </div>
                </span>
            </div>
            <div class="detailSection">
                <span>Principal Address</span>
                <span>
                    <div>
                        100 MAIN ST<br/>
                        TAMPA, FL 33602
                    </div>
                </span>
            </div>
            <div class="detailSection">
                <span>Annual Reports</span>
                <table>
                    <tr><td>Report Year</td><td>Filed Date</td></tr>
                    <tr><td>2022</td><td>01/05/2022</td></tr>
                    <tr><td>2023</td><td>02/06/2023</td></tr>
                    <tr><td>2024</td><td>03/07/2024</td></tr>
                </table>
            </div>
            <div class="navigationBar">{next}</div>
        </div>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts `count` pages at /detail/1 .. /detail/N, each linking to the next
async fn mount_chain(server: &MockServer, count: usize) {
    for i in 1..=count {
        let next = (i < count).then(|| format!("/detail/{}", i + 1));
        mount_page(
            server,
            &format!("/detail/{}", i),
            detail_page(&format!("BUSINESS {} LLC", i), next.as_deref()),
        )
        .await;
    }
}

fn assert_integrity(storage: &SqliteStorage, expected: u32) {
    assert_eq!(storage.count_businesses().unwrap(), u64::from(expected));
    assert_eq!(storage.count_orphans().unwrap(), 0);
    for business in storage.list_businesses().unwrap() {
        assert_eq!(storage.get_filing_details(business.id).unwrap().len(), 2);
        assert_eq!(storage.get_annual_reports(business.id).unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_no_next_link_stops_after_one_record() {
    let server = MockServer::start().await;
    mount_page(&server, "/only", detail_page("SOLO LLC", None)).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/only", RecordLimit::Max(50), &db);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 1);
    assert_eq!(outcome.stop_reason, StopReason::NoNextLink);

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 1);

    let business = &storage.list_businesses().unwrap()[0];
    assert_eq!(business.name, "SOLO LLC");
    assert_eq!(business.status, "ACTIVE");
    assert_eq!(business.principal_address, "100 MAIN ST TAMPA, FL 33602");
}

#[tokio::test]
async fn test_limit_enforced_on_infinite_chain() {
    let server = MockServer::start().await;
    // The page links to itself forever
    mount_page(&server, "/loop", detail_page("LOOP LLC", Some("/loop"))).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/loop", RecordLimit::Max(3), &db);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 3);
    assert_eq!(outcome.stop_reason, StopReason::LimitReached);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 3);
}

#[tokio::test]
async fn test_unlimited_follows_whole_chain() {
    let server = MockServer::start().await;
    mount_chain(&server, 4).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/detail/1", RecordLimit::Unlimited, &db);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 4);
    assert_eq!(outcome.stop_reason, StopReason::NoNextLink);

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 4);

    let names: Vec<_> = storage
        .list_businesses()
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(
        names,
        vec!["BUSINESS 1 LLC", "BUSINESS 2 LLC", "BUSINESS 3 LLC", "BUSINESS 4 LLC"]
    );
}

#[tokio::test]
async fn test_transport_failure_keeps_committed_rows() {
    let server = MockServer::start().await;
    mount_page(&server, "/detail/1", detail_page("FIRST LLC", Some("/detail/2"))).await;
    mount_page(&server, "/detail/2", detail_page("SECOND LLC", Some("/detail/3"))).await;
    Mock::given(method("GET"))
        .and(path("/detail/3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/detail/1", RecordLimit::Unlimited, &db);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 2);
    assert!(outcome.stop_reason.is_fatal());
    assert!(matches!(outcome.stop_reason, StopReason::Transport(_)));

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 2);
}

#[tokio::test]
async fn test_missing_name_container_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let broken = detail_page("IGNORED", Some("/detail/2")).replace("corporationName", "renamed");
    mount_page(&server, "/detail/1", broken).await;
    mount_page(&server, "/detail/2", detail_page("AFTER LLC", None)).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/detail/1", RecordLimit::Max(10), &db);

    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 2);
    assert_eq!(outcome.stop_reason, StopReason::NoNextLink);

    let storage = SqliteStorage::new(&db).unwrap();
    let businesses = storage.list_businesses().unwrap();
    assert_eq!(businesses[0].name, "N/A");
    assert_eq!(businesses[1].name, "AFTER LLC");
}

#[tokio::test]
async fn test_owners_section_used_when_principal_address_missing() {
    let server = MockServer::start().await;
    let owners_page = r#"<html><body>
        <div class="detailSection corporationName"><p>Trademark</p><p>KFC</p></div>
        <div class="detailSection">
            <span>Owners</span>
            <div>KFC CORPORATION<br/>LOUISVILLE, KY 40213</div>
        </div>
        <a title="Next On List" href="/bare">Next On List</a>
        </body></html>"#;
    mount_page(&server, "/owners", owners_page.to_string()).await;
    mount_page(
        &server,
        "/bare",
        r#"<html><body><div class="corporationName"><p>x</p><p>BARE LLC</p></div></body></html>"#
            .to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");
    let config = create_test_config(&server, "/owners", RecordLimit::Unlimited, &db);

    let outcome = Crawler::new(config).unwrap().run().await;
    assert_eq!(outcome.records_saved, 2);

    let storage = SqliteStorage::new(&db).unwrap();
    let businesses = storage.list_businesses().unwrap();
    assert_eq!(businesses[0].principal_address, "KFC CORPORATION LOUISVILLE, KY 40213");
    assert_eq!(businesses[0].status, "N/A");
    assert_eq!(businesses[1].principal_address, "N/A");
}

#[tokio::test]
async fn test_persistence_error_stops_crawl_and_rolls_back() {
    let server = MockServer::start().await;
    mount_page(&server, "/detail/1", detail_page("GOOD LLC", Some("/detail/2"))).await;
    mount_page(&server, "/detail/2", detail_page("BAD LLC", Some("/detail/3"))).await;
    mount_page(&server, "/detail/3", detail_page("NEVER LLC", None)).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");

    // Create the schema, then make the store reject the second record's children
    drop(SqliteStorage::new(&db).unwrap());
    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_bad BEFORE INSERT ON annual_reports
         WHEN (SELECT name FROM businesses WHERE id = NEW.business_id) = 'BAD LLC'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .unwrap();
    drop(conn);

    let config = create_test_config(&server, "/detail/1", RecordLimit::Unlimited, &db);
    let outcome = Crawler::new(config).unwrap().run().await;

    assert_eq!(outcome.records_saved, 1);
    assert!(matches!(outcome.stop_reason, StopReason::Persistence(_)));
    assert!(!outcome.is_success());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 1);
    assert_eq!(storage.count_filing_details().unwrap(), 2);
    assert_eq!(storage.list_businesses().unwrap()[0].name, "GOOD LLC");
}

#[tokio::test]
async fn test_rerun_appends_parallel_rows() {
    let server = MockServer::start().await;
    mount_chain(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("registry.db");

    for _ in 0..2 {
        let config = create_test_config(&server, "/detail/1", RecordLimit::Unlimited, &db);
        let outcome = Crawler::new(config).unwrap().run().await;
        assert_eq!(outcome.records_saved, 2);
    }

    let storage = SqliteStorage::new(&db).unwrap();
    assert_integrity(&storage, 4);
}
