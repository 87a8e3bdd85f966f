//! Integration tests for the dump pipeline
//!
//! These tests use wiremock to stand in for the Solr core and check the
//! dump file end-to-end.

use serde_json::{json, Value};
use solr2cdr::config::{load_config, Config, DumpConfig, ImportConfig, SolrConfig, TransformOverrides};
use solr2cdr::dump::{run_dump, Dumper};
use solr2cdr::transform::{TransformConfig, Transformer};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock core
fn create_test_config(solr_url: &str, dump_path: &Path, rows: u64) -> Config {
    Config {
        solr: SolrConfig {
            url: solr_url.to_string(),
            query: "*:*".to_string(),
            fl: Some("*".to_string()),
            start: 0,
            rows,
            limit: None,
        },
        import: ImportConfig { log_delay: 2000 },
        dump: DumpConfig {
            filename: dump_path.display().to_string(),
        },
        transform: TransformOverrides::default(),
    }
}

/// Mounts one page of the main query at `start`
async fn mount_page(server: &MockServer, start: u64, num_found: u64, docs: Value) {
    Mock::given(method("GET"))
        .and(path("/solr/core/select"))
        .and(query_param("q", "*:*"))
        .and(query_param("fl", "*"))
        .and(query_param("start", start.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseHeader": { "status": 0 },
            "response": { "numFound": num_found, "start": start, "docs": docs }
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn read_lines(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .expect("Failed to read dump file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line is not a JSON object"))
        .collect()
}

#[tokio::test]
async fn test_two_pages_end_to_end() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());

    mount_page(
        &server,
        0,
        2,
        json!([{ "id": "file:/dump/aa/HASH_A", "parent_id": "file:/dump/PARENT" }]),
    )
    .await;
    mount_page(
        &server,
        1,
        2,
        json!([{ "id": "file:/dump/bb/HASH_B", "parent_id": "file:/dump/PARENT" }]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("dump-1.json");

    let mut config = create_test_config(&base_url, &dump_path, 1);
    let mut additions = serde_json::Map::new();
    additions.insert("team".to_string(), json!("X"));
    config.transform.additions = Some(additions);

    let before = chrono::Utc::now().timestamp_millis();
    let stats = run_dump(config).await.expect("Dump failed");
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(stats.documents, 2);
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.timestamps_skipped, 0);

    let lines = read_lines(&dump_path);
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line["team"], "X");
        assert_eq!(line["_id"], line["obj_id"]);
        assert_eq!(line["obj_parent"], "PARENT");
        let imported_at = line["imported_at"].as_i64().expect("imported_at missing");
        assert!(imported_at >= before && imported_at <= after);
        let timestamp = line["timestamp"].as_i64().expect("timestamp missing");
        assert!(timestamp >= before && timestamp <= after);
    }
    assert_eq!(lines[0]["_id"], "HASH_A");
    assert_eq!(lines[1]["_id"], "HASH_B");
}

#[tokio::test]
async fn test_content_inlining_and_parent_lookup() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());

    let content_dir = TempDir::new().unwrap();
    let text_path = content_dir.path().join("x.txt");
    std::fs::write(&text_path, "hello").unwrap();
    let text_id = format!("file:{}", text_path.display());

    mount_page(
        &server,
        0,
        1,
        json!([{
            "id": text_id,
            "contentType": "text/plain",
            "lastModified": "not-a-date",
            "title_s_md": "greeting",
            "outlinks": ["http://example.com/"]
        }]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/solr/core/select"))
        .and(query_param("q", format!("outpaths:\"{}\"", text_id)))
        .and(query_param("rows", "3"))
        .and(query_param("fl", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "numFound": 2, "docs": [
                { "id": text_id },
                { "id": "file:/dump/archive.zip" }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dump_dir = TempDir::new().unwrap();
    let dump_path = dump_dir.path().join("dump.json");
    let config = create_test_config(&base_url, &dump_path, 10);

    let transformer = Transformer::new(TransformConfig::default()).unwrap();
    let mut dumper = Dumper::new(config).unwrap();
    let count = dumper
        .dump(|doc| transformer.transform(doc))
        .await
        .expect("Dump failed");
    assert_eq!(count, 1);

    let lines = read_lines(&dump_path);
    let doc = &lines[0];
    assert_eq!(doc["raw_content"], "hello");
    assert_eq!(doc["obj_id"], "x.txt");
    assert_eq!(doc["obj_parent"], "archive.zip");
    assert_eq!(doc["content_type"], "text/plain");
    assert_eq!(doc["obj_outlinks"], json!(["http://example.com/"]));
    assert!(doc.get("timestamp").is_none());
    assert_eq!(doc["extracted_metadata"]["title"], "greeting");
    assert_eq!(doc["extracted_metadata"]["edr_id"], text_id.as_str());
    assert_eq!(doc["team"], "NASA_JPL");

    assert_eq!(dumper.statistics().parents_resolved, 1);
    assert_eq!(dumper.statistics().content_inlined, 1);
    assert_eq!(dumper.statistics().timestamps_skipped, 1);
}

#[tokio::test]
async fn test_server_error_truncates_output() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());

    mount_page(
        &server,
        0,
        4,
        json!([
            { "id": "file:/d/a", "parent_id": null },
            { "id": "file:/d/b", "parent_id": null }
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/solr/core/select"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("dump.json");
    let stats = run_dump(create_test_config(&base_url, &dump_path, 2))
        .await
        .expect("Truncated dump should still succeed");

    assert_eq!(stats.documents, 2);
    assert_eq!(stats.total_matches, Some(4));
    assert_eq!(read_lines(&dump_path).len(), 2);
}

#[tokio::test]
async fn test_existing_dump_is_recreated() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());
    mount_page(
        &server,
        0,
        1,
        json!([{ "id": "file:/d/only", "parent_id": null }]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("dump.json");
    std::fs::write(&dump_path, "{\"stale\":1}\n{\"stale\":2}\n").unwrap();

    run_dump(create_test_config(&base_url, &dump_path, 10))
        .await
        .expect("Dump failed");

    let lines = read_lines(&dump_path);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["_id"], "only");
}

#[tokio::test]
async fn test_malformed_response_aborts() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{'response': eval('boom')}"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("dump.json");
    let result = run_dump(create_test_config(&base_url, &dump_path, 10)).await;

    assert!(matches!(result, Err(solr2cdr::DumpError::Search(_))));
    // The file was created before the failure and is left empty and closed.
    assert_eq!(std::fs::read_to_string(&dump_path).unwrap(), "");
}

#[tokio::test]
async fn test_dump_from_config_file() {
    let server = MockServer::start().await;
    let base_url = format!("{}/solr/core", server.uri());

    Mock::given(method("GET"))
        .and(path("/solr/core/select"))
        .and(query_param("q", "type:image"))
        .and(query_param("start", "5"))
        .and(query_param("rows", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "numFound": 7, "docs": [
                { "id": "file:/data/x/IMG1", "parent_id": null, "_version_": 1 },
                { "id": "file:/data/x/IMG2", "parent_id": null, "_version_": 2 }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("images.json");
    let config_path = dir.path().join("dump.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[solr]
url = "{}"
query = "type:image"
start = 5
rows = 50

[import]
log_delay = 2000

[dump]
filename = "{}"

[transform]
removals = ["_version_"]
dump-path-prefix = "file:/data/"
mount-point-prefix = "http://images.example.com/"
"#,
            base_url,
            dump_path.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Config should load");
    let stats = run_dump(config).await.expect("Dump failed");
    assert_eq!(stats.documents, 2);

    let lines = read_lines(&dump_path);
    assert_eq!(lines[0]["obj_stored_url"], "http://images.example.com/x/IMG1");
    assert!(lines[0]["extracted_metadata"].get("_version_").is_none());
    assert_eq!(lines[1]["_id"], "IMG2");
}
