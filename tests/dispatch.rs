use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use httpmock::prelude::*;
use jblastor::classifier::collect;
use jblastor::config::{Credentials, DispatchMode, TargetConfig};
use jblastor::dispatcher::{dispatch, DispatchReport, DispatchSummary, Outcome};
use jblastor::request::build_client;
use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

fn write_fixtures(count: usize) -> Result<(TempDir, Vec<PathBuf>)> {
    let temp = tempdir()?;
    let mut files = Vec::new();
    for idx in 0..count {
        let path = temp.path().join(format!("{idx:02}.json"));
        std::fs::write(&path, format!("{{\"id\":{idx}}}"))?;
        files.push(path);
    }
    Ok((temp, files))
}

fn target(server: &MockServer, mode: DispatchMode, concurrency: usize) -> TargetConfig {
    let mut config = TargetConfig::new(&server.url("/save")).unwrap();
    config.mode = mode;
    config.concurrency = concurrency;
    config
}

async fn run(files: &[PathBuf], config: &TargetConfig) -> (Vec<DispatchReport>, DispatchSummary) {
    let client = build_client(config).unwrap();
    let mut reports = Vec::new();
    let summary = dispatch(&client, files, config, |report| reports.push(report.clone())).await;
    (reports, summary)
}

#[tokio::test]
async fn sequential_mode_reports_in_file_order() -> Result<()> {
    let (_temp, files) = write_fixtures(3)?;
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(POST).path("/save").body("{\"id\":0}");
            then.status(200)
                .delay(Duration::from_millis(200))
                .body("first");
        })
        .await;
    let rest = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/save")
                .header("content-type", "application/json")
                .header("x-custom-header", "JBLASTOR");
            then.status(201).body("later");
        })
        .await;

    let config = target(&server, DispatchMode::Sequential, 4);
    let (reports, summary) = run(&files, &config).await;

    let order: Vec<PathBuf> = reports.iter().map(|r| r.file.clone()).collect();
    assert_eq!(order, files);
    assert_eq!(
        summary,
        DispatchSummary {
            total: 3,
            delivered: 3,
            skipped: 0,
        }
    );
    slow.assert_hits_async(1).await;
    rest.assert_hits_async(2).await;

    match &reports[0].outcome {
        Outcome::Delivered(record) => {
            assert_eq!(record.status, 200);
            assert_eq!(record.status_text, "200 OK");
            assert_eq!(record.body, b"first");
        }
        Outcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
    }
    Ok(())
}

#[tokio::test]
async fn concurrent_mode_drains_one_result_per_file() -> Result<()> {
    let (_temp, files) = write_fixtures(6)?;
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(200)
                .delay(Duration::from_millis(50))
                .body("ok");
        })
        .await;

    let config = target(&server, DispatchMode::Concurrent, 3);
    let (reports, summary) = run(&files, &config).await;

    let mut seen: Vec<PathBuf> = reports.iter().map(|r| r.file.clone()).collect();
    seen.sort();
    assert_eq!(seen, files);
    assert_eq!(summary.delivered, 6);
    mock.assert_hits_async(6).await;
    Ok(())
}

#[tokio::test]
async fn concurrent_mode_never_exceeds_the_limit() -> Result<()> {
    let (_temp, files) = write_fixtures(6)?;
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(200)
                .delay(Duration::from_millis(300))
                .body("ok");
        })
        .await;

    let config = target(&server, DispatchMode::Concurrent, 2);
    let started = Instant::now();
    let (_, summary) = run(&files, &config).await;
    let elapsed = started.elapsed();

    assert_eq!(summary.delivered, 6);
    // 6 files through 2 slots at 300ms each is at least 3 rounds.
    assert!(
        elapsed >= Duration::from_millis(900),
        "finished in {elapsed:?}"
    );
    Ok(())
}

#[tokio::test]
async fn concurrent_mode_with_single_slot_keeps_order() -> Result<()> {
    let (_temp, files) = write_fixtures(4)?;
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(200).body("ok");
        })
        .await;

    let config = target(&server, DispatchMode::Concurrent, 1);
    let (reports, _) = run(&files, &config).await;

    let order: Vec<PathBuf> = reports.iter().map(|r| r.file.clone()).collect();
    assert_eq!(order, files);
    Ok(())
}

#[tokio::test]
async fn missing_file_only_skips_itself() -> Result<()> {
    let (temp, mut files) = write_fixtures(2)?;
    files.insert(1, temp.path().join("vanished.json"));

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(200).body("ok");
        })
        .await;

    for mode in [DispatchMode::Sequential, DispatchMode::Concurrent] {
        let config = target(&server, mode, 2);
        let (reports, summary) = run(&files, &config).await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.skipped, 1);
        let skipped: Vec<&DispatchReport> = reports.iter().filter(|r| !r.is_delivered()).collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].file, temp.path().join("vanished.json"));
    }

    mock.assert_hits_async(4).await;
    Ok(())
}

#[tokio::test]
async fn http_error_status_is_still_delivered() -> Result<()> {
    let (_temp, files) = write_fixtures(1)?;
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(503).body("overloaded");
        })
        .await;

    let config = target(&server, DispatchMode::Sequential, 1);
    let (reports, _) = run(&files, &config).await;

    match &reports[0].outcome {
        Outcome::Delivered(record) => {
            assert_eq!(record.status, 503);
            assert_eq!(record.body, b"overloaded");
        }
        Outcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_skips_every_file() -> Result<()> {
    let (_temp, files) = write_fixtures(2)?;
    let mut config = TargetConfig::new("http://127.0.0.1:1/save")?;
    config.timeout = Duration::from_secs(2);

    let (reports, summary) = run(&files, &config).await;
    assert_eq!(summary.skipped, 2);
    assert!(reports.iter().all(|r| match &r.outcome {
        Outcome::Skipped(reason) => reason.contains("sending"),
        Outcome::Delivered(_) => false,
    }));
    Ok(())
}

#[tokio::test]
async fn credentials_add_basic_auth_to_every_request() -> Result<()> {
    let (_temp, files) = write_fixtures(3)?;
    let server = MockServer::start_async().await;
    let authed = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/save")
                .header("authorization", "Basic dXNlcjpwYXNz");
            then.status(200);
        })
        .await;

    let mut config = target(&server, DispatchMode::Concurrent, 2);
    config.credentials = Some(Credentials {
        user: "user".into(),
        password: "pass".into(),
    });
    let (_, summary) = run(&files, &config).await;

    assert_eq!(summary.delivered, 3);
    authed.assert_hits_async(3).await;
    Ok(())
}

#[tokio::test]
async fn no_credentials_means_no_authorization_header() -> Result<()> {
    let (_temp, files) = write_fixtures(2)?;
    let server = MockServer::start_async().await;
    let authed = server
        .mock_async(|when, then| {
            when.method(POST).path("/save").header_exists("authorization");
            then.status(200);
        })
        .await;
    let anonymous = server
        .mock_async(|when, then| {
            when.method(POST).path("/save");
            then.status(200);
        })
        .await;

    let config = target(&server, DispatchMode::Sequential, 1);
    run(&files, &config).await;

    authed.assert_hits_async(0).await;
    anonymous.assert_hits_async(2).await;
    Ok(())
}

#[tokio::test]
async fn classified_directory_feeds_dispatch() -> Result<()> {
    let temp = tempdir()?;
    std::fs::write(temp.path().join("a.json"), "{\"id\":\"a\"}")?;
    std::fs::write(temp.path().join("b.json"), "{\"id\":")?;
    std::fs::write(temp.path().join("c.txt"), "{\"id\":\"c\"}")?;

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/save").body("{\"id\":\"a\"}");
            then.status(200);
        })
        .await;

    let files = collect(temp.path())?;
    assert_eq!(files, vec![temp.path().join("a.json")]);

    let config = target(&server, DispatchMode::Sequential, 1);
    let (_, summary) = run(&files, &config).await;
    assert_eq!(summary.delivered, 1);
    mock.assert_hits_async(1).await;
    Ok(())
}
