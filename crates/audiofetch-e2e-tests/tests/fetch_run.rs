use assert_fs::TempDir;
use assert_fs::prelude::*;
use audiofetch_e2e_tests::{
    closed_port, entry_for, fake_audio, init_tracing, output_lines, start_audio_server,
    start_truncated_server, write_test_config,
};
use audiofetch_lib::cli::{Command, FetchParams, ResolvedCommand, resolve_command, run_fetch};
use audiofetch_lib::config::HttpConfig;
use audiofetch_lib::download::{EntryStatus, Fetcher};
use audiofetch_lib::{DownloadEntry, FetchError};
use predicates::prelude::*;

fn fetcher() -> Fetcher {
    Fetcher::new(&HttpConfig::default()).expect("Failed to build HTTP client")
}

#[tokio::test]
async fn test_all_entries_downloaded_with_reported_sizes() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    let output_dir = temp.child("assets/audio");

    let entries = vec![
        entry_for(addr, "audio", "west_end_blues.mp3"),
        entry_for(addr, "audio", "potato_head_blues.mp3"),
        entry_for(addr, "audio", "muskrat_ramble.mp3"),
    ];

    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, output_dir.path(), &mut out).await;

    let mut expected = Vec::new();
    for entry in &entries {
        let body = fake_audio(&entry.filename);
        expected.push(format!("Downloading {}...", entry.filename));
        expected.push(format!("Success: {} ({} bytes)", entry.filename, body.len()));

        let file = output_dir.child(&entry.filename);
        file.assert(predicate::path::is_file());
        assert_eq!(std::fs::read(file.path()).unwrap(), body);
        output_dir
            .child(format!("{}.part", entry.filename))
            .assert(predicate::path::missing());
    }
    assert_eq!(output_lines(&out), expected);

    assert!(outcomes.iter().all(|o| o.is_success()));
    for outcome in &outcomes {
        let on_disk = std::fs::metadata(output_dir.child(&outcome.filename).path())
            .unwrap()
            .len();
        assert_eq!(outcome.size(), Some(on_disk));
    }
}

#[tokio::test]
async fn test_failed_entry_does_not_affect_next_entry() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();

    let entries = vec![
        DownloadEntry::new(
            "a.mp3",
            format!("http://127.0.0.1:{}/audio/a.mp3", closed_port()),
        ),
        entry_for(addr, "audio", "b.mp3"),
    ];

    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    let lines = output_lines(&out);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Downloading a.mp3...");
    assert!(
        lines[1].starts_with("Error downloading a.mp3: request to http://127.0.0.1:"),
        "unexpected line: {}",
        lines[1]
    );
    assert_eq!(lines[2], "Downloading b.mp3...");
    assert_eq!(
        lines[3],
        format!("Success: b.mp3 ({} bytes)", fake_audio("b.mp3").len())
    );

    assert!(matches!(outcomes[0].error(), Some(FetchError::Request { .. })));
    assert!(outcomes[1].is_success());
    temp.child("a.mp3").assert(predicate::path::missing());
    temp.child("b.mp3").assert(predicate::path::is_file());
}

#[tokio::test]
async fn test_http_error_status_reported_without_file() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();

    let entries = vec![
        entry_for(addr, "audio", "missing.mp3"),
        entry_for(addr, "audio", "forbidden.mp3"),
    ];

    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    let lines = output_lines(&out);
    assert_eq!(
        lines[1],
        format!("Error downloading missing.mp3: HTTP Error 404 Not Found for {}", entries[0].url)
    );
    assert_eq!(
        lines[3],
        format!("Error downloading forbidden.mp3: HTTP Error 403 Forbidden for {}", entries[1].url)
    );
    assert!(outcomes.iter().all(|o| matches!(
        o.status,
        EntryStatus::Failed(FetchError::Status { .. })
    )));
    temp.child("missing.mp3").assert(predicate::path::missing());
    temp.child("forbidden.mp3").assert(predicate::path::missing());
}

#[tokio::test]
async fn test_rerun_overwrites_existing_file() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    let output_dir = temp.child("out");

    output_dir.create_dir_all().unwrap();
    output_dir.child("a.mp3").write_str("stale contents").unwrap();

    let entries = vec![entry_for(addr, "audio", "a.mp3")];
    let fetcher = fetcher();

    for _ in 0..2 {
        let mut out = Vec::new();
        let outcomes = fetcher.run(&entries, output_dir.path(), &mut out).await;
        assert!(outcomes[0].is_success(), "{:?}", outcomes[0]);
        assert_eq!(
            std::fs::read(output_dir.child("a.mp3").path()).unwrap(),
            fake_audio("a.mp3")
        );
    }
}

#[tokio::test]
async fn test_failed_download_keeps_previous_copy() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    temp.child("missing.mp3").write_str("previous").unwrap();

    let entries = vec![entry_for(addr, "audio", "missing.mp3")];
    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    assert!(!outcomes[0].is_success());
    temp.child("missing.mp3").assert("previous");
    temp.child("missing.mp3.part")
        .assert(predicate::path::missing());
}

#[tokio::test]
async fn test_truncated_body_removes_partial_and_keeps_previous_copy() {
    init_tracing();
    let addr = start_truncated_server(100_000, 5_000).await;
    let temp = TempDir::new().unwrap();
    temp.child("a.mp3").write_str("previous").unwrap();

    let entries = vec![DownloadEntry::new("a.mp3", format!("http://{addr}/a.mp3"))];
    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    assert!(
        matches!(outcomes[0].error(), Some(FetchError::Request { .. })),
        "{:?}",
        outcomes[0]
    );
    let lines = output_lines(&out);
    assert_eq!(lines[0], "Downloading a.mp3...");
    assert!(
        lines[1].starts_with(&format!("Error downloading a.mp3: request to {} failed:", entries[0].url)),
        "unexpected line: {}",
        lines[1]
    );
    temp.child("a.mp3.part").assert(predicate::path::missing());
    temp.child("a.mp3").assert("previous");
}

#[tokio::test]
async fn test_unmovable_destination_reports_persist_error() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    // rename() cannot replace a non-empty directory with a file.
    temp.child("a.mp3").create_dir_all().unwrap();
    temp.child("a.mp3/keep").write_str("occupied").unwrap();

    let entries = vec![
        entry_for(addr, "audio", "a.mp3"),
        entry_for(addr, "audio", "b.mp3"),
    ];
    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    assert!(
        matches!(outcomes[0].error(), Some(FetchError::Persist { .. })),
        "{:?}",
        outcomes[0]
    );
    let lines = output_lines(&out);
    assert!(
        lines[1].starts_with("Error downloading a.mp3: could not move download into place at "),
        "unexpected line: {}",
        lines[1]
    );
    temp.child("a.mp3.part").assert(predicate::path::missing());
    temp.child("a.mp3/keep").assert("occupied");
    assert!(outcomes[1].is_success());
    temp.child("b.mp3").assert(predicate::path::is_file());
}

#[tokio::test]
async fn test_unwritable_partial_reports_write_error() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    temp.child("a.mp3").write_str("previous").unwrap();
    temp.child("a.mp3.part").create_dir_all().unwrap();

    let entries = vec![entry_for(addr, "audio", "a.mp3")];
    let mut out = Vec::new();
    let outcomes = fetcher().run(&entries, temp.path(), &mut out).await;

    assert!(
        matches!(outcomes[0].error(), Some(FetchError::Write { .. })),
        "{:?}",
        outcomes[0]
    );
    let lines = output_lines(&out);
    assert!(
        lines[1].starts_with("Error downloading a.mp3: could not write "),
        "unexpected line: {}",
        lines[1]
    );
    temp.child("a.mp3").assert("previous");
}

#[tokio::test]
async fn test_output_directory_created_when_absent() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();
    let nested = temp.child("deeply/nested/audio");
    nested.assert(predicate::path::missing());

    let mut out = Vec::new();
    let outcomes = fetcher()
        .run(&[entry_for(addr, "audio", "a.mp3")], nested.path(), &mut out)
        .await;

    assert!(outcomes[0].is_success());
    nested.assert(predicate::path::is_dir());
    nested.child("a.mp3").assert(predicate::path::is_file());
}

#[tokio::test]
async fn test_empty_table_still_creates_directory() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let output_dir = temp.child("assets/audio");

    let mut out = Vec::new();
    let outcomes = fetcher().run(&[], output_dir.path(), &mut out).await;

    assert!(outcomes.is_empty());
    assert!(out.is_empty());
    output_dir.assert(predicate::path::is_dir());
}

#[tokio::test]
async fn test_redirects_are_followed() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();

    let mut out = Vec::new();
    let outcomes = fetcher()
        .run(&[entry_for(addr, "moved", "a.mp3")], temp.path(), &mut out)
        .await;

    assert!(outcomes[0].is_success(), "{:?}", outcomes[0]);
    assert_eq!(
        std::fs::read(temp.child("a.mp3").path()).unwrap(),
        fake_audio("a.mp3")
    );
}

#[tokio::test]
async fn test_configured_timeout_reports_slow_entry() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();

    let config_path = write_test_config(temp.path(), 1).unwrap();
    let ResolvedCommand::Fetch(resolved) = resolve_command(Command::Fetch {
        config_path: Some(config_path.to_string_lossy().into_owned()),
    })
    .expect("Failed to resolve fetch command");
    assert_eq!(resolved.http.timeout_secs, Some(1));

    let fetcher = Fetcher::new(&resolved.http).unwrap();
    let entries = vec![
        entry_for(addr, "slow", "a.mp3"),
        entry_for(addr, "audio", "b.mp3"),
    ];
    let output_dir = temp.child("out");
    let mut out = Vec::new();
    let outcomes = fetcher.run(&entries, output_dir.path(), &mut out).await;

    assert!(matches!(outcomes[0].error(), Some(FetchError::Request { .. })));
    assert!(outcomes[1].is_success());
    output_dir.child("a.mp3").assert(predicate::path::missing());
    output_dir.child("b.mp3").assert(predicate::path::is_file());
}

#[tokio::test]
async fn test_run_fetch_returns_outcomes_despite_failures() {
    init_tracing();
    let (addr, _handle) = start_audio_server().await;
    let temp = TempDir::new().unwrap();

    let params = FetchParams {
        entries: vec![
            entry_for(addr, "audio", "missing.mp3"),
            entry_for(addr, "audio", "a.mp3"),
        ],
        output_dir: temp.path().join("audio"),
        http: HttpConfig::default(),
    };

    let outcomes = run_fetch(params)
        .await
        .expect("Per-entry failures must not fail the run");
    tracing::info!(?outcomes, "run_fetch finished");

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].is_success());
    assert!(outcomes[1].is_success());
    temp.child("audio/a.mp3").assert(predicate::path::is_file());
}
