use std::time::Duration;
use tokio::sync::{mpsc, watch};
use voxlog_core::{AppConfig, ListenState, SessionState, UiCommand};
use voxlog_engine::{EngineRegistry, SpeechPlatform};
use voxlog_session::{FileLog, MemoryLog, SessionHost, SpeechSessionAdapter};

fn config() -> AppConfig {
    AppConfig::from_toml_str(
        r#"
[recognition.scripted]
phrases = ["good morning", "open the pod bay doors", "thank you"]
interval_ms = 5
confidence = 0.5

[synthesis]
voice_load_delay_ms = 5

[[synthesis.voices]]
name = "A"
lang = "en-US"
default = true

[[synthesis.voices]]
name = "B"
lang = "fr-FR"
"#,
    )
    .unwrap()
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_scripted_session_logs_every_phrase_once() {
    let platform = SpeechPlatform::probe(&config(), &EngineRegistry::new()).unwrap();
    let log = MemoryLog::new(100);
    let lines = log.buffer();
    let mut adapter = SpeechSessionAdapter::new(platform, vec![Box::new(log)]);

    adapter.start_listening();
    wait_until(|| {
        adapter.drain_events();
        adapter.listen_state() == ListenState::Stopped
    })
    .await;

    let logged: Vec<String> = lines.lock().unwrap().iter().cloned().collect();
    assert_eq!(
        logged,
        vec![
            "Listening ...",
            "good morning (0.5)",
            "open the pod bay doors (0.5)",
            "thank you (0.5)",
            "((( I stopped listening )))",
        ]
    );
}

#[tokio::test]
async fn test_restart_right_after_stop_logs_the_new_session() {
    let platform = SpeechPlatform::probe(&config(), &EngineRegistry::new()).unwrap();
    let log = MemoryLog::new(100);
    let lines = log.buffer();
    let mut adapter = SpeechSessionAdapter::new(platform, vec![Box::new(log)]);

    adapter.start_listening();
    adapter.stop_listening();
    adapter.start_listening();
    assert_eq!(adapter.listen_state(), ListenState::Listening);

    wait_until(|| {
        adapter.drain_events();
        adapter.listen_state() == ListenState::Stopped
    })
    .await;

    let logged: Vec<String> = lines.lock().unwrap().iter().cloned().collect();
    assert_eq!(
        logged,
        vec![
            "Listening ...",
            "Listening ...",
            "good morning (0.5)",
            "open the pod bay doors (0.5)",
            "thank you (0.5)",
            "((( I stopped listening )))",
        ]
    );
}

#[tokio::test]
async fn test_lazy_voices_reach_the_ui_state() {
    let platform = SpeechPlatform::probe(&config(), &EngineRegistry::new()).unwrap();
    let adapter = SpeechSessionAdapter::new(platform, Vec::new());
    assert!(adapter.voices().is_empty());

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (state_tx, mut state_rx) = watch::channel(SessionState::default());
    let mut host = SessionHost::new(adapter, cmd_rx, state_tx);
    host.start();

    let state = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            state_rx.changed().await.unwrap();
            let state = state_rx.borrow_and_update().clone();
            if !state.voices.is_empty() {
                return state;
            }
        }
    })
    .await
    .expect("voices never arrived");

    assert_eq!(state.voices.len(), 2);
    assert_eq!(state.voices[0].label, "A (en-US) — DEFAULT");
    assert_eq!(state.voices[1].label, "B (fr-FR)");

    cmd_tx.send(UiCommand::Quit).unwrap();
    host.shutdown().await;
}

#[tokio::test]
async fn test_transcript_also_written_to_file() {
    let dir = std::env::temp_dir().join("voxlog_session_file_log");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("transcript.log");
    let _ = std::fs::remove_file(&path);

    let platform = SpeechPlatform::probe(&config(), &EngineRegistry::new()).unwrap();
    let file_log = FileLog::open(&path).unwrap();
    let mut adapter = SpeechSessionAdapter::new(platform, vec![Box::new(file_log)]);

    adapter.speak("hello file", 0, 1.0, 1.0);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "speaking: hello file\n");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_unsupported_platform_never_panics() {
    let config = AppConfig::from_toml_str(
        r#"
[recognition]
engine = "none"

[synthesis]
engine = "none"
"#,
    )
    .unwrap();
    let platform = SpeechPlatform::probe(&config, &EngineRegistry::new()).unwrap();
    let log = MemoryLog::new(10);
    let lines = log.buffer();
    let mut adapter = SpeechSessionAdapter::new(platform, vec![Box::new(log)]);

    adapter.start_listening();
    adapter.stop_listening();
    adapter.speak("Hello", 0, 1.0, 1.0);
    adapter.drain_events();

    assert_eq!(lines.lock().unwrap().len(), 2);
    assert!(adapter.current_notice().is_none());
}
