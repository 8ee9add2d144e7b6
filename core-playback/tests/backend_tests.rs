//! Backend fallback order and per-backend behavior.

mod common;

use bridge_traits::TimerHost;
use common::{wav_response, FakeGraphHost, FakeMediaHost, Harness};
use core_playback::{BackendKind, PlayOutcome, PlaybackConfig, PlaybackError, PlaybackState};

fn started_backend(outcome: &PlayOutcome) -> Option<BackendKind> {
    match outcome {
        PlayOutcome::Started { backend, .. } => Some(*backend),
        _ => None,
    }
}

#[tokio::test]
async fn test_decode_failure_falls_back_to_streaming_element() {
    let harness = Harness::new(FakeGraphHost::failing(), FakeMediaHost::new(10.0));
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();

    let outcome = manager.play("hello").await;
    assert_eq!(started_backend(&outcome), Some(BackendKind::StreamingElement));

    assert_eq!(harness.graphs.log.lock().created, 1);
    assert_eq!(harness.graphs.open_graphs(), 0);
    let sources = harness.media.state.lock().sources.clone();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].starts_with("blob:"));
}

#[tokio::test]
async fn test_blocked_blob_url_falls_back_to_data_url() {
    let harness = Harness::new(
        FakeGraphHost::failing(),
        FakeMediaHost::new(10.0).blocking_blob_urls(),
    );
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();

    let outcome = manager.play("hello").await;
    assert_eq!(started_backend(&outcome), Some(BackendKind::EncodedDataUrl));

    let sources = harness.media.state.lock().sources.clone();
    assert_eq!(sources.len(), 2);
    assert!(sources[1].starts_with("data:audio/wav;base64,UklGR"));
    // The element that failed on the blob URL was released.
    assert_eq!(harness.media.live_elements(), 1);
}

#[tokio::test]
async fn test_all_backends_failing_reports_unavailable() {
    let harness = Harness::new(
        FakeGraphHost::failing(),
        FakeMediaHost::new(10.0).rejecting_play(),
    );
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();

    let outcome = manager.play("hello").await;
    let PlayOutcome::Failed(PlaybackError::PlaybackUnavailable(details)) = outcome else {
        panic!("expected PlaybackUnavailable, got {outcome:?}");
    };
    assert!(details.contains("decoded-buffer"));
    assert!(details.contains("streaming-element"));
    assert!(details.contains("encoded-data-url"));

    assert_eq!(manager.state(), PlaybackState::Idle);
    assert_eq!(harness.media.live_elements(), 0);
    assert_eq!(harness.graphs.open_graphs(), 0);
    assert_eq!(harness.timers.active_timers(), 0);
    let (message, _) = harness.notifications.last().unwrap();
    assert_eq!(message, "Audio playback is not available on this page.");
}

#[tokio::test]
async fn test_autoplay_rejection_on_graph_falls_through() {
    let graphs = FakeGraphHost::decoding(10.0);
    *graphs.reject_resume.lock() = true;
    let harness = Harness::new(graphs, FakeMediaHost::new(10.0));
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();

    let outcome = manager.play("hello").await;
    assert_eq!(started_backend(&outcome), Some(BackendKind::StreamingElement));
    assert_eq!(harness.graphs.open_graphs(), 0);
}

#[tokio::test]
async fn test_configured_order_is_respected() {
    let harness = Harness::decoded();
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager_with(
        PlaybackConfig::default().with_backend_order(vec![BackendKind::EncodedDataUrl]),
    );

    let outcome = manager.play("hello").await;
    assert_eq!(started_backend(&outcome), Some(BackendKind::EncodedDataUrl));
    assert_eq!(harness.graphs.log.lock().created, 0);
}

#[tokio::test]
async fn test_element_position_is_read_natively() {
    let harness = Harness::new(FakeGraphHost::failing(), FakeMediaHost::new(10.0));
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();
    assert!(manager.play("hello").await.is_started());

    harness.media.state.lock().current_time = 4.25;
    harness.tick(100.0);
    assert_eq!(manager.snapshot().unwrap().position_secs, 4.25);

    assert_eq!(manager.seek_to_fraction(0.6).await, Some(6.0));
    assert_eq!(harness.media.state.lock().current_time, 6.0);
    assert!(harness.media.state.lock().playing);

    manager.set_volume(0.25);
    assert_eq!(harness.media.state.lock().volume, 0.25);

    harness.media.state.lock().ended = true;
    harness.tick(100.0);
    assert_eq!(manager.state(), PlaybackState::Ended);
    assert_eq!(harness.media.live_elements(), 0);
    assert_eq!(harness.timers.active_timers(), 0);
}

#[tokio::test]
async fn test_element_error_mid_playback_resets_to_idle() {
    let harness = Harness::new(FakeGraphHost::failing(), FakeMediaHost::new(10.0));
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();
    assert!(manager.play("hello").await.is_started());

    harness.media.state.lock().error = Some("MEDIA_ERR_NETWORK".to_string());
    harness.tick(100.0);

    assert_eq!(manager.state(), PlaybackState::Idle);
    let (message, _) = harness.notifications.last().unwrap();
    assert!(message.contains("MEDIA_ERR_NETWORK"));
}

#[tokio::test]
async fn test_element_pause_and_resume_keep_position() {
    let harness = Harness::new(FakeGraphHost::failing(), FakeMediaHost::new(10.0));
    harness.http.respond(wav_response(10.0));
    let manager = harness.manager();
    assert!(manager.play("hello").await.is_started());
    assert!(harness.media.state.lock().playing);

    harness.media.state.lock().current_time = 3.5;
    assert!(manager.pause());
    assert_eq!(manager.state(), PlaybackState::Paused);
    assert!(!harness.media.state.lock().playing);
    assert_eq!(manager.snapshot().unwrap().position_secs, 3.5);

    // The element's clock is frozen while paused; ticks must not finish it.
    harness.tick(5000.0);
    assert_eq!(manager.state(), PlaybackState::Paused);
    assert_eq!(manager.snapshot().unwrap().position_secs, 3.5);

    assert!(manager.resume().await);
    assert_eq!(manager.state(), PlaybackState::Playing);
    assert!(harness.media.state.lock().playing);
    assert_eq!(harness.media.state.lock().current_time, 3.5);
    assert_eq!(harness.media.state.lock().sources.len(), 1);
    assert_eq!(harness.media.live_elements(), 1);
}

#[tokio::test]
async fn test_stale_decode_does_not_try_later_strategies() {
    let harness = Harness::decoded();
    harness.http.respond(wav_response(10.0));
    let gate = harness.graphs.gate_next_decode();
    *harness.graphs.duration.lock() = None;
    let manager = harness.manager();

    let play = manager.play("hello");
    let stop = async {
        tokio::task::yield_now().await;
        assert!(manager.stop());
        gate.notify_one();
    };
    let (outcome, ()) = tokio::join!(play, stop);

    assert!(matches!(outcome, PlayOutcome::Superseded));
    assert_eq!(harness.media.state.lock().created, 0);
    assert_eq!(harness.graphs.open_graphs(), 0);
    assert_eq!(harness.notifications.count(), 0);
}
