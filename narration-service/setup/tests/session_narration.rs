use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use narration_application::{parse_server_timings, ApplicationError};
use narration_configuration::{NarrationConfig, PlaybackConfig};
use narration_domain::PlaybackPhase;
use narration_setup::Application;

fn silent_wav(sample_rate: u32, frames: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).expect("writer opens");
        for _ in 0..frames {
            writer.write_sample(0i16).expect("sample written");
        }
        writer.finalize().expect("wav finalized");
    }
    cursor.into_inner()
}

#[tokio::test(start_paused = true)]
async fn narration_highlights_every_token_in_order() {
    let app = Application::new(NarrationConfig::default());
    let report = app
        .narrate(
            "Hello brave new world!".to_string(),
            silent_wav(16_000, 16_000),
            None,
        )
        .await
        .expect("narration completes");

    assert_eq!(report.duration_seconds, 1.0);
    assert_eq!(report.token_count, 4);
    let indexes: Vec<usize> = report.highlights.iter().map(|h| h.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
    assert_eq!(report.highlights[3].token, "world!");
    assert!(report.highlights.iter().all(|h| h.auto_scroll));
    assert!(report.highlights.iter().all(|h| !h.scrolled));

    let controller = app.controller();
    let controller = controller.lock().expect("controller lock");
    assert_eq!(controller.phase(), PlaybackPhase::Ended);
    assert_eq!(controller.snapshot().position_seconds, 1.0);
}

#[tokio::test(start_paused = true)]
async fn narration_follows_server_timings() {
    let app = Application::new(NarrationConfig::default());
    let timings = parse_server_timings(
        r#"[{"text":"Quick","time":0.0,"end":0.2},{"text":"check.","time":0.2,"end":0.5}]"#,
    )
    .expect("timings parse");
    let report = app
        .narrate(
            "Quick check.".to_string(),
            silent_wav(8_000, 4_000),
            Some(timings),
        )
        .await
        .expect("narration completes");

    assert_eq!(report.duration_seconds, 0.5);
    let tokens: Vec<&str> = report.highlights.iter().map(|h| h.token.as_str()).collect();
    assert_eq!(tokens, vec!["Quick", "check."]);
}

#[tokio::test(start_paused = true)]
async fn corrupt_audio_fails_and_app_recovers() {
    let app = Application::new(NarrationConfig::default());
    let err = app
        .narrate("Broken".to_string(), b"not audio".to_vec(), None)
        .await
        .expect_err("decode fails");
    assert!(matches!(
        err.downcast_ref::<ApplicationError>(),
        Some(ApplicationError::Load(_))
    ));
    assert!(err.to_string().contains("audio could not be loaded"));

    let report = app
        .narrate("Fine".to_string(), silent_wav(16_000, 8_000), None)
        .await
        .expect("retry succeeds");
    assert_eq!(report.token_count, 1);
}

#[tokio::test(start_paused = true)]
async fn long_transcript_scrolls_when_highlight_leaves_safe_band() {
    let config = NarrationConfig {
        playback: PlaybackConfig {
            viewport_height_px: 100.0,
            line_height_px: 20.0,
            tokens_per_line: 2,
            scroll_safe_margin_px: 20.0,
            ..PlaybackConfig::default()
        },
        ..NarrationConfig::default()
    };
    let app = Application::new(config);
    let text = vec!["word"; 20].join(" ");
    let report = app
        .narrate(text, silent_wav(16_000, 32_000), None)
        .await
        .expect("narration completes");

    let indexes: Vec<usize> = report.highlights.iter().map(|h| h.index).collect();
    assert_eq!(indexes, (0..20).collect::<Vec<_>>());

    let scrolled: Vec<usize> = report
        .highlights
        .iter()
        .filter(|h| h.scrolled)
        .map(|h| h.index)
        .collect();
    assert_eq!(scrolled, vec![8, 14]);
    assert_eq!(report.highlights[8].scroll_top_px, 60.0);
    assert_eq!(report.highlights[19].scroll_top_px, 120.0);
}

#[tokio::test(start_paused = true)]
async fn report_serializes_to_json() {
    let app = Application::new(NarrationConfig::default());
    let report = app
        .narrate("One two.".to_string(), silent_wav(8_000, 4_000), None)
        .await
        .expect("narration completes");

    let json: serde_json::Value = serde_json::to_value(&report).expect("report serializes");
    assert_eq!(json["token_count"], 2);
    assert_eq!(json["highlights"][0]["token"], "One");
    assert_eq!(json["highlights"][1]["scrolled"], false);
}
