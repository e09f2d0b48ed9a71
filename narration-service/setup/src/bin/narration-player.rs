use std::env;
use std::fs;

use anyhow::{bail, Context};
use narration_application::parse_server_timings;
use narration_configuration::{load_config, setup_logging};
use narration_setup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (text_path, audio_path, timings_path) = match args.as_slice() {
        [text, audio] => (text, audio, None),
        [text, audio, timings] => (text, audio, Some(timings)),
        _ => bail!("usage: narration-player <text-file> <wav-file> [timings.json]"),
    };

    let config = load_config()?;
    setup_logging(&config.logging);

    let text = fs::read_to_string(text_path)
        .with_context(|| format!("failed to read text from {text_path}"))?;
    let audio =
        fs::read(audio_path).with_context(|| format!("failed to read audio from {audio_path}"))?;
    let timings = match timings_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read timings from {path}"))?;
            Some(parse_server_timings(&raw)?)
        }
        None => None,
    };

    let app = Application::new(config);
    let report = app.narrate(text, audio, timings).await?;
    tracing::info!(
        tokens = report.token_count,
        highlights = report.highlights.len(),
        "narration report ready"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
