use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use yt2flac_core::config::Config;
use yt2flac_core::naming::human_size;
use yt2flac_core::pipeline::{Pipeline, PipelineConfig, PipelineStage};
use yt2flac_core::process::SystemRunner;

pub async fn run(
    url: Option<&str>,
    output: Option<&Path>,
    keep_temp: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    let url = match url {
        Some(url) => url.to_string(),
        None => prompt_for_url()?,
    };

    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output.directory.clone());

    let pipeline_config = PipelineConfig {
        url,
        output_dir,
        temp_parent: config.temp.directory.clone(),
        keep_temp,
        paths: config.paths.clone(),
    };

    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}",
        )?
        .progress_chars("=>-"),
    );

    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::Validating => {
                    pb.set_position(5);
                    pb.set_message("Validating URL...");
                }
                PipelineStage::CheckingDeps => {
                    pb.set_position(10);
                    pb.set_message("Checking dependencies...");
                }
                PipelineStage::Downloading => {
                    pb.set_position(20);
                    pb.set_message("Downloading audio...");
                }
                PipelineStage::Downloaded { title, uploader, duration, bytes } => {
                    pb.set_position(55);
                    pb.println(format!("Title:      {}", title));
                    if let Some(uploader) = uploader {
                        pb.println(format!("Uploader:   {}", uploader));
                    }
                    if let Some(duration) = duration {
                        let secs = duration.round() as u64;
                        pb.println(format!("Duration:   {}:{:02}", secs / 60, secs % 60));
                    }
                    pb.println(format!("Downloaded: {}", human_size(bytes)));
                }
                PipelineStage::Converting { title } => {
                    pb.set_position(60);
                    pb.set_message(format!("Converting: {}", truncate(&title, 40)));
                }
                PipelineStage::CleaningUp => {
                    pb.set_position(90);
                    pb.set_message("Cleaning up...");
                }
                PipelineStage::Complete { output, bytes, duration } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!(
                        "Done: {} ({}, {:.1}s)",
                        output.display(),
                        human_size(bytes),
                        duration.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    let pipeline = Pipeline::new(pipeline_config, Arc::new(SystemRunner), tx);
    let result = pipeline.run().await;

    progress_handle.await?;

    match result {
        Ok(conversion) => {
            println!("\nOutput: {}", conversion.flac_path.display());
            println!("Size:   {}", human_size(conversion.bytes));
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError: {}", e);
            Err(e.into())
        }
    }
}

fn prompt_for_url() -> Result<String> {
    print!("Paste the YouTube URL: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;

    let url = line.trim().to_string();
    if url.is_empty() {
        bail!("no URL provided");
    }
    Ok(url)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
