use anyhow::Result;
use std::path::Path;
use yt2flac_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("yt2flac configuration\n");

    println!("[paths]");
    if let Some(ref p) = config.paths.yt_dlp {
        println!("  yt_dlp = {:?}", p);
    } else {
        println!("  yt_dlp = (auto-detect)");
    }
    if let Some(ref p) = config.paths.ffmpeg {
        println!("  ffmpeg = {:?}", p);
    } else {
        println!("  ffmpeg = (auto-detect)");
    }

    println!("\n[output]");
    println!("  directory = {:?}", config.output.directory);

    println!("\n[temp]");
    if let Some(ref d) = config.temp.directory {
        println!("  directory = {:?}", d);
    } else {
        println!("  directory = (system temp)");
    }

    println!("\nConfig file locations (in priority order):");
    if let Some(p) = config_path {
        println!("  1. {} (specified)", p.display());
    }
    if let Some(config_dir) = dirs::config_dir() {
        println!("  2. {}/yt2flac/config.toml", config_dir.display());
    }
    println!("  3. Environment variables (YT2FLAC_*)");

    Ok(())
}
