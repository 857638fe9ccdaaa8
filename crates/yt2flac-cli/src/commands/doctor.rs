use anyhow::Result;
use tokio::process::Command;
use which::which;

pub async fn run() -> Result<()> {
    println!("yt2flac dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp: ");
    match which("yt-dlp") {
        Ok(path) => {
            let version = Command::new(&path).arg("--version").output().await;
            match version {
                Ok(out) => {
                    let v = String::from_utf8_lossy(&out.stdout);
                    println!("OK ({})", v.trim());
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("        Install with: pip install yt-dlp");
            all_ok = false;
        }
    }

    // Check ffmpeg
    print!("ffmpeg: ");
    match which("ffmpeg") {
        Ok(path) => {
            let version = Command::new(&path).args(["-version"]).output().await;
            match version {
                Ok(out) => {
                    let first_line = String::from_utf8_lossy(&out.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    let version_part = first_line.split_whitespace().nth(2).unwrap_or("unknown");
                    println!("OK ({})", version_part);
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("        Install it with your system package manager");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}
