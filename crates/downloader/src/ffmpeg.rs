//! process wrappers around ffmpeg and ffprobe.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{DownloaderError, Result};

/// probes the container duration of a media file, in seconds.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|source| DownloaderError::Launch {
            program: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(DownloaderError::ProcessStatus {
            program: "ffprobe",
            status: output.status,
        });
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(text: &str) -> Result<f64> {
    let value = text.trim();
    value
        .parse::<f64>()
        .map_err(|_| DownloaderError::InvalidDuration {
            value: value.to_string(),
        })
}

/// remuxes a remote stream into a local mp4 container without re-encoding.
pub async fn remux_to_mp4(source_url: &str, output: &Path) -> Result<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y")
        .arg("-i")
        .arg(source_url)
        .args(["-c", "copy", "-f", "mp4"])
        .arg(output);
    run_quiet(cmd).await
}

/// copies a video into a new file with the chapter metadata attached.
pub async fn mux_chapters(video: &Path, chapters: &Path, output: &Path) -> Result<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y")
        .arg("-i")
        .arg(video)
        .arg("-i")
        .arg(chapters)
        .args(["-map_metadata", "1", "-c", "copy"])
        .arg(output);
    run_quiet(cmd).await
}

async fn run_quiet(mut cmd: Command) -> Result<()> {
    debug!(command = ?cmd.as_std(), "running ffmpeg");

    let status = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|source| DownloaderError::Launch {
            program: "ffmpeg",
            source,
        })?;

    if !status.success() {
        return Err(DownloaderError::ProcessStatus {
            program: "ffmpeg",
            status,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_duration;

    #[test]
    fn parses_a_decimal_duration() {
        assert_eq!(parse_duration("1450.372000\n").unwrap(), 1450.372);
    }

    #[test]
    fn parses_an_integer_duration() {
        assert_eq!(parse_duration("90").unwrap(), 90.0);
    }

    #[test]
    fn rejects_garbage_output() {
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("").is_err());
    }
}
