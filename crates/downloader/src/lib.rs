mod errors;
pub mod ffmpeg;

use std::path::Path;

pub use errors::{DownloaderError, Result};
pub use ffmpeg::{mux_chapters, probe_duration, remux_to_mp4};
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// downloads a url into the given file with a single GET request.
pub async fn download_to_file(url: &str, output: &Path) -> Result<()> {
    let client = Client::new();
    download_with_client(&client, url, output).await
}

async fn download_with_client(client: &Client, url: &str, output: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| DownloaderError::Request {
            context: format!("requesting {url}"),
            source,
        })?;

    if !response.status().is_success() {
        return Err(DownloaderError::HttpStatus {
            context: format!("downloading {url}"),
            status: response.status(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| DownloaderError::Request {
            context: format!("reading the body of {url}"),
            source,
        })?;

    let mut file = File::create(output)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating {}", output.display()),
            source,
        })?;

    file.write_all(&bytes)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("writing {}", output.display()),
            source,
        })?;

    Ok(())
}
