use std::path::Path;

use hianime::{HiAnimeError, Result, SubtitleTrack};
use hianime_downloader::download_to_file;

use crate::logger::CliLogger;

/// downloads every caption track next to the episode's video file.
///
/// thumbnail tracks are ignored; tracks of any other kind are reported and
/// skipped.
pub async fn fetch_subtitles(
    tracks: &[SubtitleTrack],
    basename: &str,
    dir: &Path,
    logger: &CliLogger,
) -> Result<()> {
    for track in tracks {
        match track.kind.as_str() {
            "thumbnails" => {}
            "captions" => {
                let (Some(lang), Some(ext)) = (track.language_code(), track.file_extension())
                else {
                    logger.warn(format!(
                        "skipping caption track with no usable label or url: {}",
                        track.file
                    ));
                    continue;
                };

                let target = dir.join(format!("{basename}.{lang}.{ext}"));
                logger.debug("subtitles", format!("writing {}", target.display()));

                download_to_file(&track.file, &target)
                    .await
                    .map_err(|err| {
                        HiAnimeError::Message(format!(
                            "failed to download subtitle {}: {err}",
                            track.file
                        ))
                    })?;
            }
            other => logger.warn(format!("unknown track kind \"{other}\"")),
        }
    }

    Ok(())
}
