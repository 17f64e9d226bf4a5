use std::path::Path;

use owo_colors::OwoColorize;

use hianime::{
    Episode, HiAnimeBuilder, HiAnimeError, Language, MetadataResolver, Result, SourceMetadata,
};

use crate::args::Cli;
use crate::chapters;
use crate::logger::CliLogger;
use crate::subtitles;

/// downloads every missing episode of the requested series, in list order.
pub async fn run(cli: &Cli, logger: &CliLogger) -> Result<()> {
    let lang = cli.language.selector();
    let client = HiAnimeBuilder::new().build()?;

    let resolver = match &cli.metadata_script {
        Some(program) => MetadataResolver::script(program),
        None => MetadataResolver::api(client.clone()),
    };

    logger.info(format!(
        "fetching episode list for series {}",
        cli.series_id.yellow()
    ));
    let episodes = client.fetch_episode_list(cli.series_id, lang).await?;
    logger.info(format!("found {} episodes", episodes.len().yellow()));

    for episode in &episodes {
        download_episode(episode, cli, lang, &resolver, logger).await?;
    }

    Ok(())
}

async fn download_episode(
    episode: &Episode,
    cli: &Cli,
    lang: Language,
    resolver: &MetadataResolver,
    logger: &CliLogger,
) -> Result<()> {
    let basename = episode.basename();
    let final_path = cli.dir.join(format!("{basename}.mp4"));

    if final_path.exists() {
        logger.info(format!(
            "skipping \"{}\" (already downloaded)",
            basename.yellow()
        ));
        return Ok(());
    }
    logger.info(format!("downloading \"{}\"", basename.yellow()));

    let metadata = resolver.resolve(cli.series_id, episode.id, lang).await?;

    subtitles::fetch_subtitles(&metadata.tracks, &basename, &cli.dir, logger).await?;

    if metadata.encrypted {
        logger.warn("video streams are encrypted, decryption is not supported");
        return Ok(());
    }

    if metadata.sources.len() != 1 {
        logger.warn(format!(
            "expected exactly one video source, got {}",
            metadata.sources.len()
        ));
    }
    let source = metadata
        .sources
        .first()
        .ok_or_else(|| HiAnimeError::Message("metadata carries no video sources".to_string()))?;

    let part_path = cli.dir.join(format!("{basename}.mp4.part"));
    hianime_downloader::remux_to_mp4(&source.file, &part_path)
        .await
        .map_err(|err| HiAnimeError::Message(format!("video download failed: {err}")))?;

    let sidecar_path = cli.dir.join(format!("{basename}.chapters"));
    write_chapter_sidecar(&metadata, &part_path, &sidecar_path, logger).await?;

    hianime_downloader::mux_chapters(&part_path, &sidecar_path, &final_path)
        .await
        .map_err(|err| HiAnimeError::Message(format!("chapter mux failed: {err}")))?;

    remove_file(&part_path).await?;
    remove_file(&sidecar_path).await?;

    logger.info(format!("finished \"{}\"", basename.yellow()));
    Ok(())
}

async fn write_chapter_sidecar(
    metadata: &SourceMetadata,
    video: &Path,
    sidecar: &Path,
    logger: &CliLogger,
) -> Result<()> {
    if !chapters::timestamps_consistent(metadata.intro, metadata.outro) {
        logger.warn("inconsistent intro and outro timestamps");
    }

    let duration_secs = hianime_downloader::probe_duration(video)
        .await
        .map_err(|err| HiAnimeError::Message(format!("duration probe failed: {err}")))?;
    let duration_ms = (duration_secs * 1000.0) as i64;

    let chapter_list = chapters::derive_chapters(metadata.intro, metadata.outro, duration_ms);
    logger.debug("chapters", format!("derived {} chapters", chapter_list.len()));

    tokio::fs::write(sidecar, chapters::render_ffmetadata(&chapter_list))
        .await
        .map_err(|err| {
            HiAnimeError::Message(format!("failed to write {}: {err}", sidecar.display()))
        })
}

async fn remove_file(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path).await.map_err(|err| {
        HiAnimeError::Message(format!("failed to remove {}: {err}", path.display()))
    })
}
