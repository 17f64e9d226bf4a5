use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use hianime_core::SourceMetadata;

use crate::client::{HiAnimeClient, Language};
use crate::errors::{HiAnimeError, Result};

/// strategy producing the per-episode metadata document.
///
/// the direct strategy walks the site api and the embed provider; the script
/// strategy shells out to a user-supplied program, which is the escape hatch
/// for when the site changes or the streams need out-of-band decryption.
pub enum MetadataResolver {
    Api(HiAnimeClient),
    Script(ScriptResolver),
}

impl MetadataResolver {
    pub fn api(client: HiAnimeClient) -> Self {
        Self::Api(client)
    }

    pub fn script(program: impl Into<PathBuf>) -> Self {
        Self::Script(ScriptResolver::new(program))
    }

    pub async fn resolve(
        &self,
        series_id: u32,
        episode_id: u32,
        lang: Language,
    ) -> Result<SourceMetadata> {
        match self {
            Self::Api(client) => client.fetch_source_metadata(episode_id, lang).await,
            Self::Script(script) => script.resolve(series_id, episode_id, lang).await,
        }
    }
}

/// delegates metadata resolution to an external program.
///
/// the program receives `(series_id, episode_id, language)` as arguments and
/// must print a source metadata JSON document to stdout. its stderr is passed
/// through so the script can log freely.
pub struct ScriptResolver {
    program: PathBuf,
}

impl ScriptResolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    pub async fn resolve(
        &self,
        series_id: u32,
        episode_id: u32,
        lang: Language,
    ) -> Result<SourceMetadata> {
        info!(program = %self.program.display(), episode_id, "running metadata script");

        let output = Command::new(&self.program)
            .arg(series_id.to_string())
            .arg(episode_id.to_string())
            .arg(lang.as_str())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|source| HiAnimeError::ScriptLaunch {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(HiAnimeError::ScriptStatus {
                program: self.program_name(),
                status: output.status,
            });
        }

        debug!(bytes = output.stdout.len(), "metadata script finished");

        serde_json::from_slice(&output.stdout).map_err(|source| HiAnimeError::ScriptOutput {
            program: self.program_name(),
            source,
        })
    }
}
