use thiserror::Error;

use hianime_core::MegacloudError;

pub type Result<T> = std::result::Result<T, HiAnimeError>;

#[derive(Debug, Error)]
pub enum HiAnimeError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("megacloud error: {0}")]
    Megacloud(#[from] MegacloudError),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode JSON while {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}\nresponse text:\n{body}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("episode entry has a missing or invalid {attr} attribute")]
    EpisodeAttr { attr: &'static str },

    #[error("no streaming server offers the {lang} language")]
    MissingServer { lang: &'static str },

    #[error("server entry has a missing or invalid data-id attribute")]
    ServerAttr,

    #[error("unable to extract an embed id from playback link {link}")]
    InvalidPlaybackLink { link: String },

    #[error("failed to launch metadata script {program}: {source}")]
    ScriptLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata script {program} exited with {status}")]
    ScriptStatus {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("metadata script {program} produced invalid JSON: {source}")]
    ScriptOutput {
        program: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Message(String),
}
