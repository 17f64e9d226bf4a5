use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use hianime::Language;

/// Download hianime episodes with chapter markers and subtitles
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Numeric series id from the hianime catalogue
    pub series_id: u32,

    /// Audio language to download
    #[arg(value_enum)]
    pub language: AudioLanguage,

    /// External program resolving episode metadata instead of the site api
    pub metadata_script: Option<PathBuf>,

    /// Directory receiving the downloaded files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioLanguage {
    /// English dubbed audio
    Eng,
    /// Japanese audio with subtitles
    Jap,
}

impl AudioLanguage {
    pub fn selector(self) -> Language {
        match self {
            Self::Eng => Language::Dub,
            Self::Jap => Language::Sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_positional_arguments() {
        let cli = Cli::try_parse_from(["hianime", "18056", "jap"]).expect("args should parse");
        assert_eq!(cli.series_id, 18056);
        assert_eq!(cli.language, AudioLanguage::Jap);
        assert!(cli.metadata_script.is_none());
        assert_eq!(cli.dir, PathBuf::from("."));
    }

    #[test]
    fn accepts_an_optional_metadata_script() {
        let cli = Cli::try_parse_from(["hianime", "431", "eng", "./metadata.js"])
            .expect("args should parse");
        assert_eq!(cli.language, AudioLanguage::Eng);
        assert_eq!(cli.metadata_script, Some(PathBuf::from("./metadata.js")));
    }

    #[test]
    fn rejects_unknown_language_tokens() {
        assert!(Cli::try_parse_from(["hianime", "431", "ger"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_series_ids() {
        assert!(Cli::try_parse_from(["hianime", "steins-gate", "jap"]).is_err());
    }

    #[test]
    fn language_tokens_map_to_site_selectors() {
        assert_eq!(AudioLanguage::Eng.selector(), Language::Dub);
        assert_eq!(AudioLanguage::Jap.selector(), Language::Sub);
    }
}
