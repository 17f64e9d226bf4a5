use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Client as ReqwestClient, Url};
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info};

use hianime_core::{MegacloudClient, SourceMetadata};

use crate::errors::{HiAnimeError, Result};

static EMBED_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("embed id regex must compile"));

/// audio selector understood by the hianime server list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// english dubbed audio.
    Dub,
    /// japanese audio with subtitles.
    Sub,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dub => "dub",
            Self::Sub => "sub",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// one entry of a series' episode list.
#[derive(Debug, Clone)]
pub struct Episode {
    /// ordinal position within the series (1-based).
    pub number: u32,
    /// site-assigned episode id used by the ajax endpoints.
    pub id: u32,
    /// display name in the requested language, safe for use in filenames.
    pub name: String,
}

impl Episode {
    /// filename stem shared by the video, subtitle, and sidecar outputs.
    pub fn basename(&self) -> String {
        format!("{:02} {}", self.number, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct AjaxFragment {
    html: String,
}

#[derive(Debug, Deserialize)]
struct PlaybackSource {
    link: String,
}

#[derive(Clone)]
pub struct HiAnimeClient {
    base_domain: String,
    client: ReqwestClient,
    megacloud: MegacloudClient,
}

impl HiAnimeClient {
    pub fn new(base_domain: String, embed_domain: String) -> Result<Self> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(HiAnimeError::BuildClient)?;

        Ok(Self {
            base_domain,
            client,
            megacloud: MegacloudClient::new(embed_domain)?,
        })
    }

    fn headers(&self, referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36"));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        if let Ok(v) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, v);
        }

        if let Ok(v) = HeaderValue::from_str(format!("https://{}/", self.base_domain).as_ref()) {
            headers.insert(ORIGIN, v);
        }

        headers
    }

    async fn ensure_success(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read error body>".to_string());

        Err(HiAnimeError::HttpStatus {
            context: context.to_string(),
            status,
            body,
        })
    }

    /// fetches one of the ajax endpoints that wrap an HTML fragment in JSON.
    async fn fetch_fragment(&self, url: String, context: &str) -> Result<String> {
        let resp = self
            .client
            .get(&url)
            .headers(self.headers(&url))
            .send()
            .await
            .map_err(|source| HiAnimeError::Request {
                context: context.to_string(),
                source,
            })?;

        let resp = Self::ensure_success(resp, context).await?;

        let fragment: AjaxFragment =
            resp.json().await.map_err(|source| HiAnimeError::Json {
                context: context.to_string(),
                source,
            })?;

        Ok(fragment.html)
    }

    /// enumerates the episodes of a series in list order.
    pub async fn fetch_episode_list(&self, series_id: u32, lang: Language) -> Result<Vec<Episode>> {
        info!(series_id, "fetching episode list");
        let url = format!(
            "https://{}/ajax/v2/episode/list/{series_id}",
            self.base_domain
        );
        let html = self
            .fetch_fragment(url, "requesting the episode list")
            .await?;

        let episodes = Self::parse_episode_list(&html, lang)?;
        debug!(count = episodes.len(), "parsed episode list");
        Ok(episodes)
    }

    fn parse_episode_list(html: &str, lang: Language) -> Result<Vec<Episode>> {
        let doc = Html::parse_fragment(html);
        let episode_sel = Selector::parse("div.ss-list a.ep-item").expect("invalid selector");
        let name_sel = Selector::parse("div.ep-name").expect("invalid selector");

        let mut episodes = Vec::new();

        for node in doc.select(&episode_sel) {
            let number = node
                .value()
                .attr("data-number")
                .and_then(|v| v.parse::<u32>().ok())
                .ok_or(HiAnimeError::EpisodeAttr {
                    attr: "data-number",
                })?;
            let id = node
                .value()
                .attr("data-id")
                .and_then(|v| v.parse::<u32>().ok())
                .ok_or(HiAnimeError::EpisodeAttr { attr: "data-id" })?;

            // the dubbed title sits on the anchor itself, the japanese one on
            // the nested name node.
            let name = match lang {
                Language::Dub => node.value().attr("title").map(str::to_string),
                Language::Sub => node
                    .select(&name_sel)
                    .next()
                    .and_then(|n| n.value().attr("data-jname"))
                    .map(str::to_string),
            }
            .ok_or(HiAnimeError::EpisodeAttr {
                attr: match lang {
                    Language::Dub => "title",
                    Language::Sub => "data-jname",
                },
            })?;

            episodes.push(Episode {
                number,
                id,
                name: name.trim().replace('/', "\u{2215}"),
            });
        }

        Ok(episodes)
    }

    /// resolves the server id serving an episode in the requested language.
    pub async fn fetch_server_id(&self, episode_id: u32, lang: Language) -> Result<u32> {
        let url = format!(
            "https://{}/ajax/v2/episode/servers?episodeId={episode_id}",
            self.base_domain
        );
        let html = self
            .fetch_fragment(url, "requesting the server list")
            .await?;

        Self::parse_server_id(&html, lang)
    }

    fn parse_server_id(html: &str, lang: Language) -> Result<u32> {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(&format!(r#"div.server-item[data-type="{lang}"]"#))
            .expect("invalid selector");

        let node = doc
            .select(&sel)
            .next()
            .ok_or(HiAnimeError::MissingServer {
                lang: lang.as_str(),
            })?;

        node.value()
            .attr("data-id")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or(HiAnimeError::ServerAttr)
    }

    /// resolves a server id to the embed provider's playback link.
    pub async fn fetch_playback_link(&self, server_id: u32) -> Result<String> {
        let url = format!(
            "https://{}/ajax/v2/episode/sources?id={server_id}",
            self.base_domain
        );
        let context = "requesting the playback link";

        let resp = self
            .client
            .get(&url)
            .headers(self.headers(&url))
            .send()
            .await
            .map_err(|source| HiAnimeError::Request {
                context: context.to_string(),
                source,
            })?;

        let resp = Self::ensure_success(resp, context).await?;

        let playback: PlaybackSource =
            resp.json().await.map_err(|source| HiAnimeError::Json {
                context: context.to_string(),
                source,
            })?;

        Ok(playback.link)
    }

    fn embed_id_from_link(link: &str) -> Result<String> {
        let url = Url::parse(link).map_err(|_| HiAnimeError::InvalidPlaybackLink {
            link: link.to_string(),
        })?;

        let id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        if !EMBED_ID_RE.is_match(id) {
            return Err(HiAnimeError::InvalidPlaybackLink {
                link: link.to_string(),
            });
        }

        Ok(id.to_string())
    }

    /// resolves the full metadata document for an episode through the site
    /// api and the embed provider.
    pub async fn fetch_source_metadata(
        &self,
        episode_id: u32,
        lang: Language,
    ) -> Result<SourceMetadata> {
        let server_id = self.fetch_server_id(episode_id, lang).await?;
        debug!(episode_id, server_id, "resolved streaming server");

        let link = self.fetch_playback_link(server_id).await?;
        let embed_id = Self::embed_id_from_link(&link)?;
        debug!(%embed_id, "extracted embed id from playback link");

        Ok(self.megacloud.fetch_sources(&embed_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE_LIST_HTML: &str = r#"
        <div class="detail-infor-content">
          <div class="ss-list">
            <a class="ssl-item ep-item" data-number="1" data-id="1128" title="The Beginning">
              <div class="ep-name e-dynamic-name" data-jname="Hajimari">The Beginning</div>
            </a>
            <a class="ssl-item ep-item" data-number="2" data-id="1129" title=" Fate/Strange ">
              <div class="ep-name e-dynamic-name" data-jname="Unmei / Kibou">Fate/Strange</div>
            </a>
          </div>
        </div>"#;

    const SERVER_LIST_HTML: &str = r#"
        <div class="ps_-block-sub servers-sub">
          <div class="server-item" data-type="sub" data-id="4608" data-server-id="4">HD-1</div>
        </div>
        <div class="ps_-block-sub servers-dub">
          <div class="server-item" data-type="dub" data-id="4612" data-server-id="4">HD-1</div>
        </div>"#;

    #[test]
    fn episode_list_uses_anchor_title_for_dub() {
        let episodes = HiAnimeClient::parse_episode_list(EPISODE_LIST_HTML, Language::Dub)
            .expect("episode list should parse");
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].number, 1);
        assert_eq!(episodes[0].id, 1128);
        assert_eq!(episodes[0].name, "The Beginning");
    }

    #[test]
    fn episode_list_uses_jname_for_sub() {
        let episodes = HiAnimeClient::parse_episode_list(EPISODE_LIST_HTML, Language::Sub)
            .expect("episode list should parse");
        assert_eq!(episodes[0].name, "Hajimari");
        assert_eq!(episodes[1].name, "Unmei ∕ Kibou");
    }

    #[test]
    fn episode_names_are_trimmed_and_slash_free() {
        let episodes = HiAnimeClient::parse_episode_list(EPISODE_LIST_HTML, Language::Dub)
            .expect("episode list should parse");
        assert_eq!(episodes[1].name, "Fate∕Strange");
    }

    #[test]
    fn server_id_matches_requested_language() {
        let sub = HiAnimeClient::parse_server_id(SERVER_LIST_HTML, Language::Sub)
            .expect("sub server should parse");
        let dub = HiAnimeClient::parse_server_id(SERVER_LIST_HTML, Language::Dub)
            .expect("dub server should parse");
        assert_eq!(sub, 4608);
        assert_eq!(dub, 4612);
    }

    #[test]
    fn missing_language_server_is_an_error() {
        let html = r#"<div class="server-item" data-type="sub" data-id="1">HD-1</div>"#;
        let err = HiAnimeClient::parse_server_id(html, Language::Dub)
            .expect_err("dub server should be missing");
        assert!(matches!(err, HiAnimeError::MissingServer { lang: "dub" }));
    }

    #[test]
    fn embed_id_is_last_path_segment_without_query() {
        let id = HiAnimeClient::embed_id_from_link(
            "https://megacloud.tv/embed-2/e-1/dBqCr5BcOhnD?k=1",
        )
        .expect("embed id should parse");
        assert_eq!(id, "dBqCr5BcOhnD");
    }

    #[test]
    fn embed_id_rejects_unparseable_links() {
        assert!(HiAnimeClient::embed_id_from_link("not a url").is_err());
        assert!(HiAnimeClient::embed_id_from_link("https://megacloud.tv/").is_err());
    }

    #[test]
    fn basename_pads_the_episode_number() {
        let episode = Episode {
            number: 3,
            id: 42,
            name: "Stargazer".to_string(),
        };
        assert_eq!(episode.basename(), "03 Stargazer");
    }
}
