use crate::client::HiAnimeClient;
use crate::errors::Result;

const BASE_DOMAIN: &str = "hianime.to";
const EMBED_DOMAIN: &str = "megacloud.tv";

pub struct HiAnimeBuilder {
    base_domain: String,
    embed_domain: String,
}

impl Default for HiAnimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HiAnimeBuilder {
    /// creates a builder pointing at the default site and embed domains.
    pub fn new() -> Self {
        Self {
            base_domain: BASE_DOMAIN.to_string(),
            embed_domain: EMBED_DOMAIN.to_string(),
        }
    }

    /// sets the site domain; useful when the canonical one is mirrored.
    pub fn base_domain(mut self, domain: &str) -> Self {
        self.base_domain = domain.to_string();
        self
    }

    /// sets the embed provider domain queried for source metadata.
    pub fn embed_domain(mut self, domain: &str) -> Self {
        self.embed_domain = domain.to_string();
        self
    }

    /// builds a [`HiAnimeClient`] using the configured options.
    pub fn build(&self) -> Result<HiAnimeClient> {
        HiAnimeClient::new(self.base_domain.clone(), self.embed_domain.clone())
    }
}
