use hianime::{HiAnimeBuilder, Language, MetadataResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = HiAnimeBuilder::new().build()?;

    let series_id = 18056;
    let episodes = client.fetch_episode_list(series_id, Language::Sub).await?;
    println!("episodes: {}", episodes.len());

    let resolver = MetadataResolver::api(client);
    let metadata = resolver
        .resolve(series_id, episodes[0].id, Language::Sub)
        .await?;

    println!("metadata: {metadata:#?}");
    Ok(())
}
