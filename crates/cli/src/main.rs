mod app;
mod args;
mod chapters;
mod logger;
mod pipeline;
mod subtitles;

use app::App;

#[tokio::main]
async fn main() {
    App::new().run().await;
}
