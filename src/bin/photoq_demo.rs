//! Demo that evaluates the sample gallery plus a few random uploads and prints the results.

use std::sync::Arc;

use photo_quality_cf::extract::RandomExtractor;
use photo_quality_cf::service::{PhotoService, Upload, Viewer};
use photo_quality_cf::store::{InMemoryPhotoStore, PhotoRepository};
use photo_quality_cf::demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let store = Arc::new(InMemoryPhotoStore::default());
    demo::seed(&store)?;
    let repo: Arc<dyn PhotoRepository> = store;
    let svc = PhotoService::new(repo, Arc::new(RandomExtractor::seeded(2023)));

    for title in ["Studio Portrait 4", "Studio Portrait 5", "Backlit Portrait"] {
        svc.upload(Upload {
            owner_id: demo::DEMO_OWNER_ID.to_string(),
            title: title.to_string(),
            image_ref: format!("mem://{}.jpg", title.to_ascii_lowercase().replace(' ', "-")),
            features: None,
        })
        .await?;
    }

    for p in svc.visible_photos(&Viewer::admin("1"))? {
        println!(
            "{:<20} {:<4} score {:>3}%  cf {:.6}",
            p.title,
            p.result.quality.as_str(),
            p.result.score_percent(),
            p.result.certainty_factor
        );
    }

    println!("photoq-demo done");
    Ok(())
}
