//! Catalog lister: pages through the channel search until the API stops
//! returning a continuation token.

use timecode_models::Catalog;
use timecode_youtube::VideoSource;
use tracing::{debug, error, info};

/// Collect every video id of the channel, newest first.
///
/// A failing page ends pagination; the ids gathered so far are returned.
pub async fn list_catalog(source: &dyn VideoSource) -> Catalog {
    let mut catalog = Catalog::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = match source.search_page(page_token.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                error!(
                    pages,
                    collected = catalog.len(),
                    "Channel listing stopped early: {}", e
                );
                break;
            }
        };

        pages += 1;
        if page.skipped > 0 {
            debug!(page = pages, skipped = page.skipped, "Skipped search hits without a video id");
        }
        catalog.extend_page(page.video_ids);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(pages, videos = catalog.len(), "Channel listing finished");
    catalog
}
