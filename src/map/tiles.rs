/// Tile layer
///
/// Downloads 256px map tiles over HTTP and keeps them in a per-view,
/// in-memory cache. A tile that fails to download stays failed and the
/// map renders background in its place; there is no retry and no disk
/// cache.

use iced::widget::image;
use std::collections::HashMap;

use super::mercator::TileId;

/// Tile server template used by the map pages
pub const TILE_URL_TEMPLATE: &str =
    "https://tiles.stadiamaps.com/tiles/alidade_smooth/{z}/{x}/{y}.png";

/// Resolve the download URL for one tile
pub fn tile_url(tile: TileId) -> String {
    TILE_URL_TEMPLATE
        .replace("{z}", &tile.zoom.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}

/// Lifecycle of a tile in the cache
#[derive(Debug, Clone)]
pub enum TileState {
    /// A download is in flight
    Loading,
    /// Decoded and ready to draw
    Ready(image::Handle),
    /// The download failed; drawn as background
    Failed,
}

/// In-memory tile store owned by a single map view
#[derive(Debug, Default)]
pub struct TileCache {
    tiles: HashMap<TileId, TileState>,
}

impl TileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image handle for a tile, if it arrived
    pub fn handle(&self, tile: TileId) -> Option<&image::Handle> {
        match self.tiles.get(&tile) {
            Some(TileState::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Mark a tile as in flight
    ///
    /// Returns `false` when the tile is already loading, loaded or
    /// failed, so each tile is fetched at most once.
    pub fn begin(&mut self, tile: TileId) -> bool {
        if self.tiles.contains_key(&tile) {
            return false;
        }
        self.tiles.insert(tile, TileState::Loading);
        true
    }

    /// Store the outcome of a download
    pub fn complete(&mut self, tile: TileId, result: Result<image::Handle, String>) {
        let state = match result {
            Ok(handle) => TileState::Ready(handle),
            Err(error) => {
                tracing::debug!(?tile, %error, "tile download failed");
                TileState::Failed
            }
        };
        self.tiles.insert(tile, state);
    }
}

/// Download one tile and decode it into an image handle
///
/// Returns the tile id with the result so the caller can file the
/// outcome under the right cache slot.
pub async fn fetch_tile(
    client: reqwest::Client,
    tile: TileId,
) -> (TileId, Result<image::Handle, String>) {
    let result = async {
        let response = client
            .get(tile_url(tile))
            .send()
            .await
            .map_err(|e| format!("tile request failed: {}", e))?;

        let response = response
            .error_for_status()
            .map_err(|e| format!("tile server error: {}", e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("tile body failed: {}", e))?;

        Ok(image::Handle::from_bytes(bytes.to_vec()))
    }
    .await;

    (tile, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: u32, y: u32) -> TileId {
        TileId { zoom: 15, x, y }
    }

    #[test]
    fn test_tile_url_substitution() {
        let url = tile_url(TileId { zoom: 15, x: 11630, y: 19217 });
        assert_eq!(
            url,
            "https://tiles.stadiamaps.com/tiles/alidade_smooth/15/11630/19217.png"
        );
    }

    #[test]
    fn test_begin_is_once_per_tile() {
        let mut cache = TileCache::new();
        assert!(cache.begin(tile(1, 2)));
        assert!(!cache.begin(tile(1, 2)));
        assert!(cache.begin(tile(1, 3)));
    }

    #[test]
    fn test_only_ready_tiles_have_handles() {
        let mut cache = TileCache::new();
        cache.begin(tile(0, 0));
        cache.begin(tile(0, 1));
        assert!(cache.handle(tile(0, 0)).is_none());

        cache.complete(tile(0, 0), Ok(image::Handle::from_bytes(vec![0u8; 4])));
        cache.complete(tile(0, 1), Err("boom".to_string()));

        assert!(cache.handle(tile(0, 0)).is_some());
        assert!(cache.handle(tile(0, 1)).is_none());

        // A failed tile is not re-requested
        assert!(!cache.begin(tile(0, 1)));
    }
}
