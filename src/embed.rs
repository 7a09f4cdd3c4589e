use crate::gallery::{NodeId, PlayerNode, ThumbnailNode};

/// Permissions granted to every embedded player.
pub const PLAYER_ALLOW: &str = "autoplay; fullscreen";

/// Appends the provider's `parent` (and optionally `autoplay`) parameters.
///
/// The provider hands out embed URLs that already carry a query string, so
/// this is a plain suffix rather than a query rewrite.
pub fn player_src(embed_url: &str, parent: &str, autoplay: bool) -> String {
    let mut src = format!("{embed_url}&parent={parent}");
    if autoplay { src.push_str("&autoplay=true"); }
    src
}

/// Builds the player that takes a thumbnail's place. Sized to the
/// thumbnail's box so the swap causes no layout shift.
pub(crate) fn substitute(thumb: &ThumbnailNode, id: NodeId, parent: &str) -> PlayerNode {
    PlayerNode { id, src: player_src(&thumb.embed_url, parent, true), size: Some(thumb.bounding_box()) }
}
