//! In-memory stand-in for the page's `videoContainer` element.
//!
//! The gallery is append-only: loads add nodes at the end, and the only
//! in-place mutation is swapping a thumbnail for its player.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::embed::{self, PLAYER_ALLOW};
use crate::error::SubstitutionError;
use crate::sizing::Dimensions;

pub type NodeId = u64;

/// The container as shared between a load task and its owner.
pub type SharedGallery = Arc<Mutex<Gallery>>;

pub const CONTAINER_ID: &str = "videoContainer";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThumbnailNode {
    pub id: NodeId,
    pub src: String,
    pub embed_url: String,
    pub size: Dimensions,
}

impl ThumbnailNode {
    /// Rendered box. Thumbnails are styled at their natural size.
    pub fn bounding_box(&self) -> Dimensions { self.size }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerNode {
    pub id: NodeId,
    pub src: String,
    pub size: Option<Dimensions>,
}

impl PlayerNode {
    pub fn allow(&self) -> &'static str { PLAYER_ALLOW }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Thumbnail(ThumbnailNode),
    Player(PlayerNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self { Node::Thumbnail(t) => t.id, Node::Player(p) => p.id }
    }
    pub fn as_thumbnail(&self) -> Option<&ThumbnailNode> {
        match self { Node::Thumbnail(t) => Some(t), _ => None }
    }
    pub fn as_player(&self) -> Option<&PlayerNode> {
        match self { Node::Player(p) => Some(p), _ => None }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Gallery {
    parent_domain: String,
    children: Vec<Node>,
    #[serde(skip)]
    next_id: NodeId,
}

impl Gallery {
    pub fn new(parent_domain: impl Into<String>) -> Self {
        Self { parent_domain: parent_domain.into(), children: Vec::new(), next_id: 1 }
    }

    pub fn parent_domain(&self) -> &str { &self.parent_domain }
    pub fn children(&self) -> &[Node] { &self.children }
    pub fn len(&self) -> usize { self.children.len() }
    pub fn is_empty(&self) -> bool { self.children.is_empty() }
    pub fn get(&self, id: NodeId) -> Option<&Node> { self.children.iter().find(|n| n.id() == id) }
    pub fn position(&self, id: NodeId) -> Option<usize> { self.children.iter().position(|n| n.id() == id) }

    pub fn append_thumbnail(&mut self, src: String, embed_url: String, size: Dimensions) -> NodeId {
        let id = self.alloc_id();
        self.children.push(Node::Thumbnail(ThumbnailNode { id, src, embed_url, size }));
        id
    }

    pub fn append_player(&mut self, src: String, size: Option<Dimensions>) -> NodeId {
        let id = self.alloc_id();
        self.children.push(Node::Player(PlayerNode { id, src, size }));
        id
    }

    /// Click on a thumbnail: replaces it in place with an autoplaying
    /// player of the same size. One-shot; returns the new player's id.
    pub fn click(&mut self, id: NodeId) -> Result<NodeId, SubstitutionError> {
        let parent = self.parent_domain.clone();
        self.substitute(id, &parent)
    }

    /// Like [`Gallery::click`], with an explicit embed `parent` domain.
    pub fn substitute(&mut self, id: NodeId, parent: &str) -> Result<NodeId, SubstitutionError> {
        let idx = self.position(id).ok_or(SubstitutionError::NotFound(id))?;
        let Node::Thumbnail(thumb) = &self.children[idx] else {
            return Err(SubstitutionError::NotAThumbnail(id));
        };
        let player_id = self.next_id;
        let player = embed::substitute(thumb, player_id, parent);
        self.next_id += 1;
        tracing::debug!(thumbnail = id, player = player_id, src = %player.src, "thumbnail replaced by player");
        self.children[idx] = Node::Player(player);
        Ok(player_id)
    }

    /// Serializes the container and its children as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, r#"<div id="{CONTAINER_ID}">"#);
        for node in &self.children {
            match node {
                Node::Thumbnail(t) => {
                    let _ = writeln!(
                        out,
                        r#"  <img data-node="{}" src="{}" data-embed="{}" style="cursor: pointer; width: {}px; height: {}px;">"#,
                        t.id, attr(&t.src), attr(&t.embed_url), t.size.width, t.size.height
                    );
                }
                Node::Player(p) => {
                    let style = p.size.map(|d| format!(r#" style="width: {}px; height: {}px;""#, d.width, d.height)).unwrap_or_default();
                    let _ = writeln!(
                        out,
                        r#"  <iframe data-node="{}" src="{}" allow="{}"{}></iframe>"#,
                        p.id, attr(&p.src), p.allow(), style
                    );
                }
            }
        }
        out.push_str("</div>\n");
        out
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn attr(s: &str) -> String {
    let mut o = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => o.push_str("&amp;"),
            '"' => o.push_str("&quot;"),
            '<' => o.push_str("&lt;"),
            '>' => o.push_str("&gt;"),
            c => o.push(c),
        }
    }
    o
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "www.streamer-summaries.com";

    fn gallery_with_two() -> (Gallery, NodeId, NodeId) {
        let mut g = Gallery::new(DOMAIN);
        let a = g.append_thumbnail("t1.jpg".into(), "https://clips.twitch.tv/embed?clip=A".into(), Dimensions { width: 480, height: 272 });
        let b = g.append_thumbnail("t2.jpg".into(), "https://clips.twitch.tv/embed?clip=B".into(), Dimensions { width: 260, height: 147 });
        (g, a, b)
    }

    #[test]
    fn click_swaps_in_place_with_matching_size() {
        let (mut g, a, b) = gallery_with_two();
        let before = g.get(b).and_then(Node::as_thumbnail).unwrap().bounding_box();

        let player = g.click(b).unwrap();

        assert_eq!(g.len(), 2);
        assert_eq!(g.children()[0].id(), a);
        let p = g.children()[1].as_player().unwrap();
        assert_eq!(p.id, player);
        assert_eq!(p.src, "https://clips.twitch.tv/embed?clip=B&parent=www.streamer-summaries.com&autoplay=true");
        assert_eq!(p.size, Some(before));
        assert_eq!(p.allow(), "autoplay; fullscreen");
        assert!(g.get(b).is_none());
    }

    #[test]
    fn click_is_one_shot() {
        let (mut g, a, _) = gallery_with_two();
        let player = g.click(a).unwrap();
        assert_eq!(g.click(a), Err(SubstitutionError::NotFound(a)));
        assert_eq!(g.click(player), Err(SubstitutionError::NotAThumbnail(player)));
        assert_eq!(g.children().iter().filter(|n| n.as_player().is_some()).count(), 1);
    }

    #[test]
    fn substitute_uses_given_parent() {
        let (mut g, a, b) = gallery_with_two();
        let player = g.substitute(a, "streamer-summaries.com").unwrap();

        let p = g.get(player).and_then(Node::as_player).unwrap();
        assert_eq!(p.src, "https://clips.twitch.tv/embed?clip=A&parent=streamer-summaries.com&autoplay=true");
        assert_eq!(p.size, Some(Dimensions { width: 480, height: 272 }));
        assert_eq!(g.position(player), Some(0));
        assert_eq!(g.substitute(a, "x"), Err(SubstitutionError::NotFound(a)));
        assert!(g.get(b).and_then(Node::as_thumbnail).is_some());
    }

    #[test]
    fn ids_stay_unique_after_substitution() {
        let (mut g, a, b) = gallery_with_two();
        let p = g.click(a).unwrap();
        let c = g.append_player("x&parent=y".into(), None);
        let mut ids = vec![b, p, c];
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn html_escapes_attributes() {
        let mut g = Gallery::new(DOMAIN);
        g.append_player("https://e/embed?clip=1&parent=x".into(), None);
        let html = g.to_html();
        assert!(html.starts_with(r#"<div id="videoContainer">"#));
        assert!(html.contains(r#"src="https://e/embed?clip=1&amp;parent=x""#));
        assert!(html.contains(r#"allow="autoplay; fullscreen""#));
        assert!(!html.contains("style="));
    }

    #[test]
    fn html_sizes_thumbnails() {
        let (g, _, _) = gallery_with_two();
        assert!(g.to_html().contains("cursor: pointer; width: 480px; height: 272px;"));
    }
}
