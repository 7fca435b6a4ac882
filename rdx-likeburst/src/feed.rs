//! The sample feed: a list of posts, each with its own like button.

use crate::common::{ButtonId, PostId};
use crate::components::sequencer::TapOutcome;
use crate::engine::LikeBurstEngine;
use slotmap::SlotMap;
use tracing::debug;

/// Image names of the sample posts, in feed order.
pub const SAMPLE_IMAGES: [&str; 3] = ["heart.fill", "person.fill", "xmark.fill"];

/// One card in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub image_name: String,
    pub is_liked: bool,
    /// The animated like overlay of this post.
    pub button: ButtonId,
}

/// An ordered list of posts backed by buttons mounted on one engine.
pub struct Feed {
    engine: LikeBurstEngine,
    ids: SlotMap<PostId, ()>,
    posts: Vec<Post>,
}

impl Feed {
    /// Creates an empty feed on `engine`.
    pub fn new(engine: LikeBurstEngine) -> Self {
        Self {
            engine,
            ids: SlotMap::with_key(),
            posts: Vec::new(),
        }
    }

    /// Creates the three-post sample feed, none of them liked.
    pub async fn sample(engine: LikeBurstEngine) -> Self {
        let mut feed = Self::new(engine);
        for image_name in SAMPLE_IMAGES {
            feed.push(image_name).await;
        }
        feed
    }

    /// Appends an unliked post and mounts its button.
    pub async fn push(&mut self, image_name: &str) -> PostId {
        let id = self.ids.insert(());
        let button = self.engine.mount_button(false).await;
        self.posts.push(Post {
            id,
            image_name: image_name.to_string(),
            is_liked: false,
            button,
        });
        id
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn engine(&self) -> &LikeBurstEngine {
        &self.engine
    }

    /// Position of `id` in the feed. Unknown ids map to the first post.
    pub fn index_of(&self, id: PostId) -> usize {
        self.posts.iter().position(|post| post.id == id).unwrap_or(0)
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Forwards one raw tap to the overlay of `id`.
    pub async fn tap(&mut self, id: PostId) -> Option<TapOutcome> {
        let button = self.get(id)?.button;
        let outcome = self.engine.tap(button).await;
        self.sync().await;
        outcome
    }

    /// Taps the overlay of `id` as many times as one gesture needs.
    ///
    /// Returns the outcome of the last tap.
    pub async fn like_gesture(&mut self, id: PostId) -> Option<TapOutcome> {
        let taps = self.engine.config().gesture.taps_required.max(1);
        let mut outcome = None;
        for _ in 0..taps {
            outcome = self.tap(id).await;
        }
        outcome
    }

    /// The small heart under the image: flips `is_liked` without animating.
    pub async fn toggle_like(&mut self, id: PostId) -> Option<bool> {
        let index = self.posts.iter().position(|post| post.id == id)?;
        let post = &mut self.posts[index];
        post.is_liked = !post.is_liked;
        self.engine.set_liked(post.button, post.is_liked).await;
        debug!("Post {:?} toggled to liked = {}.", id, post.is_liked);
        Some(post.is_liked)
    }

    /// Mirrors each button's `liked` value into its post.
    pub async fn sync(&mut self) {
        for post in &mut self.posts {
            if let Some(liked) = self.engine.liked(post.button).await {
                post.is_liked = liked;
            }
        }
    }

    /// Unmounts every button, cancelling their pending steps.
    pub async fn teardown(self) {
        for post in &self.posts {
            self.engine.unmount_button(post.button).await;
        }
    }
}
