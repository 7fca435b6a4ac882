//! Contains common, primitive types used across the crate.
//!
//! Buttons and posts are identified by slotmap keys so that a stale id held by
//! the presentation layer can never alias a newly mounted button.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely identifies a mounted like-button instance within the engine.
    ///
    /// Returned by `LikeBurstEngine::mount_button`. Keys are never reused, so a
    /// tap addressed to an unmounted button is simply ignored.
    pub struct ButtonId;

    /// Opaque, unique identifier of a `Post` in the feed.
    pub struct PostId;
}
