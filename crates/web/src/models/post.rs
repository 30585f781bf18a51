//! Post domain types.

use quill_core::{PostId, UserId};

/// The author of a post or comment, as shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: String,
}

/// A blog post together with its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub subtitle: String,
    /// Creation date as displayed, e.g. "October 19, 2026". Never changes after creation.
    pub date: String,
    /// Markdown source of the body.
    pub body: String,
    pub img_url: String,
    pub author: Author,
}

/// The author-editable fields of a post.
///
/// Creating a post and editing one both submit exactly these fields; the id,
/// author and date are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub img_url: String,
}

impl Post {
    /// Whether `user_id` wrote this post.
    #[must_use]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author.id == user_id
    }

    /// The editable fields, for pre-filling the edit form.
    #[must_use]
    pub fn content(&self) -> PostContent {
        PostContent {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            body: self.body.clone(),
            img_url: self.img_url.clone(),
        }
    }
}
