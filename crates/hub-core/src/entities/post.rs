//! Board posts and likes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    Free,
    Study,
    Question,
    Roadmap,
}

impl PostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Study => "STUDY",
            Self::Question => "QUESTION",
            Self::Roadmap => "ROADMAP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FREE" => Some(Self::Free),
            "STUDY" => Some(Self::Study),
            "QUESTION" => Some(Self::Question),
            "ROADMAP" => Some(Self::Roadmap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Id,
    pub author_id: Id,
    pub category: PostCategory,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub const MAX_TITLE_LENGTH: usize = 100;
    pub const MAX_CONTENT_LENGTH: usize = 10_000;

    pub fn new(
        id: Id,
        author_id: Id,
        category: PostCategory,
        title: String,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            category,
            title,
            content,
            view_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[inline]
    pub fn is_author(&self, member_id: Id) -> bool {
        self.author_id == member_id
    }

    pub fn ensure_author(&self, member_id: Id) -> Result<(), DomainError> {
        if self.is_author(member_id) {
            Ok(())
        } else {
            Err(DomainError::NotPostAuthor)
        }
    }

    pub fn edit(
        &mut self,
        category: Option<PostCategory>,
        title: Option<String>,
        content: Option<String>,
    ) {
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

/// Post joined with author nickname and engagement counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author_nickname: String,
    pub like_count: i64,
    pub comment_count: i64,
}

/// One member's like on one post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostLike {
    pub post_id: Id,
    pub member_id: Id,
    pub created_at: DateTime<Utc>,
}

impl PostLike {
    pub fn new(post_id: Id, member_id: Id) -> Self {
        Self {
            post_id,
            member_id,
            created_at: Utc::now(),
        }
    }
}
