//! Comment entity - replies nest one level deep

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Id,
    pub post_id: Id,
    pub author_id: Id,
    pub parent_id: Option<Id>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub const MAX_CONTENT_LENGTH: usize = 1000;
    pub const DELETED_PLACEHOLDER: &'static str = "deleted comment";

    pub fn new(id: Id, post_id: Id, author_id: Id, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            post_id,
            author_id,
            parent_id: None,
            content,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Builds a reply under `parent`, which must be a live top-level comment
    /// of the same post.
    pub fn reply_to(
        id: Id,
        parent: &Comment,
        author_id: Id,
        content: String,
    ) -> Result<Self, DomainError> {
        if parent.is_reply() || parent.is_deleted() {
            return Err(DomainError::InvalidParentComment);
        }
        Ok(Self {
            parent_id: Some(parent.id),
            ..Self::new(id, parent.post_id, author_id, content)
        })
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn ensure_author(&self, member_id: Id) -> Result<(), DomainError> {
        if self.author_id == member_id {
            Ok(())
        } else {
            Err(DomainError::NotCommentAuthor)
        }
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

/// Comment joined with its author's nickname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub author_nickname: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_level() -> Comment {
        Comment::new(Id::new(1), Id::new(100), Id::new(7), "first".into())
    }

    #[test]
    fn test_reply_inherits_post() {
        let parent = top_level();
        let reply = Comment::reply_to(Id::new(2), &parent, Id::new(8), "re".into()).unwrap();
        assert_eq!(reply.post_id, parent.post_id);
        assert_eq!(reply.parent_id, Some(parent.id));
        assert!(reply.is_reply());
    }

    #[test]
    fn test_reply_to_reply_rejected() {
        let parent = top_level();
        let reply = Comment::reply_to(Id::new(2), &parent, Id::new(8), "re".into()).unwrap();
        assert!(matches!(
            Comment::reply_to(Id::new(3), &reply, Id::new(9), "re re".into()),
            Err(DomainError::InvalidParentComment)
        ));
    }

    #[test]
    fn test_reply_to_deleted_rejected() {
        let mut parent = top_level();
        parent.deleted_at = Some(Utc::now());
        assert!(Comment::reply_to(Id::new(2), &parent, Id::new(8), "re".into()).is_err());
    }

    #[test]
    fn test_author_check() {
        let c = top_level();
        assert!(c.ensure_author(Id::new(7)).is_ok());
        assert!(matches!(
            c.ensure_author(Id::new(8)),
            Err(DomainError::NotCommentAuthor)
        ));
    }
}
