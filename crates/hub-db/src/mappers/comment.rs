//! Comment model -> entity

use hub_core::entities::{Comment, CommentView};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use crate::models::{CommentModel, CommentViewModel};

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Id::new(model.id),
            post_id: Id::new(model.post_id),
            author_id: Id::new(model.author_id),
            parent_id: model.parent_id.map(Id::new),
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl TryFrom<CommentViewModel> for CommentView {
    type Error = DomainError;

    fn try_from(model: CommentViewModel) -> Result<Self, Self::Error> {
        Ok(CommentView {
            comment: Comment::from(model.comment),
            author_nickname: model.author_nickname,
        })
    }
}
