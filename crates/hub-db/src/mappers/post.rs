//! Post model -> entity

use hub_core::entities::{Post, PostCategory, PostView};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use super::parse_column;
use crate::models::{PostModel, PostViewModel};

impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        Ok(Post {
            id: Id::new(model.id),
            author_id: Id::new(model.author_id),
            category: parse_column("category", &model.category, PostCategory::parse)?,
            title: model.title,
            content: model.content,
            view_count: model.view_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}

impl TryFrom<PostViewModel> for PostView {
    type Error = DomainError;

    fn try_from(model: PostViewModel) -> Result<Self, Self::Error> {
        Ok(PostView {
            post: Post::try_from(model.post)?,
            author_nickname: model.author_nickname,
            like_count: model.like_count,
            comment_count: model.comment_count,
        })
    }
}
