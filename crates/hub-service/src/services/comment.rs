//! Comment service - threaded comments on posts

use hub_core::{Comment, DomainError, Id};
use tracing::{info, instrument};

use crate::dto::{
    build_comment_thread, CommentResponse, CreateCommentRequest, MyCommentResponse,
    UpdateCommentRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A live comment written by `member_id`
    async fn load_own(&self, member_id: Id, comment_id: Id) -> ServiceResult<Comment> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or(DomainError::CommentNotFound(comment_id))?;
        comment.ensure_author(member_id)?;
        Ok(comment)
    }

    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        author_id: Id,
        post_id: Id,
        request: CreateCommentRequest,
    ) -> ServiceResult<MyCommentResponse> {
        PostService::new(self.ctx).load(post_id).await?;

        let id = self.ctx.generate_id();
        let comment = match request.parent_id {
            None => Comment::new(id, post_id, author_id, request.content),
            Some(parent_id) => {
                let parent = self
                    .ctx
                    .comment_repo()
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(DomainError::CommentNotFound(parent_id))?;
                if parent.post_id != post_id {
                    return Err(DomainError::InvalidParentComment.into());
                }
                Comment::reply_to(id, &parent, author_id, request.content)?
            }
        };

        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(MyCommentResponse::from(&comment))
    }

    /// The post's thread, oldest first
    pub async fn list(&self, post_id: Id) -> ServiceResult<Vec<CommentResponse>> {
        PostService::new(self.ctx).load(post_id).await?;
        let views = self.ctx.comment_repo().list_by_post(post_id).await?;
        Ok(build_comment_thread(views))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        member_id: Id,
        comment_id: Id,
        request: UpdateCommentRequest,
    ) -> ServiceResult<MyCommentResponse> {
        let mut comment = self.load_own(member_id, comment_id).await?;
        comment.edit(request.content);
        self.ctx.comment_repo().update(&comment).await?;

        Ok(MyCommentResponse::from(&comment))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, member_id: Id, comment_id: Id) -> ServiceResult<()> {
        self.load_own(member_id, comment_id).await?;
        self.ctx.comment_repo().soft_delete(comment_id).await?;

        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CreatePostRequest;
    use crate::testing::TestHarness;
    use hub_core::PostCategory;

    async fn post(h: &TestHarness, author: Id) -> Id {
        PostService::new(h.context())
            .create(
                author,
                CreatePostRequest {
                    category: PostCategory::Free,
                    title: "hello".into(),
                    content: "world".into(),
                },
            )
            .await
            .unwrap()
            .id
    }

    fn request(content: &str, parent_id: Option<Id>) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.to_string(),
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_reply_to_reply_rejected() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        let post_id = post(&h, alice.id).await;
        let service = CommentService::new(h.context());

        let root = service.create(alice.id, post_id, request("root", None)).await.unwrap();
        let reply = service
            .create(alice.id, post_id, request("reply", Some(root.id)))
            .await
            .unwrap();
        assert_eq!(reply.parent_id, Some(root.id));

        let err = service
            .create(alice.id, post_id, request("nested", Some(reply.id)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARENT_COMMENT");
    }

    #[tokio::test]
    async fn test_parent_must_belong_to_same_post() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        let first = post(&h, alice.id).await;
        let second = post(&h, alice.id).await;
        let service = CommentService::new(h.context());

        let root = service.create(alice.id, first, request("root", None)).await.unwrap();
        let err = service
            .create(alice.id, second, request("cross", Some(root.id)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARENT_COMMENT");
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        let err = CommentService::new(h.context())
            .create(alice.id, Id::new(404), request("hi", None))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "POST_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_only_author_edits_or_deletes() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        let bob = h.seed_member("bob").await;
        let post_id = post(&h, alice.id).await;
        let service = CommentService::new(h.context());
        let comment = service.create(alice.id, post_id, request("mine", None)).await.unwrap();

        let err = service
            .update(bob.id, comment.id, UpdateCommentRequest { content: "x".into() })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_COMMENT_AUTHOR");

        let err = service.delete(bob.id, comment.id).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_COMMENT_AUTHOR");

        let edited = service
            .update(alice.id, comment.id, UpdateCommentRequest { content: "edited".into() })
            .await
            .unwrap();
        assert_eq!(edited.content, "edited");
    }

    #[tokio::test]
    async fn test_deleted_parent_shown_as_placeholder() {
        let h = TestHarness::new();
        let alice = h.seed_member("alice").await;
        let bob = h.seed_member("bob").await;
        let post_id = post(&h, alice.id).await;
        let service = CommentService::new(h.context());

        let root = service.create(alice.id, post_id, request("root", None)).await.unwrap();
        service
            .create(bob.id, post_id, request("reply", Some(root.id)))
            .await
            .unwrap();
        let lonely = service.create(alice.id, post_id, request("lonely", None)).await.unwrap();

        service.delete(alice.id, root.id).await.unwrap();
        service.delete(alice.id, lonely.id).await.unwrap();

        let thread = service.list(post_id).await.unwrap();
        assert_eq!(thread.len(), 1);
        assert!(thread[0].deleted);
        assert_eq!(thread[0].content, Comment::DELETED_PLACEHOLDER);
        assert_eq!(thread[0].replies[0].author_nickname.as_deref(), Some("bob"));

        // a deleted comment cannot be deleted again
        let err = service.delete(alice.id, root.id).await.unwrap_err();
        assert_eq!(err.error_code(), "COMMENT_NOT_FOUND");
    }
}
