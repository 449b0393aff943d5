//! Post service - the board

use hub_core::{DomainError, Id, Page, PageRequest, Post, PostQuery};
use tracing::{info, instrument};

use crate::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// A live post, or `POST_NOT_FOUND`
    pub(crate) async fn load(&self, post_id: Id) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .filter(|p| !p.is_deleted())
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    async fn view(&self, post_id: Id) -> ServiceResult<PostResponse> {
        self.ctx
            .post_repo()
            .find_view(post_id)
            .await?
            .map(PostResponse::from)
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    #[instrument(skip(self, request), fields(category = request.category.as_str()))]
    pub async fn create(&self, author_id: Id, request: CreatePostRequest) -> ServiceResult<PostResponse> {
        let post = Post::new(
            self.ctx.generate_id(),
            author_id,
            request.category,
            request.title.trim().to_string(),
            request.content,
        );
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");
        self.view(post.id).await
    }

    /// Read a post, counting the view
    #[instrument(skip(self))]
    pub async fn get(&self, post_id: Id, viewer: Option<Id>) -> ServiceResult<PostResponse> {
        self.load(post_id).await?;
        self.ctx.post_repo().increment_view_count(post_id).await?;

        let mut response = self.view(post_id).await?;
        if let Some(viewer) = viewer {
            response.liked = Some(self.ctx.like_repo().exists(post_id, viewer).await?);
        }
        Ok(response)
    }

    /// Newest first
    pub async fn list(&self, query: PostQuery, page: PageRequest) -> ServiceResult<Page<PostResponse>> {
        let query = PostQuery {
            keyword: query
                .keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            ..query
        };
        let posts = self.ctx.post_repo().list(&query, page).await?;
        Ok(posts.map(PostResponse::from))
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        member_id: Id,
        post_id: Id,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let mut post = self.load(post_id).await?;
        post.ensure_author(member_id)?;

        post.edit(
            request.category,
            request.title.map(|t| t.trim().to_string()),
            request.content,
        );
        self.ctx.post_repo().update(&post).await?;

        info!(post_id = %post_id, "Post updated");
        self.view(post_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, member_id: Id, post_id: Id) -> ServiceResult<()> {
        let post = self.load(post_id).await?;
        post.ensure_author(member_id)?;

        self.ctx.post_repo().soft_delete(post_id).await?;
        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Moderation delete, regardless of author
    #[instrument(skip(self))]
    pub async fn delete_as_admin(&self, admin_id: Id, post_id: Id) -> ServiceResult<()> {
        self.load(post_id).await?;
        self.ctx.post_repo().soft_delete(post_id).await?;
        info!(post_id = %post_id, admin_id = %admin_id, "Post deleted by admin");
        Ok(())
    }
}
