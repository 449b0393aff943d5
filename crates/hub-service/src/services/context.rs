//! Service context - dependency container for services
//!
//! Holds every repository, port and shared helper the services need. All
//! infrastructure sits behind `hub-core` traits so the API binary wires in
//! Postgres and Redis while tests wire in in-memory fakes.

use std::sync::Arc;

use hub_common::auth::JwtService;
use hub_common::config::WalletConfig;
use hub_core::{
    ChatRepository, CommentRepository, CouponRepository, DomainEvent, EventChannel,
    EventPublisher, Id, IdGenerator, LedgerRepository, LikeRepository, MemberRepository,
    PostRepository, RoadmapGenerator, RoadmapRepository, SessionStore,
};
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    like_repo: Arc<dyn LikeRepository>,
    chat_repo: Arc<dyn ChatRepository>,
    coupon_repo: Arc<dyn CouponRepository>,
    ledger_repo: Arc<dyn LedgerRepository>,
    roadmap_repo: Arc<dyn RoadmapRepository>,

    // Ports
    session_store: Arc<dyn SessionStore>,
    publisher: Arc<dyn EventPublisher>,
    roadmap_generator: Arc<dyn RoadmapGenerator>,

    // Shared helpers
    jwt_service: Arc<JwtService>,
    id_generator: Arc<IdGenerator>,
    wallet_config: WalletConfig,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn like_repo(&self) -> &dyn LikeRepository {
        self.like_repo.as_ref()
    }

    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    pub fn coupon_repo(&self) -> &dyn CouponRepository {
        self.coupon_repo.as_ref()
    }

    pub fn ledger_repo(&self) -> &dyn LedgerRepository {
        self.ledger_repo.as_ref()
    }

    pub fn roadmap_repo(&self) -> &dyn RoadmapRepository {
        self.roadmap_repo.as_ref()
    }

    // === Ports ===

    /// Refresh-token sessions
    pub fn session_store(&self) -> &dyn SessionStore {
        self.session_store.as_ref()
    }

    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    pub fn roadmap_generator(&self) -> &dyn RoadmapGenerator {
        self.roadmap_generator.as_ref()
    }

    // === Shared helpers ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn wallet_config(&self) -> &WalletConfig {
        &self.wallet_config
    }

    /// Generate a new entity id
    pub fn generate_id(&self) -> Id {
        self.id_generator.generate()
    }

    /// Publish an event without failing the caller; delivery is best effort.
    pub async fn publish(&self, channel: EventChannel, event: DomainEvent) {
        if let Err(e) = self.publisher.publish(channel, &event).await {
            warn!(
                channel = %channel.name(),
                event_type = event.event_type(),
                error = %e,
                "Failed to publish event"
            );
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("roadmap_generator", &self.roadmap_generator.name())
            .field("jwt_service", &self.jwt_service)
            .field("wallet_config", &self.wallet_config)
            .finish()
    }
}

/// Builder for creating a [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    like_repo: Option<Arc<dyn LikeRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    coupon_repo: Option<Arc<dyn CouponRepository>>,
    ledger_repo: Option<Arc<dyn LedgerRepository>>,
    roadmap_repo: Option<Arc<dyn RoadmapRepository>>,
    session_store: Option<Arc<dyn SessionStore>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    roadmap_generator: Option<Arc<dyn RoadmapGenerator>>,
    jwt_service: Option<Arc<JwtService>>,
    id_generator: Option<Arc<IdGenerator>>,
    wallet_config: Option<WalletConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn like_repo(mut self, repo: Arc<dyn LikeRepository>) -> Self {
        self.like_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn coupon_repo(mut self, repo: Arc<dyn CouponRepository>) -> Self {
        self.coupon_repo = Some(repo);
        self
    }

    pub fn ledger_repo(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger_repo = Some(repo);
        self
    }

    pub fn roadmap_repo(mut self, repo: Arc<dyn RoadmapRepository>) -> Self {
        self.roadmap_repo = Some(repo);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn roadmap_generator(mut self, generator: Arc<dyn RoadmapGenerator>) -> Self {
        self.roadmap_generator = Some(generator);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn id_generator(mut self, generator: Arc<IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn wallet_config(mut self, config: WalletConfig) -> Self {
        self.wallet_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            member_repo: required(self.member_repo, "member_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            like_repo: required(self.like_repo, "like_repo")?,
            chat_repo: required(self.chat_repo, "chat_repo")?,
            coupon_repo: required(self.coupon_repo, "coupon_repo")?,
            ledger_repo: required(self.ledger_repo, "ledger_repo")?,
            roadmap_repo: required(self.roadmap_repo, "roadmap_repo")?,
            session_store: required(self.session_store, "session_store")?,
            publisher: required(self.publisher, "publisher")?,
            roadmap_generator: required(self.roadmap_generator, "roadmap_generator")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            id_generator: self.id_generator.unwrap_or_default(),
            wallet_config: self.wallet_config.unwrap_or_default(),
        })
    }
}
