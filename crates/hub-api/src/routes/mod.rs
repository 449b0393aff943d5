//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    admin, auth, chat, comments, coupons, health, likes, members, posts, roadmaps, wallet,
};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(member_routes())
        .merge(post_routes())
        .merge(chat_routes())
        .merge(wallet_routes())
        .merge(roadmap_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/oauth/:provider", post(auth::oauth_login))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/members/me",
            get(members::get_me)
                .patch(members::update_me)
                .delete(members::withdraw),
        )
        .route("/members/me/password", put(members::change_password))
        .route("/members/me/posts", get(members::my_posts))
        .route("/members/me/comments", get(members::my_comments))
        .route("/members/me/likes", get(members::my_likes))
        .route("/members/nickname-check", get(members::check_nickname))
        .route("/members/:member_id", get(members::get_member))
}

/// Posts with their comments and likes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:post_id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/posts/:post_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/posts/:post_id/likes",
            post(likes::like_post).delete(likes::unlike_post),
        )
        .route(
            "/comments/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/rooms", get(chat::list_rooms).post(chat::create_room))
        .route("/chat/rooms/mine", get(chat::my_rooms))
        .route("/chat/rooms/:room_id/join", post(chat::join_room))
        .route("/chat/rooms/:room_id/leave", post(chat::leave_room))
        .route(
            "/chat/rooms/:room_id/messages",
            get(chat::get_messages).post(chat::send_message),
        )
}

/// Member wallet and coupons
fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(wallet::get_balances))
        .route("/wallet/transactions", get(wallet::get_transactions))
        .route("/wallet/exchange", post(wallet::exchange))
        .route("/coupons/redeem", post(coupons::redeem_coupon))
        .route("/coupons/me", get(coupons::my_coupons))
}

fn roadmap_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/roadmaps",
            get(roadmaps::list_roadmaps).post(roadmaps::generate_roadmap),
        )
        .route(
            "/roadmaps/:roadmap_id",
            get(roadmaps::get_roadmap).delete(roadmaps::delete_roadmap),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(admin::list_members))
        .route("/members/:member_id/status", patch(admin::change_status))
        .route("/members/:member_id/roles", put(admin::change_roles))
        .route(
            "/coupons",
            get(admin::list_coupons).post(admin::issue_coupons),
        )
        .route("/coupons/:coupon_id/assign", post(admin::assign_coupon))
        .route("/wallet/grant", post(admin::grant))
        .route("/wallet/deduct", post(admin::deduct))
        .route(
            "/wallet/:member_id/transactions",
            get(admin::member_transactions),
        )
        .route(
            "/distributions/weekly",
            post(admin::run_weekly_distribution),
        )
        .route("/posts/:post_id", delete(admin::delete_post))
}
