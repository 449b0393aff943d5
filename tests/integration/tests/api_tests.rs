//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_signup() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();

    let response = server.post("/api/auth/signup", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.member.email, request.email.to_lowercase());
    assert_eq!(auth.member.nickname, request.nickname);
    assert_eq!(auth.member.status, "ACTIVE");
    assert_eq!(auth.member.provider, "LOCAL");
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignupRequest::unique();
    server.post("/api/auth/signup", &request).await.unwrap();

    let duplicate = SignupRequest {
        nickname: format!("d{}", unique_suffix()),
        ..request
    };
    let response = server.post("/api/auth/signup", &duplicate).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "EMAIL_ALREADY_EXISTS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_is_case_insensitive_on_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let signup = SignupRequest::unique();
    server.post("/api/auth/signup", &signup).await.unwrap();

    let mut login = LoginRequest::from_signup(&signup);
    login.email = login.email.to_uppercase();
    let response = server.post("/api/auth/login", &login).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.member.nickname, signup.nickname);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        email: "nobody@example.com".to_string(),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/auth/login", &login).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/api/auth/refresh", &request).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // the old refresh token is spent
    let response = server.post("/api/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let request = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server
        .post_auth("/api/auth/logout", &auth.access_token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.post("/api/auth/refresh", &request).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_oauth_login_registers_then_logs_in() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = OAuthLoginRequest::unique();

    let response = server.post("/api/auth/oauth/github", &request).await.unwrap();
    let first: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.member.provider, "GITHUB");

    let response = server.post("/api/auth/oauth/github", &request).await.unwrap();
    let second: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.member.id, second.member.id);
}

// ============================================================================
// Member Tests
// ============================================================================

#[tokio::test]
async fn test_my_page_starts_with_empty_wallet() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let response = server
        .get_auth("/api/members/me", &auth.access_token)
        .await
        .unwrap();
    let me: MyPageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.member.id, auth.member.id);
    assert_eq!(me.balances.token, 0);
    assert_eq!(me.balances.ticket, 0);
}

#[tokio::test]
async fn test_nickname_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let path = format!("/api/members/nickname-check?nickname={}", auth.member.nickname);
    let response = server.get(&path).await.unwrap();
    let check: NicknameCheckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!check.available);

    let path = format!("/api/members/nickname-check?nickname=free{}", unique_suffix());
    let response = server.get(&path).await.unwrap();
    let check: NicknameCheckResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(check.available);
}

#[tokio::test]
async fn test_withdrawn_member_cannot_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let signup = SignupRequest::unique();
    let response = server.post("/api/auth/signup", &signup).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let body = serde_json::json!({ "password": signup.password });
    let response = server
        .client
        .delete(format!("{}/api/members/me", server.base_url()))
        .bearer_auth(&auth.access_token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post("/api/auth/login", &LoginRequest::from_signup(&signup))
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ACCOUNT_WITHDRAWN")
        .await
        .unwrap();

    // the unexpired access token is refused as well
    let response = server
        .post_auth("/api/posts", &auth.access_token, &CreatePostRequest::study())
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ACCOUNT_WITHDRAWN")
        .await
        .unwrap();
}

// ============================================================================
// Post, Comment and Like Tests
// ============================================================================

#[tokio::test]
async fn test_post_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.signup().await.unwrap();
    let reader = server.signup().await.unwrap();

    let response = server
        .post_auth("/api/posts", &author.access_token, &CreatePostRequest::study())
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(post.author_id, author.member.id);
    assert_eq!(post.category, "STUDY");

    let path = format!("/api/posts/{}", post.id);
    let response = server.get_auth(&path, &reader.access_token).await.unwrap();
    let viewed: PostResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(viewed.view_count, post.view_count + 1);
    assert_eq!(viewed.liked, Some(false));

    // only the author may edit
    let edit = serde_json::json!({ "title": "taken over" });
    let response = server
        .patch_auth(&path, &reader.access_token, &edit)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_POST_AUTHOR")
        .await
        .unwrap();

    let response = server.delete_auth(&path, &author.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "POST_NOT_FOUND")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_posts_by_category() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.signup().await.unwrap();
    server
        .post_auth("/api/posts", &author.access_token, &CreatePostRequest::study())
        .await
        .unwrap();

    let response = server.get("/api/posts?category=study&size=5").await.unwrap();
    let page: Page<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.size, 5);
    assert!(page.total_elements >= 1);
    assert!(page.content.iter().all(|p| p.category == "STUDY"));

    let response = server.get("/api/posts?category=gossip").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_like_once_per_member() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.signup().await.unwrap();
    let fan = server.signup().await.unwrap();

    let response = server
        .post_auth("/api/posts", &author.access_token, &CreatePostRequest::study())
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/api/posts/{}/likes", post.id);

    let response = server.post_empty_auth(&path, &fan.access_token).await.unwrap();
    let like: LikeResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(like.liked);
    assert_eq!(like.like_count, 1);

    let response = server.post_empty_auth(&path, &fan.access_token).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "ALREADY_LIKED")
        .await
        .unwrap();

    let response = server.delete_auth(&path, &fan.access_token).await.unwrap();
    let like: LikeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!like.liked);
    assert_eq!(like.like_count, 0);
}

#[tokio::test]
async fn test_comment_thread_keeps_deleted_parent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.signup().await.unwrap();
    let token = &author.access_token;

    let response = server
        .post_auth("/api/posts", token, &CreatePostRequest::study())
        .await
        .unwrap();
    let post: PostResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let comments_path = format!("/api/posts/{}/comments", post.id);

    let response = server
        .post_auth(&comments_path, token, &CreateCommentRequest::top_level("first"))
        .await
        .unwrap();
    let parent: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &comments_path,
            token,
            &CreateCommentRequest::reply("answer", &parent.id),
        )
        .await
        .unwrap();
    let reply: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.parent_id.as_deref(), Some(parent.id.as_str()));

    let response = server
        .delete_auth(&format!("/api/comments/{}", parent.id), token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&comments_path).await.unwrap();
    let thread: Vec<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert!(thread[0].deleted);
    assert_eq!(thread[0].replies.len(), 1);
    assert_eq!(thread[0].replies[0].content, "answer");
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_chat_room_capacity_and_messages() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.signup().await.unwrap();
    let guest = server.signup().await.unwrap();
    let late = server.signup().await.unwrap();

    let response = server
        .post_auth(
            "/api/chat/rooms",
            &owner.access_token,
            &CreateRoomRequest::with_capacity(2),
        )
        .await
        .unwrap();
    let room: ChatRoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(room.owner_id, owner.member.id);
    assert_eq!(room.member_count, 1);

    let join = format!("/api/chat/rooms/{}/join", room.id);
    let response = server.post_empty_auth(&join, &guest.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.post_empty_auth(&join, &late.access_token).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "CHAT_ROOM_FULL")
        .await
        .unwrap();

    let messages = format!("/api/chat/rooms/{}/messages", room.id);
    let talk = SendMessageRequest {
        content: "hello team".to_string(),
    };
    let response = server
        .post_auth(&messages, &guest.access_token, &talk)
        .await
        .unwrap();
    let sent: ChatMessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(sent.kind, "TALK");

    // outsiders cannot read the room
    let response = server.get_auth(&messages, &late.access_token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_ROOM_MEMBER")
        .await
        .unwrap();

    let response = server.get_auth(&messages, &owner.access_token).await.unwrap();
    let history: Vec<ChatMessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history[0].id, sent.id);
    assert_eq!(history[0].sender_id, guest.member.id);
}

// ============================================================================
// Wallet, Coupon and Roadmap Tests
// ============================================================================

#[tokio::test]
async fn test_exchange_requires_tokens() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let response = server
        .post_auth(
            "/api/wallet/exchange",
            &auth.access_token,
            &ExchangeRequest { tickets: 1 },
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INSUFFICIENT_BALANCE")
        .await
        .unwrap();

    let response = server
        .get_auth("/api/wallet", &auth.access_token)
        .await
        .unwrap();
    let balances: BalanceResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(balances.token, 0);
}

#[tokio::test]
async fn test_redeem_unknown_coupon() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let request = RedeemCouponRequest {
        code: format!("NOPE{}", unique_suffix()),
    };
    let response = server
        .post_auth("/api/coupons/redeem", &auth.access_token, &request)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "COUPON_NOT_FOUND")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_roadmap_needs_a_ticket() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let request = GenerateRoadmapRequest {
        topic: "Rust".to_string(),
        level: "BEGINNER".to_string(),
        weeks: 4,
    };
    let response = server
        .post_auth("/api/roadmaps", &auth.access_token, &request)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INSUFFICIENT_BALANCE")
        .await
        .unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_members() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.signup().await.unwrap();

    let response = server
        .get_auth("/api/admin/members", &auth.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "ADMIN_REQUIRED")
        .await
        .unwrap();
}
