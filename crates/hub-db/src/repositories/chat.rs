//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use hub_core::entities::{ChatMessage, ChatRoom, ChatRoomMember, ChatRoomView, RoomDeparture};
use hub_core::error::DomainError;
use hub_core::traits::{ChatRepository, RepoResult};
use hub_core::value_objects::{Id, Page, PageRequest};

use crate::mappers::convert_all;
use crate::models::{ChatMessageModel, ChatRoomModel, ChatRoomViewModel};

use super::error::{map_db_error, map_unique_violation};

const ROOM_VIEW_SELECT: &str = r"
    SELECT r.id, r.name, r.owner_id, r.max_members, r.created_at, r.deleted_at,
           (SELECT COUNT(*) FROM chat_room_members cm WHERE cm.room_id = r.id) AS member_count
    FROM chat_rooms r
";

/// Lock an open room's row for the rest of the transaction
async fn lock_room(conn: &mut PgConnection, room_id: Id) -> RepoResult<ChatRoom> {
    sqlx::query_as::<_, ChatRoomModel>(
        r"
        SELECT id, name, owner_id, max_members, created_at, deleted_at
        FROM chat_rooms
        WHERE id = $1 AND deleted_at IS NULL
        FOR UPDATE
        ",
    )
    .bind(room_id.into_inner())
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?
    .map(ChatRoom::from)
    .ok_or(DomainError::ChatRoomNotFound(room_id))
}

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    async fn create_room(&self, room: &ChatRoom) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO chat_rooms (id, name, owner_id, max_members, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(room.owner_id.into_inner())
        .bind(room.max_members)
        .bind(room.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"INSERT INTO chat_room_members (room_id, member_id, joined_at) VALUES ($1, $2, $3)",
        )
        .bind(room.id.into_inner())
        .bind(room.owner_id.into_inner())
        .bind(room.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_room(&self, id: Id) -> RepoResult<Option<ChatRoom>> {
        let result = sqlx::query_as::<_, ChatRoomModel>(
            r"
            SELECT id, name, owner_id, max_members, created_at, deleted_at
            FROM chat_rooms
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatRoom::from))
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self, page: PageRequest) -> RepoResult<Page<ChatRoomView>> {
        let total = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM chat_rooms WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let sql = format!(
            "{ROOM_VIEW_SELECT} WHERE r.deleted_at IS NULL ORDER BY r.id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, ChatRoomViewModel>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(convert_all(rows)?, page, total))
    }

    #[instrument(skip(self))]
    async fn list_rooms_of(&self, member_id: Id) -> RepoResult<Vec<ChatRoomView>> {
        let sql = format!(
            "{ROOM_VIEW_SELECT} \
             JOIN chat_room_members me ON me.room_id = r.id AND me.member_id = $1 \
             WHERE r.deleted_at IS NULL \
             ORDER BY me.joined_at DESC"
        );
        let rows = sqlx::query_as::<_, ChatRoomViewModel>(&sql)
            .bind(member_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn join(&self, membership: &ChatRoomMember) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes joins and leaves so the capacity check holds
        let room = lock_room(&mut *tx, membership.room_id).await?;

        let current = sqlx::query_scalar::<_, i64>(
            r"SELECT COUNT(*) FROM chat_room_members WHERE room_id = $1",
        )
        .bind(membership.room_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let already = sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS(SELECT 1 FROM chat_room_members WHERE room_id = $1 AND member_id = $2)",
        )
        .bind(membership.room_id.into_inner())
        .bind(membership.member_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if already {
            return Err(DomainError::AlreadyJoined);
        }
        room.ensure_capacity(current)?;

        sqlx::query(
            r"INSERT INTO chat_room_members (room_id, member_id, joined_at) VALUES ($1, $2, $3)",
        )
        .bind(membership.room_id.into_inner())
        .bind(membership.member_id.into_inner())
        .bind(membership.joined_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyJoined))?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn leave(&self, room_id: Id, member_id: Id) -> RepoResult<RoomDeparture> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let room = lock_room(&mut *tx, room_id).await?;

        let result =
            sqlx::query(r"DELETE FROM chat_room_members WHERE room_id = $1 AND member_id = $2")
                .bind(room_id.into_inner())
                .bind(member_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotRoomMember);
        }

        let next = sqlx::query_scalar::<_, i64>(
            r"
            SELECT member_id
            FROM chat_room_members
            WHERE room_id = $1
            ORDER BY joined_at ASC, member_id ASC
            LIMIT 1
            ",
        )
        .bind(room_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(Id::new);

        let departure = room.departure(member_id, next);
        match departure {
            RoomDeparture::Closed => {
                sqlx::query(r"UPDATE chat_rooms SET deleted_at = NOW() WHERE id = $1")
                    .bind(room_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            RoomDeparture::OwnerTransferred(owner_id) => {
                sqlx::query(r"UPDATE chat_rooms SET owner_id = $2 WHERE id = $1")
                    .bind(room_id.into_inner())
                    .bind(owner_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            }
            RoomDeparture::Left => {}
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(departure)
    }

    #[instrument(skip(self))]
    async fn is_member(&self, room_id: Id, member_id: Id) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"SELECT EXISTS(SELECT 1 FROM chat_room_members WHERE room_id = $1 AND member_id = $2)",
        )
        .bind(room_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn save_message(&self, message: &ChatMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, room_id, sender_id, kind, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(message.id.into_inner())
        .bind(message.room_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(message.kind.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn messages(
        &self,
        room_id: Id,
        before: Option<Id>,
        limit: i64,
    ) -> RepoResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessageModel>(
            r"
            SELECT id, room_id, sender_id, kind, content, created_at
            FROM chat_messages
            WHERE room_id = $1 AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            ",
        )
        .bind(room_id.into_inner())
        .bind(before.map(Id::into_inner))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }
}
