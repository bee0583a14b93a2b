use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{follows, likes, message, user};
use crate::errors::StoreError;
use crate::models::{AuthoredMessage, Message};

pub struct MessageRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MessageRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        MessageRepository { conn }
    }

    /// `text` is expected to be validated already.
    pub async fn create(&self, user_id: i32, text: String) -> Result<Message, StoreError> {
        let model = message::ActiveModel {
            text: Set(text),
            timestamp: Set(Utc::now()),
            user_id: Set(user_id),
            ..Default::default()
        };
        Ok(model.insert(self.conn).await?)
    }

    pub async fn find(&self, id: i32) -> Result<Option<AuthoredMessage>, StoreError> {
        let found = message::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(self.conn)
            .await?;
        Ok(found.and_then(|(msg, author)| author.map(|author| (msg, author))))
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = message::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Newest messages written by `user_id` or anyone they follow.
    pub async fn timeline(&self, user_id: i32, limit: u64) -> Result<Vec<AuthoredMessage>, StoreError> {
        let mut author_ids: Vec<i32> = follows::Entity::find()
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .all(self.conn)
            .await?
            .into_iter()
            .map(|edge| edge.user_being_followed_id)
            .collect();
        author_ids.push(user_id);

        let rows = message::Entity::find()
            .find_also_related(user::Entity)
            .filter(message::Column::UserId.is_in(author_ids))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(msg, author)| author.map(|author| (msg, author)))
            .collect())
    }

    /// Messages `user_id` has liked, with their authors.
    pub async fn liked_by(&self, user_id: i32) -> Result<Vec<AuthoredMessage>, StoreError> {
        let rows = message::Entity::find()
            .find_also_related(user::Entity)
            .join(JoinType::InnerJoin, likes::Relation::Message.def().rev())
            .filter(likes::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::Timestamp)
            .all(self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(msg, author)| author.map(|author| (msg, author)))
            .collect())
    }

    /// Likes the message, or removes the like if it is already there.
    /// Returns whether the message is liked afterwards.
    pub async fn toggle_like(&self, user_id: i32, message_id: i32) -> Result<bool, StoreError> {
        let removed = likes::Entity::delete_many()
            .filter(likes::Column::UserId.eq(user_id))
            .filter(likes::Column::MessageId.eq(message_id))
            .exec(self.conn)
            .await?;
        if removed.rows_affected > 0 {
            return Ok(false);
        }

        let like = likes::ActiveModel {
            user_id: Set(user_id),
            message_id: Set(message_id),
        };
        likes::Entity::insert(like)
            .exec_without_returning(self.conn)
            .await?;
        Ok(true)
    }
}
