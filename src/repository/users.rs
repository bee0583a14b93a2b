use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::user::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use crate::entities::{follows, likes, message, user};
use crate::errors::StoreError;
use crate::models::{Message, NewUser, ProfileUpdate, Relationships, User};

/// Data access for users and the follows/likes edges hanging off them.
pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        UserRepository { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(user::Entity::find_by_id(id).one(self.conn).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn)
            .await?;
        Ok(user)
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>, StoreError> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Id);
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(user::Column::Username.contains(term));
        }
        Ok(query.all(self.conn).await?)
    }

    /// Uniqueness of username and email is left to the store.
    pub async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password: Set(new_user.password),
            image_url: Set(Some(new_user.image_url)),
            header_image_url: Set(Some(new_user.header_image_url)),
            ..Default::default()
        };

        let user = model.insert(self.conn).await?;
        log::info!("Created {}", user);
        Ok(user)
    }

    pub async fn update_profile(&self, user: User, update: ProfileUpdate) -> Result<User, StoreError> {
        let mut model: user::ActiveModel = user.into();
        model.username = Set(update.username);
        model.email = Set(update.email);
        model.image_url = Set(Some(
            update.image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
        ));
        model.header_image_url = Set(Some(
            update
                .header_image_url
                .unwrap_or_else(|| DEFAULT_HEADER_IMAGE_URL.to_string()),
        ));
        model.bio = Set(update.bio);
        model.location = Set(update.location);

        Ok(model.update(self.conn).await?)
    }

    /// Follows, likes and messages go with the user through cascading keys.
    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = user::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn is_following(&self, user_id: i32, other_id: i32) -> Result<bool, StoreError> {
        let edge = follows::Entity::find()
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .filter(follows::Column::UserBeingFollowedId.eq(other_id))
            .one(self.conn)
            .await?;
        Ok(edge.is_some())
    }

    pub async fn is_followed_by(&self, user_id: i32, other_id: i32) -> Result<bool, StoreError> {
        self.is_following(other_id, user_id).await
    }

    pub async fn followers(&self, user_id: i32) -> Result<Vec<User>, StoreError> {
        let users = user::Entity::find()
            .join(JoinType::InnerJoin, follows::Relation::Follower.def().rev())
            .filter(follows::Column::UserBeingFollowedId.eq(user_id))
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?;
        Ok(users)
    }

    pub async fn following(&self, user_id: i32) -> Result<Vec<User>, StoreError> {
        let users = user::Entity::find()
            .join(JoinType::InnerJoin, follows::Relation::Followed.def().rev())
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .order_by_asc(user::Column::Id)
            .all(self.conn)
            .await?;
        Ok(users)
    }

    /// Returns `false` when the edge already existed, including when a
    /// concurrent follow inserted it first.
    pub async fn follow(&self, user_id: i32, other_id: i32) -> Result<bool, StoreError> {
        let edge = follows::ActiveModel {
            user_being_followed_id: Set(other_id),
            user_following_id: Set(user_id),
        };

        match follows::Entity::insert(edge)
            .exec_without_returning(self.conn)
            .await
            .map_err(StoreError::from)
        {
            Ok(_) => Ok(true),
            // a missing user is also an integrity error; only the duplicate is a no-op
            Err(StoreError::Integrity(detail)) => {
                if self.is_following(user_id, other_id).await? {
                    log::debug!("Follow #{} -> #{} already exists", user_id, other_id);
                    Ok(false)
                } else {
                    Err(StoreError::Integrity(detail))
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn unfollow(&self, user_id: i32, other_id: i32) -> Result<bool, StoreError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserFollowingId.eq(user_id))
            .filter(follows::Column::UserBeingFollowedId.eq(other_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn likes(&self, user_id: i32) -> Result<Vec<Message>, StoreError> {
        let messages = message::Entity::find()
            .join(JoinType::InnerJoin, likes::Relation::Message.def().rev())
            .filter(likes::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::Timestamp)
            .all(self.conn)
            .await?;
        Ok(messages)
    }

    pub async fn liked_message_ids(&self, user_id: i32) -> Result<HashSet<i32>, StoreError> {
        let edges = likes::Entity::find()
            .filter(likes::Column::UserId.eq(user_id))
            .all(self.conn)
            .await?;
        Ok(edges.into_iter().map(|like| like.message_id).collect())
    }

    pub async fn messages(&self, user_id: i32) -> Result<Vec<Message>, StoreError> {
        let messages = message::Entity::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .all(self.conn)
            .await?;
        Ok(messages)
    }

    pub async fn relationships(&self, user_id: i32) -> Result<Relationships, StoreError> {
        Ok(Relationships {
            messages: self.messages(user_id).await?,
            followers: self.followers(user_id).await?,
            following: self.following(user_id).await?,
            likes: self.likes(user_id).await?,
        })
    }
}
