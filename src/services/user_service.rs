use surrealdb::sql::Thing;

use crate::{
    entities::user::{Badge, LocalUser, UserRole, TABLE_NAME as USER_TABLE_NAME},
    interfaces::repositories::users::UserRepositoryInterface,
    middleware::{
        error::{AppError, AppResult},
        utils::string_utils::record_id,
    },
};

pub struct UserService<'a, U>
where
    U: UserRepositoryInterface,
{
    users_repository: &'a U,
}

impl<'a, U> UserService<'a, U>
where
    U: UserRepositoryInterface,
{
    pub fn new(users_repository: &'a U) -> Self {
        Self { users_repository }
    }

    pub async fn get(&self, user_id: &str) -> AppResult<LocalUser> {
        let id = record_id(USER_TABLE_NAME, user_id)?;
        self.users_repository.get_by_id(&id).await
    }

    /// Loads the caller and checks the role it acts with.
    pub async fn get_with_role(&self, user_id: &str, role: UserRole) -> AppResult<LocalUser> {
        let user = self.get(user_id).await?;
        if user.role != role {
            return Err(AppError::AuthorizationFail {
                required: role.to_string(),
            });
        }
        Ok(user)
    }

    /// Raises the worker badge to what the current stats allow.
    pub async fn refresh_badge(&self, worker: &Thing) -> AppResult<Badge> {
        let user = self.users_repository.get_by_id(worker).await?;
        let badge = user
            .badge
            .upgraded(user.completed_tasks, user.rating_average);
        if badge != user.badge {
            self.users_repository.set_badge(worker, badge).await?;
            tracing::info!("{} reached badge {badge}", user.id);
        }
        Ok(badge)
    }

    /// Badge refresh for stats that are already committed. A failure is
    /// logged and leaves the badge to the next refresh.
    pub async fn sync_badge(&self, worker: &Thing) -> Option<Badge> {
        match self.refresh_badge(worker).await {
            Ok(badge) => Some(badge),
            Err(err) => {
                tracing::error!("badge refresh for {worker} failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::{Authentication, LocalUserCreate};
    use async_trait::async_trait;
    use chrono::Utc;

    struct StatsRepository {
        completed_tasks: u64,
        rating_average: f64,
        fail_set_badge: bool,
    }

    #[async_trait]
    impl UserRepositoryInterface for StatsRepository {
        async fn create_with_password(
            &self,
            _data: LocalUserCreate,
            _password_hash: String,
        ) -> AppResult<LocalUser> {
            unimplemented!()
        }

        async fn get_by_id(&self, id: &Thing) -> AppResult<LocalUser> {
            Ok(LocalUser {
                id: id.clone(),
                username: "worker_1".to_string(),
                full_name: None,
                email: None,
                role: UserRole::Worker,
                badge: Badge::Bronze,
                completed_tasks: self.completed_tasks,
                total_earnings: 0,
                rating_average: self.rating_average,
                rating_count: 1,
                created_at: Utc::now(),
            })
        }

        async fn get_by_username(&self, _username: &str) -> AppResult<Option<LocalUser>> {
            Ok(None)
        }

        async fn get_password_auth(&self, _user: &Thing) -> AppResult<Option<Authentication>> {
            Ok(None)
        }

        async fn set_badge(&self, _user: &Thing, _badge: Badge) -> AppResult<()> {
            if self.fail_set_badge {
                return Err(AppError::SurrealDb {
                    source: "write failed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn sync_badge_upgrades_with_stats() {
        let repo = StatsRepository {
            completed_tasks: 10,
            rating_average: 4.2,
            fail_set_badge: false,
        };
        let worker = Thing::from((USER_TABLE_NAME, "w1"));
        let badge = UserService::new(&repo).sync_badge(&worker).await;
        assert_eq!(badge, Some(Badge::Silver));
    }

    #[tokio::test]
    async fn sync_badge_swallows_write_errors() {
        let repo = StatsRepository {
            completed_tasks: 10,
            rating_average: 4.2,
            fail_set_badge: true,
        };
        let worker = Thing::from((USER_TABLE_NAME, "w1"));
        let service = UserService::new(&repo);
        assert!(service.refresh_badge(&worker).await.is_err());
        assert_eq!(service.sync_badge(&worker).await, None);
    }
}
