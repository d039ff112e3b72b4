use super::{internal, Service};
use crate::contract::{
    CatalogKind, MaintenanceError, NewUser, User, UserFunction, UserPermissions,
};
use crate::domain::validation::{normalize_text, unique_key, validate_email};
use uuid::Uuid;

impl Service {
    // ===== Users =====

    pub async fn list_users(&self) -> Result<Vec<User>, MaintenanceError> {
        let mut users = self.repos.access.list_users().await.map_err(internal)?;
        users.sort_by_key(|u| unique_key(&u.full_name));
        Ok(users)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, MaintenanceError> {
        self.repos
            .access
            .find_user(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("User", id))
    }

    /// Register the profile row of an authenticated user
    pub async fn create_user(&self, user: NewUser) -> Result<User, MaintenanceError> {
        let exists = self
            .repos
            .access
            .find_user(user.id)
            .await
            .map_err(internal)?;
        if exists.is_some() {
            return Err(MaintenanceError::conflict(format!(
                "User {} already exists",
                user.id
            )));
        }
        let (email, full_name) = self.check_user(None, &user.email, &user.full_name).await?;
        let user = NewUser {
            id: user.id,
            email,
            full_name,
        };
        let created = self
            .repos
            .access
            .create_user(&user)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %created.id, "user created");
        Ok(created)
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        full_name: &str,
    ) -> Result<User, MaintenanceError> {
        self.get_user(id).await?;
        let (email, full_name) = self.check_user(Some(id), email, full_name).await?;
        let updated = self
            .repos
            .access
            .update_user(id, &email, &full_name)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %id, "user updated");
        Ok(updated)
    }

    pub async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<(), MaintenanceError> {
        self.get_user(id).await?;
        self.repos
            .access
            .set_user_active(id, is_active)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %id, is_active, "user activation changed");
        Ok(())
    }

    // ===== Functions =====

    pub async fn user_functions(&self, user_id: Uuid) -> Result<Vec<UserFunction>, MaintenanceError> {
        self.get_user(user_id).await?;
        self.repos
            .access
            .user_functions(user_id)
            .await
            .map_err(internal)
    }

    pub async fn grant_function(
        &self,
        user_id: Uuid,
        function_id: i32,
    ) -> Result<UserFunction, MaintenanceError> {
        self.get_user(user_id).await?;
        let function = self
            .get_catalog_entry(CatalogKind::Function, function_id)
            .await?;

        let granted = self
            .repos
            .access
            .user_functions(user_id)
            .await
            .map_err(internal)?;
        if granted.iter().any(|g| g.function_id == function_id) {
            return Err(MaintenanceError::conflict(format!(
                "Function '{}' is already granted to user {}",
                function.description, user_id
            )));
        }

        let grant = self
            .repos
            .access
            .grant(user_id, function_id)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %user_id, function_id, "function granted");
        Ok(grant)
    }

    pub async fn revoke_function(
        &self,
        user_id: Uuid,
        function_id: i32,
    ) -> Result<(), MaintenanceError> {
        self.get_user(user_id).await?;
        let granted = self
            .repos
            .access
            .user_functions(user_id)
            .await
            .map_err(internal)?;
        if !granted.iter().any(|g| g.function_id == function_id) {
            return Err(MaintenanceError::not_found(
                "User function",
                format!("{}/{}", user_id, function_id),
            ));
        }
        self.repos
            .access
            .revoke(user_id, function_id)
            .await
            .map_err(internal)?;
        tracing::info!(user_id = %user_id, function_id, "function revoked");
        Ok(())
    }

    /// Functions a user may use; an inactive user gets none
    pub async fn permissions_for(&self, user_id: Uuid) -> Result<UserPermissions, MaintenanceError> {
        let user = self.get_user(user_id).await?;
        if !user.is_active {
            tracing::debug!(user_id = %user_id, "inactive user, no permissions");
            return Ok(UserPermissions {
                user_id,
                functions: Vec::new(),
            });
        }
        let mut functions = self
            .repos
            .access
            .permissions(user_id)
            .await
            .map_err(internal)?;
        functions.sort_by_key(|f| unique_key(&f.description));
        Ok(UserPermissions { user_id, functions })
    }

    async fn check_user(
        &self,
        existing_id: Option<Uuid>,
        email: &str,
        full_name: &str,
    ) -> Result<(String, String), MaintenanceError> {
        let email = validate_email(email)?;
        let full_name = normalize_text("Full name", full_name, self.config.max_description_length)?;

        let users = self.repos.access.list_users().await.map_err(internal)?;
        if users
            .iter()
            .any(|u| Some(u.id) != existing_id && unique_key(&u.email) == email)
        {
            return Err(MaintenanceError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }
        Ok((email, full_name))
    }
}
