//! Authentication service implementation
//!
//! This service handles user signup, the combined user/admin login flow,
//! session issue and teardown, profile edits and the user dashboard context.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::database::DatabaseService;
use crate::models::admin::{AdminProfile, AdminRegisterRequest};
use crate::models::college::{College, CreateCollegeRequest};
use crate::models::credential::Credential;
use crate::models::user::{SignupRequest, UpdateProfileRequest, UserProfile};
use crate::models::Account;
use crate::session::{SessionExpiry, SessionKind, SessionStore, SessionToken};
use crate::utils::errors::{CampusBuddyError, Result};
use crate::utils::helpers::{
    clean_optional, format_short_date, is_valid_email, is_valid_phone, join_preferences,
};
use crate::utils::logging::{log_admin_action, log_auth_event};

const GENDERS: [&str; 3] = ["M", "F", "O"];
const DASHBOARD_ITEMS: i64 = 5;

/// Authentication and account service
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseService,
    sessions: SessionStore,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: DatabaseService, sessions: SessionStore) -> Self {
        Self { db, sessions }
    }

    /// Check a username/password pair against users first, then admins.
    /// Legacy plain-text credentials are rehashed on first successful use.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Please enter both username and password".to_string(),
            ));
        }

        // Duplicate usernames are allowed, every candidate row gets a chance
        let candidates = self.db.users.find_by_username_iexact(username).await?;
        let mut matched_name = !candidates.is_empty();
        for user in candidates {
            if let Some(user) = self.verify_user(user, password).await? {
                return Ok(Account::User(user));
            }
        }

        if let Some(admin) = self.db.admins.find_by_admin_name_iexact(username).await? {
            matched_name = true;
            if let Some(admin) = self.verify_admin(admin, password).await? {
                return Ok(Account::Admin(admin));
            }
        }

        debug!(username = username, "Authentication failed");
        if matched_name {
            Err(CampusBuddyError::InvalidCredential)
        } else {
            Err(CampusBuddyError::UserNotFound {
                user_id: username.to_string(),
            })
        }
    }

    /// Authenticate and open a session for the matched account
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<(Account, SessionToken)> {
        let account = self.authenticate(username, password).await?;

        let kind = match &account {
            Account::User(_) => SessionKind::User,
            Account::Admin(_) => SessionKind::Admin,
        };
        let expiry = if remember {
            SessionExpiry::Remembered
        } else {
            SessionExpiry::SessionScoped
        };

        let token = SessionToken::generate();
        self.sessions
            .store(kind, &token, account.public_id(), expiry)
            .await?;

        log_auth_event(account.public_id(), "login", None);
        info!(
            account_id = account.public_id(),
            kind = kind.as_str(),
            remember = remember,
            "Login successful"
        );

        Ok((account, token))
    }

    /// Resolve a session token to the signed-in user, if any
    pub async fn current_user(&self, token: &SessionToken) -> Result<Option<UserProfile>> {
        match self.sessions.lookup(SessionKind::User, token).await? {
            Some(user_id) => self.db.users.find_by_user_id(&user_id).await,
            None => Ok(None),
        }
    }

    /// Resolve a session token to the signed-in admin, if any
    pub async fn current_admin(&self, token: &SessionToken) -> Result<Option<AdminProfile>> {
        match self.sessions.lookup(SessionKind::Admin, token).await? {
            Some(admin_id) => self.db.admins.find_by_admin_id(&admin_id).await,
            None => Ok(None),
        }
    }

    /// End a user session, an admin session under the same token survives
    pub async fn logout_user(&self, token: &SessionToken) -> Result<()> {
        if let Some(user_id) = self.sessions.lookup(SessionKind::User, token).await? {
            log_auth_event(&user_id, "logout", None);
        }
        self.sessions.clear(SessionKind::User, token).await
    }

    /// End an admin session, user sessions are untouched
    pub async fn logout_admin(&self, token: &SessionToken) -> Result<()> {
        if let Some(admin_id) = self.sessions.lookup(SessionKind::Admin, token).await? {
            log_auth_event(&admin_id, "logout", None);
        }
        self.sessions.clear(SessionKind::Admin, token).await
    }

    /// Create a new user account with a hashed credential
    pub async fn signup_user(&self, request: SignupRequest) -> Result<UserProfile> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Username must not be empty".to_string(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(CampusBuddyError::InvalidInput(
                "Invalid email address".to_string(),
            ));
        }
        if request.password.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Password must not be empty".to_string(),
            ));
        }
        if self.db.users.email_exists(&email).await? {
            return Err(CampusBuddyError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password = Credential::hash_password(&request.password)?;

        // Concurrent signups can collide on the scanned id, retry with fresh ids
        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let user_id = self.db.users.next_user_id(&mut tx).await?;

            match self
                .db
                .users
                .create(&mut tx, &user_id, &username, &email, &password)
                .await
            {
                Ok(user) => {
                    tx.commit().await?;
                    log_auth_event(&user.user_id, "signup", None);
                    info!(user_id = %user.user_id, "User signed up");
                    return Ok(user);
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying signup after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Create an admin account together with its college, atomically
    pub async fn register_admin(
        &self,
        request: AdminRegisterRequest,
    ) -> Result<(AdminProfile, College)> {
        let full_name = request.full_name.trim().to_string();
        let admin_name = request.admin_name.trim().to_string();
        let contact_no = request.contact_no.trim().to_string();
        let email = request.email.trim().to_lowercase();
        let college_name = request.college_name.trim().to_string();

        if full_name.is_empty() || admin_name.is_empty() || college_name.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Name fields must not be empty".to_string(),
            ));
        }
        if !is_valid_phone(&contact_no) {
            return Err(CampusBuddyError::InvalidInput(
                "Invalid contact number".to_string(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(CampusBuddyError::InvalidInput(
                "Invalid email address".to_string(),
            ));
        }
        if !GENDERS.contains(&request.gender.as_str()) {
            return Err(CampusBuddyError::InvalidInput(
                "Gender must be one of M, F or O".to_string(),
            ));
        }
        if request.password.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Password must not be empty".to_string(),
            ));
        }
        if self.db.admins.email_exists(&email).await? {
            return Err(CampusBuddyError::Conflict(
                "An admin with this email already exists".to_string(),
            ));
        }
        if self.db.colleges.name_exists_iexact(&college_name).await? {
            return Err(CampusBuddyError::Conflict(
                "A college with this name already exists".to_string(),
            ));
        }

        let password = Credential::hash_password(&request.password)?;
        let college_request = CreateCollegeRequest {
            name: college_name,
            contact_no: clean_optional(request.college_contact_no.clone()),
            email: clean_optional(request.college_email.clone()),
            location: clean_optional(request.college_location.clone()),
        };

        let mut attempts = 0;
        loop {
            let mut tx = self.db.begin().await?;
            let admin_id = self.db.admins.next_admin_id(&mut tx).await?;
            let college_id = self.db.colleges.next_college_id(&mut tx).await?;

            let created = async {
                let admin = self
                    .db
                    .admins
                    .create(
                        &mut tx,
                        &admin_id,
                        &full_name,
                        &admin_name,
                        &contact_no,
                        &email,
                        &request.gender,
                        &password,
                    )
                    .await?;
                let college = self
                    .db
                    .colleges
                    .create(&mut tx, &college_id, &college_request, &admin.admin_id)
                    .await?;
                Ok::<_, CampusBuddyError>((admin, college))
            }
            .await;

            match created {
                Ok((admin, college)) => {
                    tx.commit().await?;
                    log_admin_action(
                        &admin.admin_id,
                        "register",
                        Some(&college.college_id),
                        None,
                    );
                    info!(
                        admin_id = %admin.admin_id,
                        college_id = %college.college_id,
                        "Admin and college registered"
                    );
                    return Ok((admin, college));
                }
                Err(e) if e.is_unique_violation() && attempts < 2 => {
                    attempts += 1;
                    tx.rollback().await?;
                    warn!(attempt = attempts, "Retrying admin registration after id collision");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Update the two editable profile fields
    pub async fn update_profile(
        &self,
        actor: &UserProfile,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        let profile_info = request
            .profile_info
            .as_deref()
            .map(str::trim)
            .filter(|info| !info.is_empty());
        let preferences = join_preferences(&request.preferences);

        let user = self
            .db
            .users
            .update_profile(&actor.user_id, profile_info, preferences.as_deref())
            .await?;

        info!(user_id = %actor.user_id, "Profile updated");
        Ok(user)
    }

    /// Dashboard context: the user plus their most recent activity
    pub async fn user_dashboard(&self, actor: &UserProfile) -> Result<serde_json::Value> {
        let recent_registrations = self
            .db
            .registrations
            .recent_by_user(&actor.user_id, DASHBOARD_ITEMS)
            .await?;
        let recent_uploads = self
            .db
            .ugc
            .recent_by_user(&actor.user_id, DASHBOARD_ITEMS)
            .await?;

        let registrations: Vec<serde_json::Value> = recent_registrations
            .into_iter()
            .map(|row| {
                let date_str = row
                    .event_date
                    .map(|dt| format_short_date(dt.date_naive()))
                    .unwrap_or_default();
                json!({ "label": row.event_title, "date_str": date_str })
            })
            .collect();
        let uploads: Vec<serde_json::Value> = recent_uploads
            .into_iter()
            .map(|row| {
                json!({
                    "label": format!("{} ({})", row.ugc_id, row.content_type),
                    "meta": row.content_data.unwrap_or_default(),
                })
            })
            .collect();

        Ok(json!({
            "account_user": {
                "user_id": actor.user_id,
                "username": actor.username,
                "email": actor.email,
                "profile_info": actor.profile_info,
                "preferences": actor.preferences,
            },
            "registrations": registrations,
            "uploads": uploads,
        }))
    }

    async fn verify_user(
        &self,
        user: UserProfile,
        password: &str,
    ) -> Result<Option<UserProfile>> {
        let credential = Credential::parse(&user.password);
        if !credential.verify(password) {
            return Ok(None);
        }

        if credential.needs_upgrade() {
            let hashed = Credential::hash_password(password)?;
            self.db.users.update_password(&user.user_id, &hashed).await?;
            log_auth_event(&user.user_id, "password_upgrade", None);
            return Ok(Some(UserProfile {
                password: hashed,
                ..user
            }));
        }

        Ok(Some(user))
    }

    async fn verify_admin(
        &self,
        admin: AdminProfile,
        password: &str,
    ) -> Result<Option<AdminProfile>> {
        let credential = Credential::parse(&admin.password);
        if !credential.verify(password) {
            return Ok(None);
        }

        if credential.needs_upgrade() {
            let hashed = Credential::hash_password(password)?;
            self.db
                .admins
                .update_password(&admin.admin_id, &hashed)
                .await?;
            log_auth_event(&admin.admin_id, "password_upgrade", None);
            return Ok(Some(AdminProfile {
                password: hashed,
                ..admin
            }));
        }

        Ok(Some(admin))
    }
}
