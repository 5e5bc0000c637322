use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;
use uuid::Uuid;

use notehub_db::Database;
use notehub_types::api::{
    Ack, AdminLoginRequest, AdminLoginResponse, LoginRequest, LoginResponse, RegisterRequest,
};
use notehub_types::models::UserProfile;

use crate::error::ApiError;
use crate::password;
use crate::storage::Storage;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    pub storage: Storage,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let first_name = req.first_name.trim();
    let email = req.email.trim().to_lowercase();

    if first_name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation(
            "Required registration fields are missing",
        ));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::validation(
            "Please provide a valid email address",
        ));
    }

    if state.db.get_user_by_email(&email)?.is_some() {
        return Err(ApiError::conflict(
            "This email is already registered in our system",
        ));
    }

    let password_hash = password::hash(&req.password)?;
    let user_id = Uuid::new_v4();
    let username = generate_username(first_name);

    state
        .db
        .create_user(&user_id.to_string(), &username, first_name, &email, &password_hash)?;

    info!("Registered user {} ({})", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(Ack {
            success: true,
            message: "User account created successfully".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation(
            "Authentication requires both email and password",
        ));
    }

    // One message for unknown email and wrong password alike, so login
    // failures do not reveal which accounts exist.
    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(invalid_credentials)?;

    if !password::verify(&req.password, &user.password)? {
        return Err(invalid_credentials());
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("corrupt user id '{}': {}", user.id, e))?;
    let token = state.tokens.issue_user(user_id, &user.email)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Authentication successful, welcome back".to_string(),
        token,
        user: UserProfile {
            id: user_id,
            first_name: user.first_name,
            email: user.email,
            profile_image: user.img,
        },
    }))
}

/// Admin login checks a stored admin principal, hashed like any user
/// credential. The issued token carries only the role claim.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_lowercase();

    let admin = state
        .db
        .get_admin_by_email(&email)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify(&req.password, &admin.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.tokens.issue_admin()?;

    Ok(Json(AdminLoginResponse {
        success: true,
        message: "Welcome Admin".to_string(),
        token,
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid login credentials provided")
}

/// Shape check only: `local@domain.tld`, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Handle generation: display name lowercased with whitespace stripped,
/// suffixed with the current unix-millis timestamp for uniqueness.
fn generate_username(first_name: &str) -> String {
    let base: String = first_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!("{}{}", base, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("notehub-auth-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            tokens: TokenService::new("test-secret"),
            storage: Storage::new(dir).await.unwrap(),
        })
    }

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_rejects_bad_input_and_duplicates() {
        let state = test_state().await;

        let missing = register(
            State(state.clone()),
            Json(RegisterRequest {
                first_name: "  ".to_string(),
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            }),
        )
        .await;
        assert!(matches!(missing, Err(ApiError::Validation(_))));

        let bad_email = register(State(state.clone()), Json(register_req("not-an-email"))).await;
        assert!(matches!(bad_email, Err(ApiError::Validation(_))));

        let created = register(State(state.clone()), Json(register_req("a@x.com")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(created.status(), StatusCode::CREATED);

        // Same address, different case: still one account.
        let duplicate = register(State(state.clone()), Json(register_req("A@X.com"))).await;
        assert!(matches!(duplicate, Err(ApiError::Conflict(_))));
        assert_eq!(state.db.count_users().unwrap(), 1);

        tokio::fs::remove_dir_all(state.storage.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = test_state().await;
        register(State(state.clone()), Json(register_req("a@x.com")))
            .await
            .unwrap();

        let unknown = login(State(state.clone()), Json(login_req("b@x.com", "secret1"))).await;
        let wrong = login(State(state.clone()), Json(login_req("a@x.com", "wrong"))).await;

        let (Err(ApiError::Unauthorized(m1)), Err(ApiError::Unauthorized(m2))) = (unknown, wrong)
        else {
            panic!("expected unauthorized for both failures");
        };
        assert_eq!(m1, m2);

        tokio::fs::remove_dir_all(state.storage.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn login_returns_a_verifiable_token() {
        let state = test_state().await;
        register(State(state.clone()), Json(register_req("a@x.com")))
            .await
            .unwrap();

        let resp = login(State(state.clone()), Json(login_req("a@x.com", "secret1")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.success);
        assert_eq!(body.user.email, "a@x.com");

        let claims = state.tokens.verify_user(&body.token).unwrap();
        assert_eq!(claims.sub, body.user.id);

        tokio::fs::remove_dir_all(state.storage.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn admin_login_checks_the_stored_principal() {
        let state = test_state().await;
        let hash = password::hash("admin-pass").unwrap();
        state
            .db
            .create_admin(&Uuid::new_v4().to_string(), "admin@notehub.app", &hash)
            .unwrap();

        let wrong = admin_login(
            State(state.clone()),
            Json(AdminLoginRequest {
                email: "admin@notehub.app".to_string(),
                password: "nope".to_string(),
            }),
        )
        .await;
        assert!(matches!(wrong, Err(ApiError::Unauthorized(_))));

        let resp = admin_login(
            State(state.clone()),
            Json(AdminLoginRequest {
                email: "Admin@NoteHub.app".to_string(),
                password: "admin-pass".to_string(),
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: AdminLoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(state.tokens.verify_admin(&body.token).is_ok());
        assert!(state.tokens.verify_user(&body.token).is_err());

        tokio::fs::remove_dir_all(state.storage.dir()).await.unwrap();
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));

        assert!(!is_valid_email("ax.com"));
        assert!(!is_valid_email("a@xcom"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@x."));
        assert!(!is_valid_email("a b@x.com"));
        assert!(!is_valid_email("a@b@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn username_strips_whitespace_and_lowercases() {
        let name = generate_username("Ada  Lovelace");
        assert!(name.starts_with("adalovelace"));
        assert!(name.len() > "adalovelace".len());
        assert!(name["adalovelace".len()..].chars().all(|c| c.is_ascii_digit()));
    }
}
