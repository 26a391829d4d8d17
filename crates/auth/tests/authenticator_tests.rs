use rentease_auth::{
    AuthError, Authenticator, Registration, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};
use rentease_config::{AuthConfig, DatabaseConfig};
use rentease_database::{initialize_database, UserRole};
use sqlx::SqlitePool;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("auth.sqlite").display()),
            max_connections: 2,
        };
        let pool = initialize_database(&db_config).await?;

        let auth_config = AuthConfig {
            jwt_secret: Some("test-secret".into()),
            token_ttl_seconds: 3_600,
        };
        let authenticator = Authenticator::new(pool.clone(), &auth_config);

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }
}

fn tenant<'a>(username: &'a str, email: &'a str) -> Registration<'a> {
    Registration {
        username,
        email,
        password: "tenant-pass",
        role: UserRole::Tenant,
    }
}

#[tokio::test]
async fn register_then_login_issues_a_usable_token() -> TestResult {
    let ctx = TestContext::new().await?;

    let user = ctx
        .authenticator
        .register(&tenant("asha", "asha@example.com"))
        .await?;
    assert_eq!(user.role, UserRole::Tenant);
    assert_ne!(user.password_hash, "tenant-pass");

    let session = ctx.authenticator.login("asha", "tenant-pass").await?;
    assert_eq!(session.user.id, user.id);

    let resolved = ctx.authenticator.authenticate_token(&session.token).await?;
    assert_eq!(resolved.username, "asha");
    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator
        .register(&tenant("asha", "asha@example.com"))
        .await?;

    assert!(matches!(
        ctx.authenticator.login("asha", "wrong-pass").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        ctx.authenticator.login("nobody", "tenant-pass").await,
        Err(AuthError::InvalidCredentials)
    ));
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_reports_the_colliding_field() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator
        .register(&tenant("asha", "asha@example.com"))
        .await?;

    match ctx
        .authenticator
        .register(&tenant("asha", "other@example.com"))
        .await
    {
        Err(AuthError::UserExists(message)) => assert_eq!(message, "Username already exists"),
        other => panic!("expected duplicate username, got {other:?}"),
    }

    match ctx
        .authenticator
        .register(&tenant("ravi", "asha@example.com"))
        .await
    {
        Err(AuthError::UserExists(message)) => assert_eq!(message, "Email already exists"),
        other => panic!("expected duplicate email, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_hitting_the_database() -> TestResult {
    let ctx = TestContext::new().await?;

    let result = ctx
        .authenticator
        .register(&tenant("asha", "not-an-email"))
        .await;
    assert!(matches!(result, Err(AuthError::Validation(_))));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn tokens_for_deleted_accounts_stop_working() -> TestResult {
    let ctx = TestContext::new().await?;
    let user = ctx
        .authenticator
        .register(&tenant("asha", "asha@example.com"))
        .await?;
    let session = ctx.authenticator.login("asha", "tenant-pass").await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user.id)
        .execute(&ctx.pool)
        .await?;

    assert!(matches!(
        ctx.authenticator.authenticate_token(&session.token).await,
        Err(AuthError::InvalidToken)
    ));
    Ok(())
}

#[tokio::test]
async fn garbage_tokens_are_invalid() -> TestResult {
    let ctx = TestContext::new().await?;
    assert!(matches!(
        ctx.authenticator.authenticate_token("not.a.jwt").await,
        Err(AuthError::InvalidToken)
    ));
    Ok(())
}

#[tokio::test]
async fn default_admin_is_created_once_and_can_log_in() -> TestResult {
    let ctx = TestContext::new().await?;

    assert!(ctx.authenticator.ensure_default_admin(None).await?);
    assert!(!ctx.authenticator.ensure_default_admin(None).await?);

    let session = ctx
        .authenticator
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await?;
    assert_eq!(session.user.role, UserRole::Admin);
    assert_eq!(session.user.email, "admin@rental.com");
    Ok(())
}

#[tokio::test]
async fn reset_password_replaces_the_old_one() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.authenticator.ensure_default_admin(None).await?;

    ctx.authenticator
        .reset_password(DEFAULT_ADMIN_USERNAME, "rotated-secret")
        .await?;

    assert!(ctx
        .authenticator
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await
        .is_err());
    ctx.authenticator
        .login(DEFAULT_ADMIN_USERNAME, "rotated-secret")
        .await?;
    Ok(())
}
