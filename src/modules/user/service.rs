use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::user::model::{
    AuthUser, InsertUser, LoginModel, RegisterModel, RegisterResponse, Token,
};
use crate::modules::user::repository::UserRepository;
use crate::storage::StoreError;
use crate::utils::{hash_password, verify_password, Claims};

const INVALID_CREDENTIALS: &str = "Email or password do not matched.";
const INVALID_TOKEN: &str = "Invalid access token";

/// Registration, login and bearer-token verification.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    jwt_secret: Arc<[u8]>,
    access_token_expiration: u64,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository>,
        jwt_secret: &str,
        access_token_expiration: u64,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, jwt_secret: Arc::from(jwt_secret.as_bytes()), access_token_expiration }
    }

    pub async fn register(
        &self,
        user: RegisterModel,
    ) -> Result<RegisterResponse, error::SystemError> {
        let existing =
            self.repo.find_by_email(&user.email).await.map_err(error::SystemError::internal)?;
        if existing.is_some() {
            return Err(error::SystemError::already_exists(format!(
                "Email {} already registered.",
                user.email
            )));
        }

        let hash_password = hash_password(&user.password)?;
        let new_user = InsertUser {
            email: user.email,
            hash_password,
            first_name: user.first_name,
            last_name: user.last_name,
        };

        match self.repo.create(&new_user).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                return Err(error::SystemError::already_exists(format!(
                    "Email {} already registered.",
                    new_user.email
                )));
            }
            Err(e) => return Err(error::SystemError::internal(e)),
        }

        info!("User {} registered", new_user.email);
        let token = self.issue_token(&new_user.email)?;
        Ok(RegisterResponse { email: new_user.email, token })
    }

    pub async fn login(&self, user: LoginModel) -> Result<Token, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(&user.email)
            .await
            .map_err(error::SystemError::internal)?
            .ok_or_else(|| error::SystemError::unauthenticated(INVALID_CREDENTIALS))?;

        if !verify_password(&user_entity.hash_password, &user.password)? {
            return Err(error::SystemError::unauthenticated(INVALID_CREDENTIALS));
        }

        self.issue_token(&user_entity.email)
    }

    /// Verifies a `<type> <token>` pair and returns the caller identity.
    pub fn authenticate(
        &self,
        token_type: &str,
        access_token: &str,
    ) -> Result<AuthUser, error::SystemError> {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(error::SystemError::unauthenticated(INVALID_TOKEN)
                .with_source(format!("token type not supported: {token_type}")));
        }

        let claims = Claims::decode(access_token, &self.jwt_secret)
            .map_err(|e| error::SystemError::unauthenticated(INVALID_TOKEN).with_source(e))?;

        log::debug!("Authenticated {} with token {}", claims.sub, claims.jti);
        Ok(AuthUser { email: claims.sub })
    }

    fn issue_token(&self, email: &str) -> Result<Token, error::SystemError> {
        let access_token =
            Claims::new(email, self.access_token_expiration).encode(&self.jwt_secret)?;
        Ok(Token::bearer(access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::error::ErrorKind, storage::MemoryStore};

    fn service() -> UserService {
        UserService::with_dependencies(Arc::new(MemoryStore::new()), "test-secret", 3600)
    }

    fn register_model(email: &str, password: &str) -> RegisterModel {
        RegisterModel {
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
            first_name: "Foo".to_string(),
            last_name: "Bar".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_register_then_login() {
        let svc = service();
        let registered = svc.register(register_model("foo@mock.com", "pass")).await.unwrap();
        assert_eq!(registered.email, "foo@mock.com");
        assert_eq!(registered.token.token_type, "Bearer");

        let token = svc
            .login(LoginModel { email: "foo@mock.com".into(), password: "pass".into() })
            .await
            .unwrap();
        let user = svc.authenticate(&token.token_type, &token.access_token).unwrap();
        assert_eq!(user.email, "foo@mock.com");
    }

    #[actix_web::test]
    async fn test_register_duplicate_email() {
        let svc = service();
        svc.register(register_model("foo@mock.com", "pass")).await.unwrap();
        let err = svc.register(register_model("foo@mock.com", "other")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[actix_web::test]
    async fn test_login_wrong_password_or_unknown_email() {
        let svc = service();
        svc.register(register_model("foo@mock.com", "pass")).await.unwrap();

        let err = svc
            .login(LoginModel { email: "foo@mock.com".into(), password: "nope".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let err = svc
            .login(LoginModel { email: "ghost@mock.com".into(), password: "pass".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[actix_web::test]
    async fn test_authenticate_rejects_bad_tokens() {
        let svc = service();
        let token = svc.register(register_model("foo@mock.com", "pass")).await.unwrap().token;

        let err = svc.authenticate("Basic", &token.access_token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let err = svc.authenticate("Bearer", "not-a-jwt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        assert!(svc.authenticate("bearer", &token.access_token).is_ok());
    }
}
