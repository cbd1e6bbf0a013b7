use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct RegisterModel {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email is too long")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
    pub password_confirmation: String,
    #[validate(length(min = 1, max = 100, message = "First name must be 1 to 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1 to 100 characters"))]
    pub last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Token { access_token, token_type: "Bearer".to_string() }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub email: String,
    #[serde(flatten)]
    pub token: Token,
}

/// Identity of the caller, attached to the request by the auth middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_model(first_name: String) -> RegisterModel {
        RegisterModel {
            email: "foo@mock.com".into(),
            password: "secret".into(),
            password_confirmation: "secret".into(),
            first_name,
            last_name: "Bar".into(),
        }
    }

    #[test]
    fn test_register_name_length_limits() {
        assert!(register_model("a".repeat(100)).validate().is_ok());
        assert!(register_model("a".repeat(101)).validate().is_err());
        assert!(register_model(String::new()).validate().is_err());
    }

    #[test]
    fn test_register_password_confirmation_must_match() {
        let model =
            RegisterModel { password_confirmation: "other".into(), ..register_model("Foo".into()) };
        assert!(model.validate().is_err());
    }
}
