use actix_web::{post, web};

use crate::api::{error, success};
use crate::modules::user::{model, service::UserService};
use crate::utils::ValidatedJson;

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<model::RegisterResponse>, error::Error> {
    let response = user_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(response)).message("Register successful"))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::Token>, error::Error> {
    let token = user_service.login(user_data.0).await?;
    Ok(success::Success::ok(Some(token)).message("Login successful"))
}
