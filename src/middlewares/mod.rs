use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{
    api::error,
    modules::user::{model::AuthUser, service::UserService},
};

/// Resolves `Authorization: <type> <token>` into an [`AuthUser`] stored in
/// the request extensions.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let header = req.headers().get("Authorization").and_then(|h| h.to_str().ok()).unwrap_or("");
    let parts: Vec<&str> = header.split(' ').collect();
    let [token_type, access_token] = parts.as_slice() else {
        return Err(error::Error::unauthenticated("UNAUTHENTICATED").into());
    };

    let user_service = req.app_data::<web::Data<UserService>>().ok_or_else(|| {
        error::Error::from(error::SystemError::internal("UserService is not registered"))
    })?;

    let user = user_service.authenticate(token_type, access_token).map_err(error::Error::from)?;

    req.extensions_mut().insert(user);

    next.call(req).await
}

pub fn get_auth_user(req: &HttpRequest) -> Result<AuthUser, error::Error> {
    let extensions = req.extensions();

    let user = extensions
        .get::<AuthUser>()
        .ok_or_else(|| error::Error::unauthenticated("UNAUTHENTICATED"))?
        .clone();

    Ok(user)
}
