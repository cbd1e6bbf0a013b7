use actix_web::{get, put, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_auth_user,
    modules::profile::{
        model::{ListEmployersResponse, ListSchoolsResponse, ProfileResponse, UpdateProfileModel},
        service::ProfileService,
    },
    utils::ValidatedJson,
};

#[get("/users/profile")]
pub async fn get_profile(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let user = get_auth_user(&req)?;
    let profile = profile_service.get_profile(&user.email).await?;
    Ok(success::Success::ok(Some(profile)).message("Profile retrieved successfully"))
}

#[put("/users/profile")]
pub async fn update_profile(
    profile_service: web::Data<ProfileService>,
    body: ValidatedJson<UpdateProfileModel>,
    req: HttpRequest,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let user = get_auth_user(&req)?;
    let profile = profile_service.update_profile(&user.email, body.0).await?;
    Ok(success::Success::ok(Some(profile)).message("Profile updated successfully"))
}

#[get("/schools")]
pub async fn list_schools(
    profile_service: web::Data<ProfileService>,
) -> Result<success::Success<ListSchoolsResponse>, error::Error> {
    let schools = profile_service.list_schools().await?;
    Ok(success::Success::ok(Some(schools)))
}

#[get("/employers")]
pub async fn list_employers(
    profile_service: web::Data<ProfileService>,
) -> Result<success::Success<ListEmployersResponse>, error::Error> {
    let employers = profile_service.list_employers().await?;
    Ok(success::Success::ok(Some(employers)))
}
