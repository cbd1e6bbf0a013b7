use actix_web::{delete, get, post, put, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_auth_user,
    modules::friend::{
        model::{
            FriendRequestBody, ListFriendRequestsResponse, ListFriendsResponse, SearchUsersQuery,
            SearchUsersResponse,
        },
        service::FriendService,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

#[get("/users")]
pub async fn search_users(
    friend_service: web::Data<FriendService>,
    query: ValidatedQuery<SearchUsersQuery>,
) -> Result<success::Success<SearchUsersResponse>, error::Error> {
    if query.0.is_empty() {
        return Err(error::Error::invalid_argument("Must provide at least 1 params"));
    }
    let users = friend_service.search_users(&query.0).await?;
    Ok(success::Success::ok(Some(users)))
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<ListFriendsResponse>, error::Error> {
    let user = get_auth_user(&req)?;
    let friends = friend_service.list_friends(&user.email).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[get("/requests")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<ListFriendRequestsResponse>, error::Error> {
    let user = get_auth_user(&req)?;
    let requests = friend_service.list_friend_requests(&user.email).await?;
    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[put("/requests/{friend_email}")]
pub async fn create_friend_request(
    friend_service: web::Data<FriendService>,
    friend_email: web::Path<String>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user = get_auth_user(&req)?;
    friend_service
        .create_or_update_friend_request(&user.email, &friend_email, &body.0.relationship)
        .await?;
    Ok(success::Success::ok(None).message("Friend request sent successfully"))
}

#[delete("/requests/{friend_email}")]
pub async fn cancel_friend_request(
    friend_service: web::Data<FriendService>,
    friend_email: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user = get_auth_user(&req)?;
    friend_service.cancel_friend_request(&user.email, &friend_email).await?;
    Ok(success::Success::no_content())
}

#[post("/requests/{friend_email}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendService>,
    friend_email: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user = get_auth_user(&req)?;
    friend_service.accept_friend_request(&user.email, &friend_email).await?;
    Ok(success::Success::ok(None).message("Friend request accepted successfully"))
}

#[post("/requests/{friend_email}/reject")]
pub async fn reject_friend_request(
    friend_service: web::Data<FriendService>,
    friend_email: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user = get_auth_user(&req)?;
    friend_service.reject_friend_request(&user.email, &friend_email).await?;
    Ok(success::Success::no_content())
}
