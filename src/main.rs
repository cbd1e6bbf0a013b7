use actix_cors::Cors;
use actix_web::{
    self, App, HttpRequest, HttpResponse, HttpServer,
    error::PathError,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::Arc;

use crate::{
    configs::connect_database,
    constants::{Env, StorageBackend},
    middlewares::authentication,
    modules::{
        friend::{repository::FriendRepository, repository_pg::FriendRepositoryPg, service::FriendService},
        profile::{
            repository::ProfileRepository,
            repository_pg::ProfileRepositoryPg,
            schema::{EmployerEntity, SchoolEntity},
            service::ProfileService,
        },
        user::{repository::UserRepository, repository_pg::UserRepositoryPg, service::UserService},
    },
    storage::MemoryStore,
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod storage;
#[cfg(test)]
mod test;
mod utils;

#[actix_web::get("/ping")]
async fn health_check() -> &'static str {
    "pong"
}

async fn route_not_found(req: HttpRequest) -> Result<HttpResponse, api::error::Error> {
    let message = format!("no route for {} {}", req.method(), req.path());
    Err(api::error::SystemError::not_found(message).into())
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let cause = api::error::SystemError::invalid_argument(err.to_string()).with_source(err);
    api::error::Error::from(cause).into()
}

/// Every route the server exposes. Everything outside `/auth` and `/ping`
/// goes through the bearer middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health_check)
        .configure(modules::user::route::public_api_configure)
        .service(
            web::scope("")
                .wrap(from_fn(authentication))
                .configure(modules::friend::route::configure)
                .configure(modules::profile::route::configure)
                .default_service(web::to(route_not_found)),
        )
        .default_service(web::to(route_not_found));
}

fn demo_catalog() -> (Vec<SchoolEntity>, Vec<EmployerEntity>) {
    let schools = [("Georgia Tech", "University"), ("Emory University", "University")]
        .into_iter()
        .map(|(name, kind)| SchoolEntity { school_name: name.into(), school_type: kind.into() })
        .collect();
    let employers = ["Initech", "Globex"]
        .into_iter()
        .map(|name| EmployerEntity { employer_name: name.into() })
        .collect();
    (schools, employers)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let env = Env::load().map_err(std::io::Error::other)?;
    log::info!("Environment variables loaded");

    let (user_repo, friend_repo, profile_repo): (
        Arc<dyn UserRepository>,
        Arc<dyn FriendRepository>,
        Arc<dyn ProfileRepository>,
    ) = match env.storage_backend {
        StorageBackend::Postgres => {
            let database_url = env.database_url.as_deref().unwrap_or_default();
            let db_pool = connect_database(database_url).await.map_err(|e| {
                log::error!("Database connection error: {}", e);
                std::io::Error::other("Database connection error")
            })?;
            (
                Arc::new(UserRepositoryPg::new(db_pool.clone())),
                Arc::new(FriendRepositoryPg::new(db_pool.clone())),
                Arc::new(ProfileRepositoryPg::new(db_pool)),
            )
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage, data is lost on shutdown");
            let (schools, employers) = demo_catalog();
            let store = Arc::new(MemoryStore::with_catalog(schools, employers));
            (store.clone(), store.clone(), store)
        }
    };

    let user_service =
        UserService::with_dependencies(user_repo, &env.jwt_secret, env.access_token_expiration);
    let friend_service = FriendService::with_dependencies(friend_repo);
    let profile_service = ProfileService::with_dependencies(profile_repo);

    let frontend_url = env.frontend_url.clone();

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .configure(configure_api)
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(2)
    .run()
    .await
}
