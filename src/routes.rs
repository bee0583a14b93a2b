use crate::{api, views};
use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Registers every page, the JSON API and its docs. Shared by the server and
/// the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let openapi = api::ApiDoc::openapi();

    cfg.route("/", web::get().to(views::home::homepage))
        .route("/signup", web::get().to(views::auth::signup_form))
        .route("/signup", web::post().to(views::auth::signup))
        .route("/login", web::get().to(views::auth::login_form))
        .route("/login", web::post().to(views::auth::login))
        .route("/logout", web::get().to(views::auth::logout))
        .service(
            web::scope("/users")
                .route("", web::get().to(views::users::list_users))
                // static segments before `{user_id}`
                .route("/profile", web::get().to(views::users::edit_profile_form))
                .route("/profile", web::post().to(views::users::edit_profile))
                .route("/delete", web::post().to(views::users::delete_user))
                .route("/follow/{follow_id}", web::post().to(views::users::follow))
                .route(
                    "/stop-following/{follow_id}",
                    web::post().to(views::users::stop_following),
                )
                .route("/{user_id}", web::get().to(views::users::show_user))
                .route(
                    "/{user_id}/following",
                    web::get().to(views::users::show_following),
                )
                .route(
                    "/{user_id}/followers",
                    web::get().to(views::users::show_followers),
                )
                .route("/{user_id}/likes", web::get().to(views::users::show_likes)),
        )
        .service(
            web::scope("/messages")
                .route("/new", web::get().to(views::messages::new_message_form))
                .route("/new", web::post().to(views::messages::create_message))
                .route("/{message_id}", web::get().to(views::messages::show_message))
                .route(
                    "/{message_id}/delete",
                    web::post().to(views::messages::delete_message),
                )
                .route(
                    "/{message_id}/like",
                    web::post().to(views::messages::toggle_like),
                ),
        )
        .route(
            "/api/docs",
            web::get().to(|| async {
                actix_web::HttpResponse::PermanentRedirect()
                    .append_header(("Location", "/api/docs/"))
                    .finish()
            }),
        )
        .service(SwaggerUi::new("/api/docs/{_:.*}").url("/api-docs/openapi.json", openapi))
        .service(
            web::scope("/api/users")
                .route("", web::get().to(api::users::list_users))
                .route("/{user_id}", web::get().to(api::users::get_user)),
        );
}
