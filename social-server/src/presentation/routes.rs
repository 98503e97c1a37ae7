use super::http_handlers as h;
use super::response::{
    json_error_handler, multipart_error_handler, path_error_handler, query_error_handler,
};
use actix_files::Files;
use actix_multipart::form::MultipartFormConfig;
use actix_web::web;
use std::path::PathBuf;

// Два изображения по 5 МБ плюс текстовые поля
const MULTIPART_TOTAL_LIMIT: usize = 12 * 1024 * 1024;

/// Mounts every `/api/v1` route together with the extractor configs that turn
/// malformed input into `400` envelopes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(MULTIPART_TOTAL_LIMIT)
                .error_handler(multipart_error_handler),
        )
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(h::register))
                        .route("/login", web::post().to(h::login))
                        .route("/logout", web::post().to(h::logout))
                        .route("/refresh-token", web::post().to(h::refresh_token))
                        .route("/current-user", web::get().to(h::current_user)),
                )
                .service(
                    web::scope("/tweets")
                        .route("", web::post().to(h::create_tweet))
                        .route("/user/{userId}", web::get().to(h::get_user_tweets))
                        .service(
                            web::resource("/{tweetId}")
                                .route(web::get().to(h::get_tweet))
                                .route(web::patch().to(h::update_tweet))
                                .route(web::delete().to(h::delete_tweet)),
                        ),
                )
                .service(
                    web::scope("/comments")
                        .route("/video/{videoId}", web::get().to(h::get_video_comments))
                        // POST адресуется видео, остальные методы конкретному комментарию
                        .service(
                            web::resource("/{id}")
                                .route(web::post().to(h::create_comment))
                                .route(web::get().to(h::get_comment))
                                .route(web::patch().to(h::update_comment))
                                .route(web::delete().to(h::delete_comment)),
                        ),
                )
                .service(
                    web::scope("/likes")
                        .route("/toggle/{kind}/{targetId}", web::post().to(h::toggle_like)),
                ),
        );
}

/// Serves stored uploads read-only from `dir` under `mount_path`.
pub fn configure_media(
    mount_path: String,
    dir: PathBuf,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(Files::new(&mount_path, dir));
    }
}
