//! OpenAPI specification generation and app factory.

use crate::{
    config::AuthConfig,
    handlers::{
        get_analysis, get_controls, get_logs, get_logs_time, get_uptime_chart, health, post_logs,
        put_control,
    },
    storage::Storage,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Tracer API".into(),
            version: "1.0.0".into(),
            description: Some(
                "Ingestion and monthly analytics for request/response traces.\n\n\
                ## API Key Authentication\n\
                Write endpoints (`POST /api/logs`, `PUT /api/logs/control`) require a signed API key.\n\
                \n\
                **Header:**\n\
                - `x-api-key`: HS256-signed, time-limited key issued by the operator\n\
                \n\
                Missing, invalid and expired keys are all rejected with 401.\n\
                \n\
                ## Month Selection\n\
                The analytics endpoints accept optional `year` and `month` query parameters.\n\
                A requested month without data falls back to the latest month containing any\n\
                entry (flagged by `isFallback` where applicable); omitting the parameters\n\
                reports on the latest month with data directly."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with shared configuration
///
/// This factory wires every route against the given storage handle and
/// auth configuration. It is used both by `main` and by the integration
/// tests, so tests exercise the same app the server runs.
pub fn create_app(
    storage: web::Data<Storage>,
    auth: AuthConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(storage)
        .app_data(web::Data::new(auth))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(
            web::resource("/api/logs")
                .route(web::post().to(post_logs))
                .route(web::get().to(get_logs)),
        )
        .service(web::resource("/api/logs/time").route(web::get().to(get_logs_time)))
        .service(web::resource("/api/logs/analysis").route(web::get().to(get_analysis)))
        .service(web::resource("/api/logs/chart").route(web::get().to(get_uptime_chart)))
        .service(
            web::resource("/api/logs/control")
                .route(web::put().to(put_control))
                .route(web::get().to(get_controls)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}
