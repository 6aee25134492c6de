use actix_web::{web, App, HttpResponse, HttpServer};
use actix_web_security_headers::{
    configure_security_headers, LocaleHostnames, SecurityHeaders, SecurityHeadersConfig,
    SecurityHeadersError, SecurityHeadersMiddleware, SiteContext,
};
use std::{io, sync::Arc};

async fn index(headers: web::Data<SecurityHeaders>) -> HttpResponse {
    let csp = headers.content_security_policy().unwrap_or("(none)");
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(format!("Content-Security-Policy: {}\n", csp))
}

fn startup_error(err: SecurityHeadersError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SecurityHeadersConfig::from_json_file(path).map_err(startup_error)?,
        None => SecurityHeadersConfig::default(),
    };

    let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned());
    let media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/uploads".to_owned());
    let locales = match std::env::var("LOCALE_HOSTNAMES") {
        Ok(json) => Some(
            serde_json::from_str::<LocaleHostnames>(&json)
                .map_err(|e| startup_error(e.into()))?,
        ),
        Err(_) => None,
    };

    let mut site = SiteContext::new().base_url(&base_url).media_storage(&media_url);
    if let Some(locales) = &locales {
        site = site.locales(locales);
    }

    let headers = Arc::new(SecurityHeaders::compute(&config, site).map_err(startup_error)?);
    for (name, value) in headers.iter() {
        log::info!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    HttpServer::new(move || {
        App::new()
            .wrap(SecurityHeadersMiddleware::from_shared(headers.clone()))
            .configure(configure_security_headers(headers.clone()))
            .route("/", web::get().to(index))
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
