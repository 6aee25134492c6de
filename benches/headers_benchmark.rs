use actix_web::{test, web, App, HttpResponse};
use actix_web_security_headers::{
    build_csp_header, security_headers_middleware, HostSet, PolicyFragment, SecurityHeaders,
    SecurityHeadersConfig, SiteContext,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn example_site() -> SiteContext<'static> {
    SiteContext::new().base_url("https://example.com")
}

fn benchmark_policy_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_merge");

    let fragments = [
        PolicyFragment::general(),
        PolicyFragment::google_fonts(),
        PolicyFragment::oembed(),
        PolicyFragment::analytics(),
    ];
    let hosts: HostSet = ["example.com", "cdn.example.net", "'self'"]
        .into_iter()
        .collect();

    group.bench_function("default_fragments", |b| {
        b.iter(|| black_box(build_csp_header(black_box(&fragments), &hosts).unwrap()))
    });

    group.finish();
}

fn benchmark_startup_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("startup_compute");

    let config = SecurityHeadersConfig::default();

    group.bench_function("default_config", |b| {
        b.iter(|| black_box(SecurityHeaders::compute(black_box(&config), example_site()).unwrap()))
    });

    group.finish();
}

fn benchmark_request_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_path");

    let headers =
        SecurityHeaders::compute(&SecurityHeadersConfig::default(), example_site()).unwrap();
    let system = actix_rt::System::new();
    let app = system.block_on(test::init_service(
        App::new()
            .wrap(security_headers_middleware(headers))
            .route("/", web::get().to(HttpResponse::Ok)),
    ));

    group.bench_function("apply_cached_headers", |b| {
        b.iter(|| {
            system.block_on(async {
                let req = test::TestRequest::get().uri("/").to_request();
                black_box(test::call_service(&app, req).await)
            })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_policy_merge,
    benchmark_startup_compute,
    benchmark_request_path
);

criterion_main!(benches);
