use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web_security_headers::{
    CspMode, PolicyFragment, SecurityHeaders, SecurityHeadersConfig, SecurityHeadersError,
    SiteContext,
};

fn example_site() -> SiteContext<'static> {
    SiteContext::new().base_url("https://example.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers =
            SecurityHeaders::compute(&SecurityHeadersConfig::default(), example_site()).unwrap();

        let names: Vec<&str> = headers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "strict-transport-security",
                "x-frame-options",
                "x-content-type-options",
                "referrer-policy",
                "content-security-policy",
            ]
        );
        assert_eq!(
            headers.get("Strict-Transport-Security").unwrap(),
            "max-age=31536000"
        );
        assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("referrer-policy").unwrap(), "same-origin");
        assert!(headers.get("permissions-policy").is_none());
    }

    #[test]
    fn test_computed_csp() {
        let config = SecurityHeadersConfig::builder()
            .minimum_policy(
                "general",
                PolicyFragment::new()
                    .with("default-src", "HOSTS")
                    .with("style-src", "'unsafe-inline' HOSTS"),
            )
            .without_default_policies()
            .policy(
                "googleFonts",
                PolicyFragment::new()
                    .with("style-src", "fonts.googleapis.com")
                    .with("font-src", "fonts.gstatic.com"),
            )
            .build()
            .unwrap();

        let headers = SecurityHeaders::compute(&config, example_site()).unwrap();

        assert_eq!(
            headers.content_security_policy(),
            Some(
                "default-src example.com 'self'; \
                 style-src 'unsafe-inline' example.com 'self' fonts.googleapis.com; \
                 font-src fonts.gstatic.com"
            )
        );
    }

    #[test]
    fn test_literal_csp_bypasses_fragments_and_hosts() {
        let config = SecurityHeadersConfig::builder()
            .content_security_policy(CspMode::Literal("default-src 'none'".into()))
            .build()
            .unwrap();
        // Discovery would fail on this URL if it ran.
        let site = SiteContext::new().base_url("not a url");

        let headers = SecurityHeaders::compute(&config, site).unwrap();

        assert_eq!(headers.content_security_policy(), Some("default-src 'none'"));
    }

    #[test]
    fn test_disabled_csp_omits_header() {
        let config = SecurityHeadersConfig::builder()
            .content_security_policy(CspMode::Disabled)
            .build()
            .unwrap();

        let headers = SecurityHeaders::compute(&config, example_site()).unwrap();

        assert!(headers.get("content-security-policy").is_none());
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_all_optional_headers_disabled() {
        let config = SecurityHeadersConfig::from_json_str(
            r#"{
                "Strict-Transport-Security": false,
                "X-Frame-Options": false,
                "Referrer-Policy": false,
                "Content-Security-Policy": false
            }"#,
        )
        .unwrap();

        let headers = SecurityHeaders::compute(&config, example_site()).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    }

    #[test]
    fn test_permissions_policy_passthrough() {
        let config = SecurityHeadersConfig::builder()
            .permissions_policy("geolocation=(), camera=()")
            .build()
            .unwrap();

        let headers = SecurityHeaders::compute(&config, example_site()).unwrap();

        assert_eq!(
            headers.get("permissions-policy").unwrap(),
            "geolocation=(), camera=()"
        );
    }

    #[test]
    fn test_invalid_base_url_aborts_computation() {
        let site = SiteContext::new().base_url("::not-a-url::");

        let result = SecurityHeaders::compute(&SecurityHeadersConfig::default(), site);

        assert!(matches!(result, Err(SecurityHeadersError::InvalidUrl { .. })));
    }

    #[test]
    fn test_empty_override_with_placeholder_aborts_computation() {
        let config = SecurityHeadersConfig::builder()
            .legitimate_hosts(Vec::<String>::new())
            .build()
            .unwrap();

        let result = SecurityHeaders::compute(&config, example_site());

        assert!(matches!(result, Err(SecurityHeadersError::EmptyHostSet)));
    }

    #[test]
    fn test_invalid_header_value_aborts_computation() {
        let config = SecurityHeadersConfig::builder()
            .x_frame_options("SAMEORIGIN\r\nX-Injected: 1")
            .build()
            .unwrap();

        let result = SecurityHeaders::compute(&config, example_site());

        assert!(matches!(
            result,
            Err(SecurityHeadersError::InvalidHeaderValue {
                header: "x-frame-options",
                ..
            })
        ));
    }

    #[test]
    fn test_override_hosts_in_csp() {
        let config = SecurityHeadersConfig::builder()
            .without_default_policies()
            .legitimate_hosts(["foo.com"])
            .build()
            .unwrap();

        let headers = SecurityHeaders::compute(&config, example_site()).unwrap();
        let csp = headers.content_security_policy().unwrap();

        assert!(csp.starts_with("default-src foo.com; "));
        assert!(!csp.contains("example.com"));
        assert!(!csp.contains("HOSTS"));
    }

    #[test]
    fn test_apply_to_keeps_existing_headers() {
        let headers =
            SecurityHeaders::compute(&SecurityHeadersConfig::default(), example_site()).unwrap();
        let mut target = HeaderMap::new();
        target.insert(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        );

        headers.apply_to(&mut target);

        assert_eq!(target.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(target.get("referrer-policy").unwrap(), "same-origin");
        assert_eq!(target.len(), headers.len());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let config = SecurityHeadersConfig::default();

        let first = SecurityHeaders::compute(&config, example_site()).unwrap();
        let second = SecurityHeaders::compute(&config, example_site()).unwrap();

        assert_eq!(first, second);
    }
}
