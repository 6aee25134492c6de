use crate::core::config::SecurityHeadersConfig;
use crate::core::headers::SecurityHeaders;
use crate::core::site::SiteContext;
use crate::error::SecurityHeadersError;
use actix_service::{Service, Transform};
use actix_web::{
    dev::{forward_ready, ServiceRequest, ServiceResponse},
    web::{Data, ServiceConfig},
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

/// Writes the precomputed [`SecurityHeaders`] onto every response.
#[derive(Clone)]
pub struct SecurityHeadersMiddleware {
    headers: Arc<SecurityHeaders>,
}

impl SecurityHeadersMiddleware {
    #[inline]
    pub fn new(headers: SecurityHeaders) -> Self {
        Self::from_shared(Arc::new(headers))
    }

    #[inline]
    pub fn from_shared(headers: Arc<SecurityHeaders>) -> Self {
        Self { headers }
    }

    /// Computes the header set once; call during startup and abort on error.
    pub fn from_config(
        config: &SecurityHeadersConfig,
        site: SiteContext<'_>,
    ) -> Result<Self, SecurityHeadersError> {
        SecurityHeaders::compute(config, site).map(Self::new)
    }

    #[inline]
    pub fn headers(&self) -> Arc<SecurityHeaders> {
        self.headers.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeadersMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SecurityHeadersMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddlewareService {
            service: Rc::new(service),
            headers: self.headers.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddlewareService<S> {
    service: Rc<S>,
    headers: Arc<SecurityHeaders>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let headers = self.headers.clone();

        Box::pin(async move {
            let mut res = service.call(req).await?;
            // A header the handler set explicitly takes precedence.
            headers.apply_to(res.headers_mut());
            Ok(res)
        })
    }
}

#[inline]
pub fn security_headers_middleware(headers: SecurityHeaders) -> SecurityHeadersMiddleware {
    SecurityHeadersMiddleware::new(headers)
}

/// Registers the shared header set as app data so handlers can extract
/// `Data<SecurityHeaders>`.
pub fn configure_security_headers(
    headers: Arc<SecurityHeaders>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::from(headers));
    }
}
