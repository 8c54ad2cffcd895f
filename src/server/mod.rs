//! HTTP signal service.
//!
//! A single endpoint, `POST /generate`: sweep parameters arrive as JSON,
//! the canonical six-column CSV goes back with an attachment disposition.
//! The service is stateless — every response is synthesized from the
//! request alone, so identical requests always produce identical bodies
//! and any number of pollers can share one instance.

use actix_web::{middleware, post, web, App, HttpResponse, HttpServer, Responder};
use log::info;

use crate::signal::{synthesize, SweepParams, MIN_SAMPLES};

/// Where the service listens unless told otherwise.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// A request violated the service contract.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// `samples` under the floor the sampler needs for a usable trace.
    TooFewSamples(usize),
    /// `t_start` past `t_end`; the sampling interval would be empty.
    InvertedSpan { t_start: f64, t_end: f64 },
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::TooFewSamples(n) => {
                write!(f, "samples must be at least {MIN_SAMPLES}, got {n}")
            }
            RequestError::InvertedSpan { t_start, t_end } => {
                write!(f, "t_start {t_start} exceeds t_end {t_end}")
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Contract checks on an incoming request. Finiteness needs no check here:
/// JSON cannot encode NaN or infinities, so a deserialized request only
/// ever carries finite floats.
pub fn validate(params: &SweepParams) -> Result<(), RequestError> {
    if params.samples < MIN_SAMPLES {
        return Err(RequestError::TooFewSamples(params.samples));
    }
    if params.t_start > params.t_end {
        return Err(RequestError::InvertedSpan {
            t_start: params.t_start,
            t_end: params.t_end,
        });
    }
    Ok(())
}

#[post("/generate")]
async fn generate(params: web::Json<SweepParams>) -> impl Responder {
    let params = params.into_inner();
    if let Err(e) = validate(&params) {
        return HttpResponse::BadRequest()
            .content_type("text/plain")
            .body(e.to_string());
    }

    let batch = synthesize(&params);
    match batch.to_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"signals.csv\"",
            ))
            .body(csv),
        Err(e) => HttpResponse::InternalServerError()
            .content_type("text/plain")
            .body(e.to_string()),
    }
}

/// Mount the service's routes; shared between [`run`] and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(generate);
}

/// Bind and serve until the process is stopped.
pub fn run(bind: &str) -> std::io::Result<()> {
    info!("signal service listening on {bind}");
    let server = HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(bind)?
    .run();
    actix_web::rt::System::new().block_on(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{SampleBatch, WaveParams};
    use actix_web::test;
    use assert_approx_eq::assert_approx_eq;

    fn request(t_start: f64, t_end: f64, samples: usize) -> SweepParams {
        let mut request = WaveParams::default().sweep(t_start, t_end);
        request.samples = samples;
        request
    }

    async fn call(params: &SweepParams) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(params)
            .to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn responds_with_canonical_csv() {
        let params = request(0.0, 2.0, 200);
        let resp = call(&params).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/csv"
        );

        let body = test::read_body(resp).await;
        let batch = SampleBatch::from_csv(std::str::from_utf8(&body).unwrap()).unwrap();
        assert_eq!(batch.len(), 200);
        assert_approx_eq!(batch.t[0], 0.0);
        assert_approx_eq!(batch.t[199], 2.0);
    }

    #[actix_web::test]
    async fn marks_the_body_as_attachment() {
        let resp = call(&request(0.0, 2.0, 100)).await;
        let disposition = resp
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.contains("attachment"));
        assert!(disposition.contains("signals.csv"));
    }

    #[actix_web::test]
    async fn derived_columns_hold_their_identities() {
        let resp = call(&request(0.5, 1.5, 120)).await;
        let body = test::read_body(resp).await;
        let batch = SampleBatch::from_csv(std::str::from_utf8(&body).unwrap()).unwrap();

        for i in 0..batch.len() {
            assert_eq!(batch.y1[i], batch.x1[i] + batch.x2[i]);
            assert_eq!(batch.y2[i], batch.x1[i] - batch.x2[i]);
            assert_eq!(batch.y3[i], batch.x1[i] * batch.x2[i]);
        }
    }

    #[actix_web::test]
    async fn identical_requests_get_identical_bodies() {
        let params = request(0.25, 2.25, 150);
        let first = test::read_body(call(&params).await).await;
        let second = test::read_body(call(&params).await).await;
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn rejects_too_few_samples() {
        let resp = call(&request(0.0, 2.0, 49)).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("samples"));
    }

    #[actix_web::test]
    async fn rejects_inverted_span() {
        let resp = call(&request(2.0, 1.0, 100)).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn accepts_a_degenerate_span() {
        // t_start == t_end is legal: every sample lands on the same instant.
        let resp = call(&request(1.0, 1.0, 60)).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        let batch = SampleBatch::from_csv(std::str::from_utf8(&body).unwrap()).unwrap();
        assert!(batch.t.iter().all(|&t| t == 1.0));
    }

    #[actix_web::test]
    async fn rejects_malformed_json() {
        let app = test::init_service(App::new().configure(routes)).await;
        let req = test::TestRequest::post()
            .uri("/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json at all")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }

    #[::core::prelude::v1::test]
    fn validate_reports_the_offending_value() {
        let err = validate(&request(0.0, 2.0, 10)).unwrap_err();
        assert_eq!(err.to_string(), "samples must be at least 50, got 10");

        let err = validate(&request(3.0, 1.0, 100)).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }
}
