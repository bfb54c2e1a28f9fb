//! Local stand-ins for the postal code directory and geocoder services.
//!
//! Both run on an ephemeral port so the real reqwest adapters can be
//! exercised end to end.

use std::net::SocketAddr;

use actix_web::{App, HttpResponse, HttpServer, get, web};
use serde::Deserialize;
use serde_json::json;

pub const KNOWN_CODE: &str = "01310000";
pub const SILENT_CODE: &str = "20040002";
pub const PAULISTA_LATITUDE: f64 = -23.561_414;
pub const PAULISTA_LONGITUDE: f64 = -46.655_881;

#[get("/ws/{code}/json/")]
async fn directory(path: web::Path<String>) -> HttpResponse {
    match path.as_str() {
        KNOWN_CODE => HttpResponse::Ok().json(json!({
            "cep": "01310-000",
            "logradouro": "Avenida Paulista",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        })),
        SILENT_CODE => HttpResponse::Ok().json(json!({
            "cep": "20040-002",
            "logradouro": "Rua da Assembleia",
            "bairro": "Centro",
            "localidade": "Rio de Janeiro",
            "uf": "RJ"
        })),
        _ => HttpResponse::Ok().json(json!({ "erro": "true" })),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

#[get("/search")]
async fn search(query: web::Query<SearchQuery>) -> HttpResponse {
    if query.q.contains("Paulista") {
        HttpResponse::Ok().json(json!([{
            "lat": PAULISTA_LATITUDE.to_string(),
            "lon": PAULISTA_LONGITUDE.to_string(),
            "display_name": "Avenida Paulista, Bela Vista, São Paulo"
        }]))
    } else {
        HttpResponse::Ok().json(json!([]))
    }
}

/// Start the stand-in services and return their base URL.
pub fn spawn_upstream() -> std::io::Result<url::Url> {
    let server = HttpServer::new(|| App::new().service(directory).service(search))
        .workers(1)
        .bind(("127.0.0.1", 0))?;
    let addr: SocketAddr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| std::io::Error::other("no bound address"))?;
    actix_web::rt::spawn(server.run());
    url::Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)
}
