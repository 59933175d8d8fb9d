use actix_web::{HttpResponse, Responder, post, web};
use log::{info, warn};

use super::models::{AppState, ConnectNodeRequest, ConnectNodeResponse};

/// Register peers to poll during conflict resolution.
#[post("/connect_node")]
pub async fn connect_node(
    state: web::Data<AppState>,
    body: web::Json<ConnectNodeRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("Error: Please provide a valid list of nodes");
    };

    let mut registry = state.nodes.lock().expect("mutex poisoned");
    if let Err(e) = registry.register_all(&nodes) {
        warn!("POST /connect_node - rejected: {}", e);
        return HttpResponse::BadRequest().body(format!("Error: {e}"));
    }
    info!(
        "POST /connect_node - {} submitted, {} known",
        nodes.len(),
        registry.len()
    );

    HttpResponse::Created().json(ConnectNodeResponse {
        message: "All nodes are now connected",
        total_nodes: registry.nodes(),
    })
}
