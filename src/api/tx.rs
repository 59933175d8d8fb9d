use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, warn};

use super::models::{AddTransactionRequest, AppState, MessageResponse};

/// Queue a transaction for the next mined block.
#[post("/add_transaction")]
pub async fn add_transaction(
    state: web::Data<AppState>,
    body: web::Json<AddTransactionRequest>,
) -> impl Responder {
    let AddTransactionRequest {
        sender: Some(sender),
        receiver: Some(receiver),
        amount: Some(amount),
    } = body.into_inner()
    else {
        warn!("POST /add_transaction - rejected: missing fields");
        return HttpResponse::BadRequest().body("Missing values");
    };

    let index = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        let index = bc.append_transaction(sender, receiver, amount);
        debug!(
            "POST /add_transaction - queued for block #{} (pending: {})",
            index,
            bc.pending().len()
        );
        index
    };

    HttpResponse::Created().json(MessageResponse {
        message: format!("This transaction will be added to Block {index}"),
    })
}
