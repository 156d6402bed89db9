use actix_web::{web, HttpResponse, Responder};

use crate::core::ChatResponder;
use crate::models::{ChatRequest, ChatbotResponse};

/// Largest chatbot body that is read; anything bigger counts as unreadable
pub const MAX_CHAT_BODY_BYTES: usize = 64 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chatbot", web::post().to(chat));
}

/// Parse a chatbot body, falling back to an empty message
async fn read_chat_request(payload: web::Payload) -> ChatRequest {
    let body = match payload.to_bytes_limited(MAX_CHAT_BODY_BYTES).await {
        Ok(Ok(body)) => body,
        Ok(Err(_)) => {
            tracing::warn!("Chatbot payload over {} bytes, treating as empty", MAX_CHAT_BODY_BYTES);
            return ChatRequest::default();
        }
        Err(e) => {
            tracing::warn!("Chatbot payload could not be read, treating as empty: {}", e);
            return ChatRequest::default();
        }
    };

    serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::warn!("Unreadable chatbot payload, treating as empty: {}", e);
        ChatRequest::default()
    })
}

/// Chatbot endpoint
///
/// POST /chatbot
///
/// Request body:
/// ```json
/// { "message": "2 bedroom in Accra under GHS 5000" }
/// ```
///
/// Always answers 200; an unreadable or oversized body is handled as an
/// empty message.
async fn chat(responder: web::Data<ChatResponder>, payload: web::Payload) -> impl Responder {
    let request = read_chat_request(payload).await;
    let reply = responder.respond(&request.message).await;

    tracing::info!(
        "Chatbot replied with {} listings ({} more not shown)",
        reply.listings.len(),
        reply.truncated
    );

    HttpResponse::Ok().json(ChatbotResponse::from(reply))
}
