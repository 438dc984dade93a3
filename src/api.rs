//! HTTP API for the CareView response service

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::chat::ChatService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self {
            chat: Arc::new(chat),
        }
    }
}
