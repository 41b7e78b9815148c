//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatContextSummary, ChatMessageRequest, ChatMessageResponse, EndSessionResponse,
    InitializeChatRequest, InitializeChatResponse, SessionSnapshotResponse, TurnResponse,
};
pub use routes::chat_router;
