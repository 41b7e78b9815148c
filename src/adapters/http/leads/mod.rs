//! HTTP adapter for customer intake and conversation log endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CommandResponse, ConversationRequest, CustomerEnvelope, CustomerRequest, CustomerView,
    StoreCustomerResponse,
};
pub use routes::leads_router;
