//! Lead intake: customer records captured from the quote form.

mod customer;

pub use customer::{ConversationEntry, CustomerData, CustomerRecord, MAX_AGE, MIN_AGE};
