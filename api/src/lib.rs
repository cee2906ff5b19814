pub mod handlers;
pub mod page;
pub mod query_payload;
pub mod rag_response;
pub mod routes;

pub use routes::{create_app, AppState};
