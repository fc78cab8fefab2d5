pub mod gemini;
pub mod session_store;
