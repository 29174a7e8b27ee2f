pub mod backend;
pub mod gemini_client;
pub mod openai_client;
pub mod prompt;
pub mod retry;
pub mod sanitize;
