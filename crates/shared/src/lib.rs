pub mod config;
pub mod conversation_memory;
pub mod interpreter;
pub mod llm;
pub mod models;
pub mod repos;
