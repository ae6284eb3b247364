//! OpenAI-compatible LLM adapter
//!
//! Talks to any server exposing `POST {base_url}/chat/completions` (OpenAI,
//! Ollama, vLLM, LM Studio). Structured calls send the caller's JSON Schema as
//! a `json_schema` response format.

pub mod gateway;
pub mod protocol;

pub use gateway::OpenAiCompatibleGateway;
