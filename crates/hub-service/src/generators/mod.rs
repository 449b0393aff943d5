//! Roadmap generators
//!
//! [`LlmRoadmapGenerator`] asks an OpenAI-compatible chat-completions endpoint
//! for a plan; [`TemplateRoadmapGenerator`] builds a deterministic one offline
//! and is used when no API key is configured.

mod llm;
mod template;

pub use llm::LlmRoadmapGenerator;
pub use template::TemplateRoadmapGenerator;
