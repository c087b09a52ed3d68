// Résumé vs. job description analysis.
// extractor → sanitizer → chunker → embedding store → assembler → LLM → repair/result.
// The LLM is reached only through the llm_client::LanguageModel trait.

pub mod assembler;
pub mod chunker;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod repair;
pub mod result;
pub mod sanitizer;
pub mod template;
