//! LLM providers, prompt construction, and backend selection.

pub mod anthropic;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod router;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;
pub use prompt::{SYSTEM_PROMPT, build_chat_prompt, build_user_prompt, format_commits_for_prompt};
pub use provider::{ChatPrompt, Provider, TextGenerator, classify_error_response, complete_within};
pub use router::{ChangelogGenerator, Generation, fallback_reason_for};
