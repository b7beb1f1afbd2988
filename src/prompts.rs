//! System prompts and conversation construction
//!
//! Every generation request becomes a two-turn conversation: a fixed system
//! prompt followed by a user turn carrying the caller's title and description.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged turn, serialized in the chat-completion message shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// System turn followed by user turn
///
/// Only [`build_conversation`] creates one, so the order is always
/// system-then-user and the turns cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: [ChatMessage; 2],
}

impl Conversation {
    /// The system turn
    pub fn system(&self) -> &ChatMessage {
        &self.turns[0]
    }

    /// The user turn
    pub fn user(&self) -> &ChatMessage {
        &self.turns[1]
    }

    /// Both turns in send order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.turns
    }
}

/// Which generator a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Titles,
    Stories,
}

impl GenerationKind {
    /// System prompt for this generator
    pub fn system_prompt(&self) -> &'static str {
        match self {
            GenerationKind::Titles => title_system_prompt(),
            GenerationKind::Stories => story_system_prompt(),
        }
    }

    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationKind::Titles => "titles",
            GenerationKind::Stories => "stories",
        }
    }
}

const TITLE_SYSTEM_PROMPT: &str = r#"You are a creative writing assistant that proposes titles for short stories.

The user gives you a working title and a description of the story they want to write.
Suggest five alternative titles that fit the description. Titles must be short (at most
eight words), evocative, and different from each other in tone. Keep the user's language.

Respond with ONLY a JSON object, no prose and no code fences, in exactly this shape:
{"titles": ["first title", "second title", "third title", "fourth title", "fifth title"]}"#;

const STORY_SYSTEM_PROMPT: &str = r#"You are a creative writing assistant that writes short stories.

The user gives you a title and a description. Write an original short story of roughly
four to six paragraphs that matches both. Give it a clear beginning, a turning point, and
an ending. Keep the user's language and avoid graphic content.

Respond with ONLY a JSON object, no prose and no code fences, in exactly this shape:
{"title": "the story title", "story": "the full story text, paragraphs separated by \n\n"}"#;

/// System prompt for title generation
pub fn title_system_prompt() -> &'static str {
    TITLE_SYSTEM_PROMPT
}

/// System prompt for story generation
pub fn story_system_prompt() -> &'static str {
    STORY_SYSTEM_PROMPT
}

/// Build the two-turn conversation sent to the provider
///
/// `title` and `description` are inserted verbatim; a missing value renders
/// as an empty string.
pub fn build_conversation(
    system_prompt: &str,
    title: Option<&str>,
    description: Option<&str>,
) -> Conversation {
    let user_content = format!(
        "user_title: {} \n user_description: {}",
        title.unwrap_or_default(),
        description.unwrap_or_default()
    );

    Conversation {
        turns: [
            ChatMessage {
                role: Role::System,
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: Role::User,
                content: user_content,
            },
        ],
    }
}
