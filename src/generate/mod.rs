use crate::error::CoreResult;

const SUMMARY_SYSTEM: &str = "You are a research assistant. Summarize the given \
element of a research paper in two or three sentences, keeping terminology \
from the paper itself.";

const CHAT_SYSTEM: &str = "You are a research assistant. Answer the user's \
question using only the provided element content as context; say so when the \
content is insufficient.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Role-tagged prompt passed to the generation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    messages: Vec<Message>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(self, content: impl Into<String>) -> Self {
        self.push(Role::System, content)
    }

    pub fn user(self, content: impl Into<String>) -> Self {
        self.push(Role::User, content)
    }

    pub fn assistant(self, content: impl Into<String>) -> Self {
        self.push(Role::Assistant, content)
    }

    fn push(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Summarization/chat collaborator. Calls are blocking and never retried
/// automatically; errors surface as `CoreError::Generation`.
pub trait TextGenerator: Send {
    fn generate(&self, prompt: &Prompt) -> CoreResult<String>;
}

pub fn summary_prompt(element_text: &str) -> Prompt {
    Prompt::new().system(SUMMARY_SYSTEM).user(element_text)
}

/// Builds the chat prompt for one element. The previous exchange, if any, is
/// replayed ahead of the new question so follow-ups keep their referent.
pub fn chat_prompt(
    element_text: &str,
    prior: Option<(&str, &str)>,
    question: &str,
) -> Prompt {
    let mut prompt = Prompt::new()
        .system(CHAT_SYSTEM)
        .user(format!("Element content:\n{element_text}"));
    if let Some((prior_question, prior_answer)) = prior {
        prompt = prompt.user(prior_question).assistant(prior_answer);
    }
    prompt.user(question)
}
