use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolChoiceOption, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::future::join_all;

use crate::{
    configuration::AnalysisSettings,
    domain::chat::{ChatResponse, ChatRole, ChatTurn, ToolOutcome},
    error::AnalysisError,
};

use super::{backend::AnalysisBackend, tools};

const SYSTEM_PROMPT: &str = r#"You are a small business lending analyst. You answer questions about SBA loan performance, lenders and local competition for industries identified by NAICS codes.

Work in this order: find out what kind of business the user has in mind and where, propose the NAICS codes that fit it, let the user confirm or adjust them, then call runFullAnalysis.

Use runFullAnalysis by default. It returns loan statistics, top banks and, for a state or a single ZIP code (zipRange 0), the competitive landscape in one call. Use the narrower tools only when the user asks for one slice of the data.

Pass either a two-letter state code or a 5-digit ZIP code, never both. When the user names an industry in words, pick the matching NAICS codes yourself. For competitive landscape tools use the first 4 digits of the most relevant NAICS code.

When a tool reports an error or no data, say so plainly and suggest a broader location or a shorter NAICS prefix. Keep answers short and lead with the numbers that matter."#;

/// One chat-completions call. The agent loop only talks to the model through this.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tool_definitions: &[ChatCompletionTool],
        tool_choice: ChatCompletionToolChoiceOption,
    ) -> Result<AgentReply, AnalysisError>;
}

#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ChatCompletionMessageToolCall>>,
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tool_rounds: u8,
}

impl OpenaiClient {
    pub fn new(api_key: String, settings: &AnalysisSettings) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            model: settings.chat_model.clone(),
            max_tool_rounds: settings.max_tool_rounds,
        }
    }

    pub async fn run_agent(
        &self,
        backend: &dyn AnalysisBackend,
        conversation: &[ChatTurn],
    ) -> Result<ChatResponse, AnalysisError> {
        run_agent(self, backend, conversation, self.max_tool_rounds).await
    }
}

#[async_trait]
impl ChatModel for OpenaiClient {
    async fn complete(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tool_definitions: &[ChatCompletionTool],
        tool_choice: ChatCompletionToolChoiceOption,
    ) -> Result<AgentReply, AnalysisError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages.to_vec())
            .tools(tool_definitions.to_vec())
            .tool_choice(tool_choice)
            .max_tokens(2000_u32)
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Response: {:?}", response);

        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::Agent("No choices in Openai response".to_string()))?
            .message;

        Ok(AgentReply {
            content: message.content,
            tool_calls: message.tool_calls,
        })
    }
}

/// Answers the latest user turn, letting the model call analysis tools
/// for up to `max_tool_rounds` rounds before it must reply in text.
///
/// Calls requested in the same round run concurrently; their results go back
/// to the model in call order.
pub async fn run_agent(
    model: &dyn ChatModel,
    backend: &dyn AnalysisBackend,
    conversation: &[ChatTurn],
    max_tool_rounds: u8,
) -> Result<ChatResponse, AnalysisError> {
    let tool_definitions = tools::tool_definitions()?;
    let mut messages = conversation_messages(conversation)?;
    let mut tool_results = Vec::new();

    for round in 0..max_tool_rounds {
        let reply = model
            .complete(&messages, &tool_definitions, ChatCompletionToolChoiceOption::Auto)
            .await?;

        let tool_calls = match reply.tool_calls {
            Some(calls) if !calls.is_empty() => calls,
            _ => {
                return Ok(ChatResponse::new(
                    reply.content.unwrap_or_default(),
                    tool_results,
                ))
            }
        };

        log::info!(
            "Agent round {} requested {} tool call(s)",
            round + 1,
            tool_calls.len()
        );

        let outcomes = join_all(tool_calls.iter().map(|call| {
            tools::dispatch(backend, &call.function.name, &call.function.arguments)
        }))
        .await;

        messages.extend(tool_round_messages(reply.content, tool_calls, &outcomes)?);
        tool_results.extend(outcomes);
    }

    log::warn!(
        "Agent used all {} tool rounds, forcing a text answer",
        max_tool_rounds
    );
    let reply = model
        .complete(&messages, &tool_definitions, ChatCompletionToolChoiceOption::None)
        .await?;

    Ok(ChatResponse::new(
        reply.content.unwrap_or_default(),
        tool_results,
    ))
}

fn conversation_messages(
    conversation: &[ChatTurn],
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let mut messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()?
            .into(),
    ];

    for turn in conversation {
        let message = match turn.role {
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.as_str())
                .build()?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.as_str())
                .build()?
                .into(),
        };
        messages.push(message);
    }

    Ok(messages)
}

/// The assistant's tool request followed by one tool message per call, in call order.
fn tool_round_messages(
    content: Option<String>,
    tool_calls: Vec<ChatCompletionMessageToolCall>,
    outcomes: &[ToolOutcome],
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let call_ids: Vec<String> = tool_calls.iter().map(|call| call.id.clone()).collect();

    let mut assistant = ChatCompletionRequestAssistantMessageArgs::default();
    if let Some(content) = content {
        assistant.content(content);
    }
    let mut messages: Vec<ChatCompletionRequestMessage> =
        vec![assistant.tool_calls(tool_calls).build()?.into()];

    for (call_id, outcome) in call_ids.into_iter().zip(outcomes) {
        messages.push(
            ChatCompletionRequestToolMessageArgs::default()
                .content(outcome.to_model_content())
                .tool_call_id(call_id)
                .build()?
                .into(),
        );
    }

    Ok(messages)
}
