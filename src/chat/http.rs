use super::{ parse_answer, ChatClient, ChatClientConfig, ChatError };
use crate::models::backend::{ ChatAnswer, ChatRequest };
use async_trait::async_trait;
use log::{ debug, info };
use reqwest::header::{ ACCEPT, CONTENT_TYPE };
use reqwest::Client as HttpClient;
use serde_json::Value as JsonValue;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http: HttpClient,
    base_url: String,
    chat_url: Url,
    verbose: bool,
}

impl HttpChatClient {
    pub fn new(base_url: &str) -> Result<Self, ChatError> {
        Self::from_config(
            &(ChatClientConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            })
        )
    }

    pub fn from_config(config: &ChatClientConfig) -> Result<Self, ChatError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let chat_url = Url::parse(&format!("{}/chat", base_url)).map_err(|_|
            ChatError::InvalidUrl(config.base_url.clone())
        )?;

        let mut builder = HttpClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            chat_url,
            verbose: config.verbose,
        })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn ask(&self, query: &str) -> Result<ChatAnswer, ChatError> {
        let req = ChatRequest {
            query: query.to_string(),
            verbose: self.verbose,
        };
        debug!("POST {} ({} chars)", self.chat_url, query.chars().count());

        let resp = self.http
            .post(self.chat_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&req)
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        let body: JsonValue = serde_json
            ::from_slice(&bytes)
            .map_err(|e| ChatError::Decode(e.to_string()))?;
        debug!("Backend response: {}", body);

        let answer = parse_answer(&body);
        if let Some(details) = &answer.details {
            info!("Backend answered in {:.2}s", details.time_process);
            debug!("Backend reasoning: {}", details.reasoning);
            debug!("Backend thought process:\n{}", details.thought_process);
        }
        Ok(answer)
    }

    async fn health(&self) -> Result<(), ChatError> {
        let url = format!("{}/", self.base_url);
        let resp = self.http.get(&url).header(ACCEPT, "application/json").send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        self.chat_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_built_from_base() {
        let client = HttpChatClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/chat");

        let client = HttpChatClient::new("https://abc.lambda-url.us-east-1.on.aws").unwrap();
        assert_eq!(client.endpoint(), "https://abc.lambda-url.us-east-1.on.aws/chat");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = HttpChatClient::new("not a url").unwrap_err();
        assert!(matches!(err, ChatError::InvalidUrl(_)));
    }
}
