use std::time::Duration;

use crate::config::BrainConfig;

use super::gateway::{BrainError, BrainFuture, BrainGateway, BrainReply, BrainRequest};

/// Keywords the brain's free-text reply is scanned for to decide whether the
/// client should refresh its cached board data. Matching is case- and
/// accent-insensitive ("éxito" folds to "exito").
const DATA_CHANGE_KEYWORDS: &[&str] = &[
    "exito",
    "creada",
    "actualizada",
    "confirmado",
    "completada",
    "eliminada",
    "borrada",
];

pub struct HttpBrainGateway {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: String,
}

impl HttpBrainGateway {
    pub fn new(config: BrainConfig) -> Result<Self, BrainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| BrainError::ProviderFailure(err.to_string()))?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url,
            api_key: config.api_key,
        })
    }
}

impl BrainGateway for HttpBrainGateway {
    fn respond<'a>(&'a self, request: BrainRequest) -> BrainFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.endpoint_url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        BrainError::Timeout
                    } else {
                        BrainError::ProviderFailure(err.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(BrainError::ProviderFailure(format!(
                    "status={status} body={body}"
                )));
            }

            let reply = response
                .json::<BrainReply>()
                .await
                .map_err(|err| BrainError::InvalidPayload(err.to_string()))?;

            if reply.response.trim().is_empty() {
                return Err(BrainError::EmptyResponse);
            }

            Ok(reply)
        })
    }
}

/// Heuristic scan of a brain reply for signs that it mutated board data.
pub fn mentions_data_change(reply: &str) -> bool {
    let folded = fold_accents(&reply.to_lowercase());
    DATA_CHANGE_KEYWORDS
        .iter()
        .any(|keyword| folded.contains(keyword))
}

fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}
