//! Tipos de erro para o cliente da API de análise de emoções.
//!
//! Define [`ApiError`] com variantes para rate limiting, erros da API
//! e erros de rede. Usa `thiserror` para derivar `Display` e `Error`
//! automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com o serviço de análise.
///
/// As variantes cobrem os cenários de falha de uma única chamada HTTP:
/// - [`RateLimited`](ApiError::RateLimited) — o servidor retornou HTTP 429
/// - [`ApiError`](ApiError::ApiError) — qualquer outro erro HTTP (4xx/5xx)
/// - [`NetworkError`](ApiError::NetworkError) — falha na camada de rede
/// - [`RequestTimeout`](ApiError::RequestTimeout) — a chamada estourou o
///   limite de tempo por requisição imposto pelo waiter
///
/// Do ponto de vista do loop de polling, todas são transitórias: a chamada
/// é retentada sob o mesmo cronograma de backoff até o orçamento total.
#[derive(Debug, Error)]
pub enum ApiError {
    /// O servidor retornou HTTP 429 (rate limit).
    /// O campo `retry_after_ms` indica quantos milissegundos esperar antes de retentar.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Erro retornado pela API (ex.: 401 chave inválida, 500 erro interno).
    /// Contém o código de status HTTP e a mensagem de erro do corpo da resposta.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout de transporte).
    /// Encapsula o erro original do `reqwest` via `#[from]`.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A requisição não respondeu dentro do limite por chamada.
    #[error("request timed out after {elapsed_ms}ms")]
    RequestTimeout { elapsed_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = ApiError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
    }

    #[test]
    fn api_error_display() {
        let err = ApiError::ApiError {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Invalid API key");
    }

    #[test]
    fn request_timeout_display() {
        let err = ApiError::RequestTimeout { elapsed_ms: 10_000 };
        assert_eq!(err.to_string(), "request timed out after 10000ms");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
