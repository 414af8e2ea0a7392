//! Tipos de erro para o cliente do provedor de geração de imagens.
//!
//! Define [`ProviderError`] com variantes para rejeições da API, falhas de
//! rede e respostas malformadas. Usa `thiserror` para derivar `Display` e
//! `Error` automaticamente a partir dos atributos `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer ao interagir com o provedor externo.
///
/// As variantes cobrem os três cenários mais comuns de falha:
/// - [`Api`](ProviderError::Api) — o provedor rejeitou a requisição (4xx/5xx)
/// - [`Network`](ProviderError::Network) — falha na camada de rede
/// - [`Malformed`](ProviderError::Malformed) — resposta 2xx que não segue o contrato
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Erro retornado pela API (ex.: 401 chave inválida, 422 payload rejeitado).
    /// Contém o código de status HTTP e a mensagem de erro do corpo da resposta.
    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    /// Encapsula o erro original do `reqwest` via `#[from]`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Resposta com status HTTP de sucesso mas corpo fora do contrato
    /// (campo obrigatório ausente, JSON inválido).
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ProviderError::Api {
            status: 401,
            message: "invalid api key".into(),
        };
        assert_eq!(
            err.to_string(),
            "provider error (status 401): invalid api key"
        );
    }

    #[test]
    fn malformed_display() {
        let err = ProviderError::Malformed("missing polling_url".into());
        assert_eq!(
            err.to_string(),
            "malformed provider response: missing polling_url"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProviderError>();
    }
}
