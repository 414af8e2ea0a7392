//! Tipos de dados para requisições e respostas da API de geração de imagens.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o formato esperado pelos endpoints estilo Flux Kontext
//! (`POST /v1/flux-kontext-pro` + GET na `polling_url` retornada).

use serde::{Deserialize, Serialize};

/// Corpo da requisição de submissão para o provedor de colorização.
///
/// Contém a instrução textual, a imagem de entrada codificada como data-URI
/// base64 e dicas opcionais de formato de saída.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Instrução textual (ex.: "Colorize this black and white image...").
    pub prompt: String,
    /// Imagem de entrada como data-URI base64 (`data:image/png;base64,...`).
    pub input_image: String,
    /// Proporção desejada da saída (ex.: "1:1"). Omitida se `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Formato da imagem de saída (ex.: "png", "jpeg"). Omitido se `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Tolerância do filtro de segurança do provedor (0–6). Omitida se `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_tolerance: Option<u8>,
}

impl GenerationRequest {
    /// Cria uma requisição com apenas os campos obrigatórios.
    pub fn new(prompt: impl Into<String>, input_image: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            input_image: input_image.into(),
            aspect_ratio: None,
            output_format: None,
            safety_tolerance: None,
        }
    }
}

/// Resposta do endpoint de submissão.
///
/// O provedor devolve um identificador opaco e a URL de polling que deve
/// ser consultada até o job atingir um estado terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Identificador opaco do job, atribuído pelo provedor.
    pub id: String,
    /// URL de polling para consultar o status. Repassada sem modificação.
    pub polling_url: String,
    /// Status inicial informado pelo provedor (tipicamente "submitted").
    #[serde(default)]
    pub status: Option<String>,
}

/// Etiqueta de status retornada pela consulta de polling.
///
/// Status desconhecidos são capturados em [`Other`](StatusTag::Other) em vez
/// de falhar a desserialização — o provedor pode introduzir novas etiquetas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTag {
    Ready,
    Processing,
    Pending,
    Error,
    Failed,
    #[serde(untagged)]
    Other(String),
}

/// Resposta da consulta de status na `polling_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Etiqueta de status atual do job.
    pub status: StatusTag,
    /// Payload de resultado, presente apenas quando `status == Ready`.
    #[serde(default)]
    pub result: Option<ResultPayload>,
    /// Mensagem de erro do provedor, presente em `Error`/`Failed`.
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload de resultado de um job concluído com sucesso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Referência ao artefato gerado — URL assinada ou data blob.
    #[serde(default)]
    pub sample: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_omits_optional_fields() {
        let req = GenerationRequest::new("colorize", "data:image/png;base64,AAAA");
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""prompt":"colorize""#));
        assert!(!json.contains("aspect_ratio"));
        assert!(!json.contains("output_format"));
        assert!(!json.contains("safety_tolerance"));
    }

    #[test]
    fn generation_request_serializes_hints_when_set() {
        let mut req = GenerationRequest::new("colorize", "data:image/png;base64,AAAA");
        req.aspect_ratio = Some("1:1".into());
        req.output_format = Some("png".into());
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""aspect_ratio":"1:1""#));
        assert!(json.contains(r#""output_format":"png""#));
    }

    #[test]
    fn submit_ack_deserializes_from_provider_format() {
        let json = r#"{
            "id": "req-abc123",
            "polling_url": "https://api.bfl.ai/v1/get_result?id=req-abc123",
            "status": "submitted"
        }"#;
        let ack: SubmitAck = serde_json::from_str(json).unwrap();
        assert_eq!(ack.id, "req-abc123");
        assert!(ack.polling_url.ends_with("req-abc123"));
        assert_eq!(ack.status.as_deref(), Some("submitted"));
    }

    #[test]
    fn status_response_ready_with_sample() {
        let json = r#"{
            "status": "Ready",
            "result": {"sample": "https://x/out.jpg"}
        }"#;
        let resp: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, StatusTag::Ready);
        assert_eq!(
            resp.result.unwrap().sample.as_deref(),
            Some("https://x/out.jpg")
        );
        assert_eq!(resp.error, None);
    }

    #[test]
    fn status_response_failed_with_error() {
        let json = r#"{"status": "Failed", "error": "unsafe content"}"#;
        let resp: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, StatusTag::Failed);
        assert_eq!(resp.error.as_deref(), Some("unsafe content"));
        assert!(resp.result.is_none());
    }

    #[test]
    fn unknown_status_tag_is_preserved() {
        let json = r#"{"status": "Queued"}"#;
        let resp: StatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, StatusTag::Other("Queued".into()));
    }
}
