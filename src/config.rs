//! Configuração do recolor carregada a partir de `recolor.toml`.
//!
//! A struct [`RecolorConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `BFL_API_KEY` tem precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::pipeline::PollConfig;

/// Prompt padrão de colorização enviado ao provedor quando o usuário
/// não fornece uma instrução própria.
pub const DEFAULT_PROMPT: &str = "Colorize this black and white image with realistic and \
vibrant colors, maintaining the original style and details";

/// Configuração de nível superior carregada de `recolor.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecolorConfig {
    /// Chave da API do provedor de colorização.
    #[serde(default)]
    pub api_key: String,

    /// URL de submissão do provedor.
    #[serde(default = "default_submit_url")]
    pub submit_url: String,

    /// Prompt de colorização padrão.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,

    /// Proporção padrão da imagem de saída.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Formato padrão da imagem de saída.
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Teto de consultas de status por job.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Tabela de esperas (ms) entre consultas, não-decrescente.
    #[serde(default = "default_schedule_ms")]
    pub poll_schedule_ms: Vec<u64>,

    /// Créditos concedidos a um usuário novo (free trial).
    #[serde(default = "default_free_trial_credits")]
    pub free_trial_credits: u64,
}

// Valor padrão para a URL de submissão: endpoint Flux Kontext Pro.
fn default_submit_url() -> String {
    "https://api.bfl.ai/v1/flux-kontext-pro".to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

// Valor padrão para a proporção: quadrada.
fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

fn default_output_format() -> String {
    "png".to_string()
}

// Valor padrão para o teto de tentativas: 48.
fn default_max_attempts() -> u32 {
    48
}

fn default_schedule_ms() -> Vec<u64> {
    PollConfig::default().schedule_ms
}

// Apenas 1 tentativa gratuita por usuário novo.
fn default_free_trial_credits() -> u64 {
    1
}

impl Default for RecolorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            submit_url: default_submit_url(),
            default_prompt: default_prompt(),
            aspect_ratio: default_aspect_ratio(),
            output_format: default_output_format(),
            max_attempts: default_max_attempts(),
            poll_schedule_ms: default_schedule_ms(),
            free_trial_credits: default_free_trial_credits(),
        }
    }
}

impl RecolorConfig {
    /// Carrega a configuração de `recolor.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("recolor.toml"))
    }

    /// Carrega a configuração do caminho indicado.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RecolorConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("BFL_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Monta o [`PollConfig`] correspondente, validando a tabela de esperas.
    pub fn poll_config(&self) -> Result<PollConfig> {
        let config = PollConfig {
            max_attempts: self.max_attempts.max(1),
            schedule_ms: if self.poll_schedule_ms.is_empty() {
                default_schedule_ms()
            } else {
                self.poll_schedule_ms.clone()
            },
        };
        if !config.is_monotone() {
            anyhow::bail!("poll_schedule_ms must be non-decreasing");
        }
        Ok(config)
    }
}
