//! Configuração do SENTIO carregada a partir de `sentio.toml`.
//!
//! A struct [`SentioConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `SENTIO_API_KEY` tem precedência sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::waiter::PollConfig;

/// Configuração de nível superior carregada de `sentio.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SentioConfig {
    /// Chave da API do serviço de análise de emoções.
    #[serde(default)]
    pub api_key: String,

    /// URL base do serviço remoto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Granularidade da análise: "word", "sentence" ou "passage".
    #[serde(default = "default_granularity")]
    pub granularity: String,

    /// Orçamento total de espera por um job, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Valor padrão para a URL base do serviço.
fn default_base_url() -> String {
    "https://api.sentio.dev/v1".to_string()
}

// Valor padrão para a granularidade: por sentença.
fn default_granularity() -> String {
    "sentence".to_string()
}

// Valor padrão para o orçamento de espera: 120s.
fn default_timeout_secs() -> u64 {
    120
}

impl Default for SentioConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            granularity: default_granularity(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SentioConfig {
    /// Carrega a configuração de `sentio.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("sentio.toml"))
    }

    /// Carrega a configuração do caminho fornecido.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SentioConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("SENTIO_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }

    /// Converte o orçamento configurado em um [`PollConfig`] para o waiter.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::default().with_timeout_budget(Duration::from_secs(self.timeout_secs))
    }
}
