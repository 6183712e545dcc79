//! Tipos de dados para requisições e respostas da API de análise de emoções.
//!
//! Todas as structs derivam `Serialize` e `Deserialize` para conversão JSON
//! conforme o contrato do serviço remoto: submissão de jobs, consulta de
//! estado e o payload aninhado de predições de um job concluído.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identificador opaco de um job remoto, cunhado pelo serviço na submissão.
///
/// O cliente nunca constrói um id localmente; apenas repassa o valor
/// retornado por [`SubmitResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Estado de ciclo de vida de um job reportado pelo serviço remoto.
///
/// `Completed` e `Failed` são terminais. Valores não reconhecidos no wire
/// são mapeados para `Unknown` e tratados como não-terminais pelo waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Um status terminal nunca muda novamente.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "QUEUED"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
            JobStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Snapshot do estado de um job retornado por `GET /jobs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    /// Status atual do job.
    pub status: JobStatus,
    /// Mensagem de falha fornecida pelo serviço quando `status` é FAILED.
    #[serde(default)]
    pub message: Option<String>,
    /// Instante de criação do job, quando reportado.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Instante de término (sucesso ou falha), quando reportado.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Corpo da requisição `POST /jobs` que submete texto para análise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Trechos de texto a analisar (um job pode carregar vários).
    pub text: Vec<String>,
    /// Granularidade da análise: "word", "sentence" ou "passage".
    pub granularity: String,
}

/// Resposta da submissão, contendo apenas o id do job criado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// Um arquivo de origem dentro do payload de predições.
///
/// O payload de um job concluído é uma lista de arquivos; cada arquivo
/// carrega uma lista de predições de linguagem. A profundidade do
/// aninhamento é um contrato fixo com o serviço — campos de estrutura
/// ausentes são erro de formato, nunca dados a ignorar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Nome do arquivo de origem, quando presente (submissões de texto puro
    /// normalmente não têm).
    #[serde(default)]
    pub filename: Option<String>,
    pub predictions: Vec<LanguagePrediction>,
}

/// Uma predição do modelo de linguagem para um arquivo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePrediction {
    pub grouped_predictions: Vec<GroupedPrediction>,
}

/// Grupo de predições por unidade (ex.: todas as sentenças de um trecho).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedPrediction {
    /// Identificador do grupo atribuído pelo serviço, quando presente.
    #[serde(default)]
    pub id: Option<String>,
    pub predictions: Vec<UnitPrediction>,
}

/// Predição para uma única unidade de texto (sentença, palavra ou trecho).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitPrediction {
    /// Texto da unidade analisada, quando presente.
    #[serde(default)]
    pub text: Option<String>,
    /// Pares (emoção, score bruto) com score em `[0, 1]`.
    pub emotions: Vec<EmotionScore>,
}

/// Um par (nome de emoção, score bruto) atribuído a uma unidade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionScore {
    pub name: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_wire_format() {
        let status: JobStatus = serde_json::from_str(r#""COMPLETED""#).unwrap();
        assert_eq!(status, JobStatus::Completed);
        assert_eq!(serde_json::to_string(&JobStatus::Queued).unwrap(), r#""QUEUED""#);
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let status: JobStatus = serde_json::from_str(r#""ARCHIVED""#).unwrap();
        assert_eq!(status, JobStatus::Unknown);
        assert!(!status.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn job_state_deserialize_minimal() {
        let state: JobState = serde_json::from_str(r#"{"status": "RUNNING"}"#).unwrap();
        assert_eq!(state.status, JobStatus::Running);
        assert_eq!(state.message, None);
        assert_eq!(state.created_at, None);
    }

    #[test]
    fn job_state_deserialize_failed_with_message() {
        let json = r#"{
            "status": "FAILED",
            "message": "model capacity exceeded",
            "created_at": "2026-03-01T12:00:00Z",
            "ended_at": "2026-03-01T12:01:30Z"
        }"#;
        let state: JobState = serde_json::from_str(json).unwrap();
        assert_eq!(state.status, JobStatus::Failed);
        assert_eq!(state.message.as_deref(), Some("model capacity exceeded"));
        assert!(state.ended_at.unwrap() > state.created_at.unwrap());
    }

    #[test]
    fn submit_request_roundtrip() {
        let req = SubmitRequest {
            text: vec!["I feel great today".into()],
            granularity: "sentence".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let parsed: SubmitRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.text.len(), 1);
        assert_eq!(parsed.granularity, "sentence");
    }

    #[test]
    fn payload_deserialize_from_api_format() {
        let json = r#"[{
            "predictions": [{
                "grouped_predictions": [{
                    "id": "g0",
                    "predictions": [{
                        "text": "I feel great",
                        "emotions": [
                            {"name": "joy", "score": 0.82},
                            {"name": "calmness", "score": 0.41}
                        ]
                    }]
                }]
            }]
        }]"#;
        let files: Vec<SourceFile> = serde_json::from_str(json).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, None);
        let unit = &files[0].predictions[0].grouped_predictions[0].predictions[0];
        assert_eq!(unit.emotions[0].name, "joy");
        assert!((unit.emotions[0].score - 0.82).abs() < f64::EPSILON);
    }

    #[test]
    fn payload_missing_nesting_level_is_an_error() {
        // Um arquivo sem o campo "predictions" viola o contrato de formato.
        let json = r#"[{"filename": "a.txt"}]"#;
        assert!(serde_json::from_str::<Vec<SourceFile>>(json).is_err());
    }
}
