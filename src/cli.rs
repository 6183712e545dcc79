//! Interface de linha de comando do SENTIO baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (analyze, status,
//! demo) e flags globais (--granularity, --timeout, --verbose).

use clap::{Parser, Subcommand, ValueEnum};

/// SENTIO — Cliente de análise de emoções em texto.
#[derive(Debug, Parser)]
#[command(name = "sentio", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Granularidade da análise nesta sessão.
    #[arg(long, global = true)]
    pub granularity: Option<GranularityArg>,

    /// Orçamento total de espera pelo job, em segundos.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Granularidade aceita pela CLI, repassada ao serviço na submissão.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    /// Análise palavra a palavra.
    Word,
    /// Análise por sentença (padrão).
    Sentence,
    /// Análise do trecho inteiro.
    Passage,
}

impl GranularityArg {
    /// Nome do nível de granularidade no formato aceito pelo serviço.
    pub fn as_wire(self) -> &'static str {
        match self {
            GranularityArg::Word => "word",
            GranularityArg::Sentence => "sentence",
            GranularityArg::Passage => "passage",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submete texto para análise e espera pelo resultado.
    Analyze {
        /// Texto a analisar.
        text: Option<String>,

        /// Caminho para um arquivo de texto a analisar.
        #[arg(long)]
        file: Option<String>,
    },

    /// Consulta o status atual de um job já submetido.
    Status {
        /// Identificador do job retornado na submissão.
        job_id: String,
    },

    /// Executa a agregação sobre um payload de demonstração embutido.
    Demo,
}
