//! Interface de terminal do SENTIO — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente a espera
//! por um job no terminal, consumindo os eventos estruturados do waiter.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::aggregate::Reduction;
use crate::api::JobState;
use crate::waiter::{EventSink, JobOutcome, PollEvent};

/// Indicador visual de progresso para a espera de um job no terminal.
///
/// Exibe um spinner animado enquanto o job roda e mensagens coloridas para
/// sucesso (verde), falha (vermelho) e retentativas (amarelo). Implementa
/// [`EventSink`], então o waiter o alimenta sem conhecer o terminal.
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
    // Estilo amarelo para retentativas e timeouts.
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com um resumo do texto submetido.
    pub fn start(text: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("SUBMITTED: {}", preview(text)));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Finaliza o spinner e exibe o desfecho da espera.
    ///
    /// Sucesso é mostrado em verde com checkmark; falha em vermelho com X;
    /// timeout em amarelo com o tempo decorrido.
    pub fn complete(&self, outcome: &JobOutcome) {
        self.pb.finish_and_clear();
        match outcome {
            JobOutcome::Completed(_) => {
                println!("  {} Analysis completed", self.green.apply_to("✓"));
            }
            JobOutcome::Failed(message) => {
                println!("  {} Job failed: {message}", self.red.apply_to("✗"));
            }
            JobOutcome::TimedOut(elapsed) => {
                println!(
                    "  {} Gave up after {}s without a terminal status",
                    self.yellow.apply_to("⏱"),
                    elapsed.as_secs()
                );
            }
        }
    }
}

impl EventSink for JobProgress {
    fn on_event(&self, event: &PollEvent) {
        match event {
            PollEvent::StatusChanged { to, .. } => {
                self.pb.set_message(format!("{to}"));
            }
            PollEvent::TransientError { message } => {
                self.pb.println(format!(
                    "  {} Poll failed, retrying: {message}",
                    self.yellow.apply_to("↻")
                ));
            }
        }
    }
}

/// Imprime a tabela de scores ordenada e destaca a emoção dominante.
///
/// A ordenação decrescente é só apresentação; a tabela subjacente preserva
/// a ordem de primeira ocorrência usada no desempate.
pub fn print_reduction(reduction: &Reduction) {
    let green = Style::new().green().bold();
    let yellow = Style::new().yellow();

    let mut ranked: Vec<(&str, f64)> = reduction.table.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("scores are finite"));

    println!();
    println!("{}", green.apply_to("─── Emotion Scores ───"));
    for (name, score) in &ranked {
        let is_dominant = reduction
            .dominant
            .as_ref()
            .is_some_and(|d| d.name == *name);
        if is_dominant {
            println!("  {} {name:<16} {score:>8.1}", green.apply_to("★"));
        } else {
            println!("    {name:<16} {score:>8.1}");
        }
    }

    match &reduction.dominant {
        Some(dominant) => println!(
            "\n  Dominant emotion: {} ({:.1})",
            green.apply_to(&dominant.name),
            dominant.score
        ),
        None => println!("\n  {}", yellow.apply_to("No emotions detected")),
    }
}

/// Imprime o snapshot de estado de um job (subcomando `status`).
pub fn print_job_state(job_id: &str, state: &JobState) {
    println!("job {job_id}: {}", state.status);
    if !state.status.is_terminal() {
        println!("  still in progress; poll again later");
    }
    if let Some(message) = &state.message {
        println!("  message: {message}");
    }
    if let Some(created) = state.created_at {
        println!("  created: {created}");
    }
    if let Some(ended) = state.ended_at {
        println!("  ended:   {ended}");
    }
}

// Resumo de uma linha do texto submetido para o spinner.
fn preview(text: &str) -> String {
    const MAX: usize = 48;
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX {
        flat
    } else {
        let cut: String = flat.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
