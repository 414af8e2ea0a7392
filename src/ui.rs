//! Interface de terminal do recolor — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente
//! a submissão e o polling de um job no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{JobReport, JobStatus, Outcome};

/// Indicador visual de progresso para a execução de um job no terminal.
///
/// Exibe um spinner animado durante o processamento e mensagens
/// coloridas para sucesso (verde), falha (vermelho) e avisos (amarelo).
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
    // Estilo amarelo para avisos e estados intermediários.
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com a descrição do job e retorna a instância de progresso.
    pub fn start(description: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("SUBMIT: {description}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir o polling em andamento.
    #[allow(dead_code)]
    pub fn polling(&self, job_id: &str) {
        self.pb.set_message(format!("POLL: {job_id}"));
    }

    /// Finaliza o spinner e exibe o resultado final do job.
    ///
    /// Sucesso é mostrado em verde com checkmark; falha em vermelho com X.
    pub fn complete(&self, outcome: &Outcome) {
        self.pb.finish_and_clear();
        match outcome {
            Outcome::Success { artifact } => {
                println!("  {} Job completed: {artifact}", self.green.apply_to("✓"));
            }
            Outcome::Failure { kind, message } => {
                println!(
                    "  {} Job failed ({kind:?}): {message}",
                    self.red.apply_to("✗")
                );
            }
        }
    }

    /// Imprime o relatório do job formatado em JSON com estilo colorido.
    pub fn print_report(&self, report: &JobReport) {
        let status_style = match report.status {
            JobStatus::Ready => &self.green,
            JobStatus::Cancelled => &self.yellow,
            _ => &self.red,
        };
        println!();
        println!("{}", status_style.apply_to("─── Job Report ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_default()
        );
    }
}
