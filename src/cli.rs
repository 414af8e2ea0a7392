//! Interface de linha de comando do recolor baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (colorize, scan,
//! credits) e flags globais (--user, --max-attempts, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// recolor — colorização de imagens e digitalização de documentos via APIs generativas.
#[derive(Debug, Parser)]
#[command(name = "recolor", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Identificador do usuário dono dos créditos.
    #[arg(long, global = true, default_value = "demo")]
    pub user: String,

    /// Teto de consultas de status por job (sobrepõe o arquivo de configuração).
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Coloriza uma imagem em preto e branco.
    Colorize {
        /// Caminho da imagem de entrada (JPEG, PNG ou WebP).
        image: PathBuf,

        /// Instrução de colorização; usa o prompt padrão se omitida.
        #[arg(long)]
        prompt: Option<String>,

        /// Proporção da imagem de saída (ex.: "1:1", "16:9").
        #[arg(long)]
        aspect_ratio: Option<String>,

        /// Formato da imagem de saída (ex.: "png", "jpeg").
        #[arg(long)]
        output_format: Option<String>,
    },

    /// Extrai o texto de um documento digitalizado (OCR simulado).
    Scan {
        /// Caminho da imagem do documento.
        image: PathBuf,
    },

    /// Mostra o saldo de créditos do usuário.
    Credits,
}
