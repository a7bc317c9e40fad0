//! Carga y gestión de configuración de una ejecución (corpus, umbral, trabajadores).

use std::env;
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Result};

/// Umbral de similitud por defecto, en porcentaje.
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// Configuración completa de una ejecución del comparador.
/// Todo el estado de la tubería viaja aquí; no hay globales.
#[derive(Clone, Debug)]
pub struct MatchSettings {
    pub corpus_a: PathBuf,
    pub corpus_b: PathBuf,
    pub threshold: f64,
    pub workers: usize,
    pub output_dir: PathBuf,
}

impl MatchSettings {
    /// Resuelve la configuración combinando los argumentos de línea de comandos
    /// con las variables de entorno (usando .env si existe). Los argumentos
    /// tienen prioridad; las variables aportan los valores por defecto.
    pub fn resolve(
        corpus_a: PathBuf,
        corpus_b: PathBuf,
        threshold: Option<f64>,
        workers: Option<usize>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let threshold = match threshold {
            Some(value) => value,
            None => match env::var("SIMILARITY_THRESHOLD") {
                Ok(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("SIMILARITY_THRESHOLD no es un número válido: {raw}"))?,
                Err(_) => DEFAULT_THRESHOLD,
            },
        };
        if !(0.0..=100.0).contains(&threshold) {
            return Err(anyhow!(
                "El umbral debe estar entre 0 y 100 (recibido: {threshold})"
            ));
        }

        let workers = match workers {
            Some(value) => value,
            None => match env::var("NUM_WORKERS") {
                Ok(raw) => raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("NUM_WORKERS no es un número válido: {raw}"))?,
                Err(_) => default_workers(),
            },
        };
        if workers == 0 {
            return Err(anyhow!("El número de trabajadores debe ser al menos 1"));
        }

        Ok(Self {
            corpus_a,
            corpus_b,
            threshold,
            workers,
            output_dir: resolve_output_dir(output_dir),
        })
    }
}

/// Directorio donde se escriben y se buscan los ficheros de resultados.
/// Por defecto, el directorio de trabajo actual.
pub fn resolve_output_dir(cli_value: Option<PathBuf>) -> PathBuf {
    cli_value
        .or_else(|| env::var("OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Paralelismo disponible en la máquina, con 1 como último recurso.
fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
