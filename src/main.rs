// Módulos de la aplicación
mod aggregate;
mod config;
mod corpus;
mod extract;
mod matcher;
mod models;
mod report;
mod similarity;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Comparador de similitud entre dos corpus de documentos.
#[derive(Parser)]
#[command(name = "doc_similarity_matcher", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compara los dos corpus y guarda el listado ordenado de parejas similares
    Compare {
        /// Raíz del corpus A (las rutas del resultado son relativas a ella)
        corpus_a: PathBuf,
        /// Raíz del corpus B
        corpus_b: PathBuf,
        /// Umbral mínimo de similitud, en porcentaje [0, 100]
        #[arg(long)]
        threshold: Option<f64>,
        /// Número de trabajadores en paralelo (por defecto, los núcleos disponibles)
        #[arg(long)]
        workers: Option<usize>,
        /// Directorio donde guardar el fichero de resultados
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Reduce el último listado generado al mejor emparejamiento por carpeta
    Aggregate {
        /// Directorio donde buscar los resultados y escribir la tabla agregada
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Fichero de resultados concreto (por defecto, el más reciente)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Despachar el subcomando
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare {
            corpus_a,
            corpus_b,
            threshold,
            workers,
            output_dir,
        } => run_compare(corpus_a, corpus_b, threshold, workers, output_dir),
        Commands::Aggregate { output_dir, input } => run_aggregate(output_dir, input),
    }
}

fn run_compare(
    corpus_a: PathBuf,
    corpus_b: PathBuf,
    threshold: Option<f64>,
    workers: Option<usize>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    // 1. Resolver la configuración de la ejecución
    let settings = config::MatchSettings::resolve(corpus_a, corpus_b, threshold, workers, output_dir)?;
    info!("Comparando documentos en:");
    info!("  corpus A: {}", settings.corpus_a.display());
    info!("  corpus B: {}", settings.corpus_b.display());
    info!("  umbral: {:.2}%", settings.threshold);

    // 2. Ejecutar la comparación completa
    let (pairs, summary) = matcher::run(&settings)?;

    // 3. Guardar el listado ordenado
    let output_path = report::save_results(&pairs, &settings.output_dir)?;

    info!("{summary}");
    info!("Listado completo disponible en {}", output_path.display());
    Ok(())
}

fn run_aggregate(output_dir: Option<PathBuf>, input: Option<PathBuf>) -> Result<()> {
    // 1. Localizar la tabla de entrada
    let output_dir = config::resolve_output_dir(output_dir);
    let input_path = match input {
        Some(path) => path,
        None => report::find_latest_results(&output_dir)?,
    };
    info!("Agregando resultados de {}", input_path.display());

    // 2. Releer, reordenar y reducir por carpeta
    let mut pairs = report::load_results(&input_path)?;
    aggregate::rank(&mut pairs);
    let rows = aggregate::reduce_by_folder(&pairs);

    // 3. Guardar la tabla agregada
    let output_path = report::save_aggregated(&rows, &output_dir)?;
    info!(
        "{} carpetas con emparejamiento; tabla agregada en {}",
        rows.len(),
        output_path.display()
    );
    Ok(())
}
