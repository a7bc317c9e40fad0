//! Escritura y relectura de las tablas de resultados.
//!
//! El listado crudo se guarda como CSV con un sello temporal en el nombre
//! para no pisar ejecuciones anteriores; la tabla agregada se reescribe
//! siempre sobre el mismo fichero. Un fallo de escritura es fatal: la
//! ejecución no se da por completa sin salida duradera.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::Local;
use tracing::{info, warn};

use crate::models::{FolderBest, SimilarityPair};

/// Prefijo y extensión de los ficheros de resultados crudos.
const RESULTS_PREFIX: &str = "similarity_results_";
const RESULTS_EXTENSION: &str = ".csv";

/// Nombre fijo de la tabla agregada.
const AGGREGATED_FILENAME: &str = "cleaned_similarity_results.csv";

/// Guarda el listado ordenado en un CSV nuevo con sello temporal y
/// devuelve la ruta escrita.
pub fn save_results(pairs: &[SimilarityPair], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("{RESULTS_PREFIX}{timestamp}{RESULTS_EXTENSION}"));

    let mut file = File::create(&path)?;
    writeln!(file, "File 1,File 2,Similarity (%)")?;
    for pair in pairs {
        writeln!(
            file,
            "{},{},{:.2}",
            pair.file_a.display(),
            pair.file_b.display(),
            pair.score
        )?;
    }

    info!("Resultados guardados en {}", path.display());
    Ok(path)
}

/// Localiza el fichero de resultados más reciente del directorio. El sello
/// temporal del nombre ordena lexicográficamente, así que basta con
/// quedarse con el mayor.
pub fn find_latest_results(output_dir: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(output_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(std::ffi::OsStr::to_str)
                .map(|name| name.starts_with(RESULTS_PREFIX) && name.ends_with(RESULTS_EXTENSION))
                .unwrap_or(false)
        })
        .collect();

    candidates.sort();
    candidates.pop().ok_or_else(|| {
        anyhow!(
            "No se encontró ningún fichero de resultados en {}",
            output_dir.display()
        )
    })
}

/// Relee una tabla de resultados guardada. La cabecera se salta; las
/// filas que no se pueden interpretar se descartan con un aviso.
pub fn load_results(path: &Path) -> Result<Vec<SimilarityPair>> {
    let contents = fs::read_to_string(path)?;

    let mut pairs = Vec::new();
    for (number, line) in contents.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = line.rsplit_once(',').and_then(|(rest, score_text)| {
            let score = score_text.trim().parse::<f64>().ok()?;
            let (file_a, file_b) = rest.split_once(',')?;
            Some(SimilarityPair {
                file_a: PathBuf::from(file_a),
                file_b: PathBuf::from(file_b),
                score,
            })
        });
        match parsed {
            Some(pair) => pairs.push(pair),
            None => warn!(
                "Fila {} ilegible en {}; se descarta.",
                number + 1,
                path.display()
            ),
        }
    }

    Ok(pairs)
}

/// Escribe la tabla agregada (una fila por carpeta del corpus A),
/// sobrescribiendo la agregación anterior si existe.
pub fn save_aggregated(rows: &[FolderBest], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(AGGREGATED_FILENAME);

    let mut file = File::create(&path)?;
    writeln!(file, "File 1 Folder,File 2,Similarity (%)")?;
    for row in rows {
        writeln!(
            file,
            "{},{},{:.2}",
            row.folder.display(),
            row.file_b.display(),
            row.score
        )?;
    }

    info!("Resultados agregados guardados en {}", path.display());
    Ok(path)
}
