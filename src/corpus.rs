//! Indexado recursivo de un corpus: enumera los documentos elegibles
//! bajo una raíz, filtrando por extensión y descartando ficheros de
//! bloqueo transitorios de las suites ofimáticas.

use std::path::Path;

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

use crate::models::DocumentRef;

/// Extensiones de documento admitidas (sin distinguir mayúsculas).
const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Prefijo de los ficheros de bloqueo que Office deja mientras un
/// documento está abierto.
const LOCK_FILE_PREFIX: &str = "~$";

/// Recorre el subárbol completo bajo `root` y devuelve las referencias de
/// los documentos elegibles, en orden de recorrido del sistema de ficheros.
/// Una raíz que no sea un directorio es un error de configuración fatal.
pub fn index_documents(root: &Path) -> Result<Vec<DocumentRef>> {
    if !root.is_dir() {
        return Err(anyhow!(
            "La raíz del corpus no es un directorio: {}",
            root.display()
        ));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_eligible(path) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        documents.push(DocumentRef {
            absolute: path.to_path_buf(),
            relative,
        });
    }

    Ok(documents)
}

fn is_eligible(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
        .to_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return false;
    }
    let filename = path.file_name().and_then(std::ffi::OsStr::to_str).unwrap_or("");
    !filename.starts_with(LOCK_FILE_PREFIX)
}
