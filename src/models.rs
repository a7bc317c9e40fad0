//! Modelos de dominio (referencias a documentos y filas de resultados).

use serde::Serialize;
use std::path::PathBuf;

/// Identidad de un documento dentro de un corpus.
/// La ruta relativa a la raíz del corpus es la identidad visible hacia fuera;
/// la absoluta sólo se usa para leer el fichero. Inmutable una vez indexado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub absolute: PathBuf,
    pub relative: PathBuf,
}

/// Una comparación puntuada entre un documento del corpus A y uno del B.
/// La puntuación es un porcentaje en [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    pub score: f64,
}

/// Fila del resultado agregado: el mejor emparejamiento de una carpeta
/// del corpus A. La carpeta raíz se representa con la ruta vacía.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderBest {
    pub folder: PathBuf,
    pub file_b: PathBuf,
    pub score: f64,
}
