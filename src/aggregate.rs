//! Postprocesado del listado de parejas: ordenación por puntuación y
//! reducción al mejor emparejamiento por carpeta del corpus A.
//!
//! Las dos operaciones son funciones puras del conjunto de entrada; el
//! desempate es determinista (ruta A y después ruta B, por orden
//! lexicográfico), así que el orden de llegada nunca influye.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::models::{FolderBest, SimilarityPair};

/// Ordena las parejas por puntuación descendente. Con puntuaciones
/// iguales ordena por ruta A y después por ruta B. Idempotente.
pub fn rank(pairs: &mut [SimilarityPair]) {
    pairs.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.file_a.cmp(&right.file_a))
            .then_with(|| left.file_b.cmp(&right.file_b))
    });
}

/// Reduce el listado a una fila por carpeta distinta del corpus A: la
/// pareja de mayor puntuación de esa carpeta (en caso de empate exacto,
/// la primera según el orden determinista). Las filas salen ordenadas por
/// puntuación descendente.
pub fn reduce_by_folder(pairs: &[SimilarityPair]) -> Vec<FolderBest> {
    let mut best_by_folder: HashMap<PathBuf, &SimilarityPair> = HashMap::new();
    for pair in pairs {
        let folder = pair
            .file_a
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        best_by_folder
            .entry(folder)
            .and_modify(|current| {
                if beats(pair, current) {
                    *current = pair;
                }
            })
            .or_insert(pair);
    }

    let mut rows: Vec<FolderBest> = best_by_folder
        .into_iter()
        .map(|(folder, pair)| FolderBest {
            folder,
            file_b: pair.file_b.clone(),
            score: pair.score,
        })
        .collect();

    rows.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| left.folder.cmp(&right.folder))
    });
    rows
}

/// ¿Debe `candidate` sustituir a `current` como mejor pareja de la carpeta?
fn beats(candidate: &SimilarityPair, current: &SimilarityPair) -> bool {
    if candidate.score != current.score {
        return candidate.score > current.score;
    }
    (&candidate.file_a, &candidate.file_b) < (&current.file_a, &current.file_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn pair(file_a: &str, file_b: &str, score: f64) -> SimilarityPair {
        SimilarityPair {
            file_a: PathBuf::from(file_a),
            file_b: PathBuf::from(file_b),
            score,
        }
    }

    #[test]
    fn ordena_descendente_y_es_idempotente() {
        let mut pairs = vec![
            pair("folderX/doc1.docx", "target/ref.pdf", 45.0),
            pair("folderX/doc2.docx", "target/ref.pdf", 72.0),
            pair("folderY/doc3.docx", "target/otro.pdf", 72.0),
        ];
        rank(&mut pairs);
        let first = pairs.clone();
        rank(&mut pairs);
        assert_eq!(pairs, first);

        assert!(pairs.windows(2).all(|w| w[0].score >= w[1].score));
        // Empate a 72: gana la ruta A lexicográficamente menor.
        assert_eq!(pairs[0].file_a, Path::new("folderX/doc2.docx"));
        assert_eq!(pairs[1].file_a, Path::new("folderY/doc3.docx"));
    }

    #[test]
    fn conserva_solo_la_mejor_pareja_de_cada_carpeta() {
        let pairs = vec![
            pair("folderX/doc2.docx", "target/ref.pdf", 72.0),
            pair("folderX/doc1.docx", "target/ref.pdf", 45.0),
        ];
        let rows = reduce_by_folder(&pairs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].folder, PathBuf::from("folderX"));
        assert_eq!(rows[0].file_b, PathBuf::from("target/ref.pdf"));
        assert!((rows[0].score - 72.0).abs() < 1e-9);
    }

    #[test]
    fn cada_carpeta_aporta_su_maximo_y_salen_ordenadas() {
        let pairs = vec![
            pair("folderX/doc1.docx", "b1.pdf", 30.0),
            pair("folderX/doc2.docx", "b2.pdf", 55.0),
            pair("folderY/doc3.docx", "b3.pdf", 80.0),
            pair("folderY/doc4.docx", "b4.pdf", 12.0),
            pair("suelto.docx", "b5.pdf", 40.0),
        ];
        let rows = reduce_by_folder(&pairs);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].folder, PathBuf::from("folderY"));
        assert!((rows[0].score - 80.0).abs() < 1e-9);
        assert_eq!(rows[1].folder, PathBuf::from("folderX"));
        // Un documento en la raíz del corpus cae en la carpeta vacía.
        assert_eq!(rows[2].folder, PathBuf::new());
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn los_empates_exactos_se_resuelven_de_forma_determinista() {
        let forward = vec![
            pair("folderX/doc1.docx", "b1.pdf", 50.0),
            pair("folderX/doc2.docx", "b2.pdf", 50.0),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let rows_forward = reduce_by_folder(&forward);
        let rows_backward = reduce_by_folder(&backward);
        assert_eq!(rows_forward, rows_backward);
        assert_eq!(rows_forward[0].file_b, PathBuf::from("b1.pdf"));
    }

    #[test]
    fn la_reduccion_es_pura() {
        let pairs = vec![
            pair("folderX/doc2.docx", "target/ref.pdf", 72.0),
            pair("folderX/doc1.docx", "target/ref.pdf", 45.0),
            pair("folderY/doc9.docx", "target/ref.pdf", 13.0),
        ];
        assert_eq!(reduce_by_folder(&pairs), reduce_by_folder(&pairs));
    }
}
