//! Emparejamiento corpus contra corpus: reparto del trabajo entre un
//! grupo fijo de trabajadores, umbral y ordenación del resultado.
//!
//! El reparto es por documento del corpus A: cada tarea extrae su texto
//! una vez y recorre el corpus B completo extrayendo y puntuando cada
//! pareja. Las tareas no comparten estado mutable; sus resultados se
//! concatenan cuando el grupo termina y se ordenan al final, de modo que
//! el orden de finalización no influye en la salida.

use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use crate::aggregate;
use crate::config::MatchSettings;
use crate::corpus;
use crate::extract;
use crate::models::{DocumentRef, SimilarityPair};
use crate::similarity;

/// Resumen de los resultados de una ejecución del comparador.
#[derive(Debug, Default)]
pub struct MatchSummary {
    pub documents_a: usize,
    pub documents_b: usize,
    pub pairs_found: usize,
}

/// Implementa cómo se mostrará el resumen como texto.
impl std::fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Resumen: {} documentos en el corpus A, {} en el corpus B, {} parejas por encima del umbral.",
            self.documents_a, self.documents_b, self.pairs_found
        )
    }
}

/// Ejecuta la comparación completa entre los dos corpus de la
/// configuración y devuelve la lista de parejas ordenada por puntuación
/// descendente, junto con el resumen de la ejecución.
pub fn run(settings: &MatchSettings) -> Result<(Vec<SimilarityPair>, MatchSummary)> {
    let documents_a = corpus::index_documents(&settings.corpus_a)?;
    let documents_b = corpus::index_documents(&settings.corpus_b)?;

    info!(
        "Corpus A: {} documentos. Corpus B: {} documentos.",
        documents_a.len(),
        documents_b.len()
    );
    info!("Usando {} trabajadores para la comparación.", settings.workers);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.workers)
        .build()?;

    let total = documents_a.len();
    let threshold = settings.threshold;
    let per_document: Vec<Vec<SimilarityPair>> = pool.install(|| {
        documents_a
            .par_iter()
            .enumerate()
            .map(|(index, document_a)| {
                compare_against_corpus(index, total, document_a, &documents_b, threshold)
            })
            .collect()
    });

    let mut pairs: Vec<SimilarityPair> = per_document.into_iter().flatten().collect();
    aggregate::rank(&mut pairs);

    let summary = MatchSummary {
        documents_a: documents_a.len(),
        documents_b: documents_b.len(),
        pairs_found: pairs.len(),
    };
    Ok((pairs, summary))
}

/// Unidad de trabajo de un trabajador: un documento del corpus A contra
/// el corpus B completo. El texto de B se extrae de nuevo en cada pareja;
/// la tarea es autocontenida y no toca estado compartido.
fn compare_against_corpus(
    index: usize,
    total: usize,
    document_a: &DocumentRef,
    documents_b: &[DocumentRef],
    threshold: f64,
) -> Vec<SimilarityPair> {
    let text_a = extract::extract_text(&document_a.absolute);

    let mut found = Vec::new();
    for document_b in documents_b {
        let text_b = extract::extract_text(&document_b.absolute);
        let score = similarity::score(&text_a, &text_b);
        if score >= threshold {
            found.push(SimilarityPair {
                file_a: document_a.relative.clone(),
                file_b: document_b.relative.clone(),
                score,
            });
        }
    }

    info!(
        "[{}/{}] {}: {} parejas por encima del umbral.",
        index + 1,
        total,
        document_a.relative.display(),
        found.len()
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    // Los corpus de prueba usan .doc con texto plano: el lector genérico
    // rescata su contenido sin depender de ficheros PDF o DOCX reales.
    fn write_doc(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, contents).expect("escritura");
    }

    fn settings(corpus_a: &Path, corpus_b: &Path, threshold: f64, workers: usize) -> MatchSettings {
        MatchSettings {
            corpus_a: corpus_a.to_path_buf(),
            corpus_b: corpus_b.to_path_buf(),
            threshold,
            workers,
            output_dir: PathBuf::from("."),
        }
    }

    const REFERENCE: &str = "consultant post in obstetrics and gynaecology at the \
                             university teaching hospital with on call duties";

    fn build_corpora(dir_a: &Path, dir_b: &Path) {
        // doc2 comparte casi todo el vocabulario con la referencia; doc1 sólo una parte.
        write_doc(
            dir_a,
            "folderX/doc1.doc",
            "advertisement for a consultant post at the regional clinic \
             covering outpatient sessions",
        );
        write_doc(
            dir_a,
            "folderX/doc2.doc",
            "consultant post in obstetrics and gynaecology at the university \
             teaching hospital with weekend duties",
        );
        write_doc(dir_b, "target/ref.doc", REFERENCE);
    }

    #[test]
    fn ordena_descendente_y_respeta_el_umbral() {
        let dir_a = tempdir().expect("tempdir");
        let dir_b = tempdir().expect("tempdir");
        build_corpora(dir_a.path(), dir_b.path());

        let (pairs, summary) =
            run(&settings(dir_a.path(), dir_b.path(), 10.0, 1)).expect("ejecución");

        assert_eq!(summary.documents_a, 2);
        assert_eq!(summary.documents_b, 1);
        assert_eq!(pairs.len(), 2);
        // doc2 es mucho más parecido a la referencia que doc1.
        assert_eq!(pairs[0].file_a, PathBuf::from("folderX/doc2.doc"));
        assert_eq!(pairs[1].file_a, PathBuf::from("folderX/doc1.doc"));
        assert!(pairs[0].score > pairs[1].score);
        for pair in &pairs {
            assert!(pair.score >= 10.0);
            assert_eq!(pair.file_b, PathBuf::from("target/ref.doc"));
        }
    }

    #[test]
    fn un_umbral_alto_produce_un_resultado_vacio() {
        let dir_a = tempdir().expect("tempdir");
        let dir_b = tempdir().expect("tempdir");
        build_corpora(dir_a.path(), dir_b.path());

        let (pairs, summary) =
            run(&settings(dir_a.path(), dir_b.path(), 99.0, 1)).expect("ejecución");
        assert!(pairs.is_empty());
        assert_eq!(summary.pairs_found, 0);
    }

    #[test]
    fn el_numero_de_trabajadores_no_cambia_el_resultado() {
        let dir_a = tempdir().expect("tempdir");
        let dir_b = tempdir().expect("tempdir");
        build_corpora(dir_a.path(), dir_b.path());
        write_doc(
            dir_a.path(),
            "folderY/doc3.doc",
            "university teaching hospital consultant vacancy in obstetrics",
        );

        let (serial, _) = run(&settings(dir_a.path(), dir_b.path(), 10.0, 1)).expect("ejecución");
        let (parallel, _) = run(&settings(dir_a.path(), dir_b.path(), 10.0, 4)).expect("ejecución");
        assert_eq!(serial, parallel);
    }

    #[test]
    fn un_documento_ilegible_no_aborta_la_ejecucion() {
        let dir_a = tempdir().expect("tempdir");
        let dir_b = tempdir().expect("tempdir");
        build_corpora(dir_a.path(), dir_b.path());
        // Un docx corrupto degrada a texto vacío y queda fuera del resultado.
        write_doc(dir_a.path(), "folderZ/roto.docx", "esto no es un zip de verdad");

        let (pairs, summary) =
            run(&settings(dir_a.path(), dir_b.path(), 10.0, 2)).expect("ejecución");
        assert_eq!(summary.documents_a, 3);
        assert!(pairs.iter().all(|p| p.file_a != PathBuf::from("folderZ/roto.docx")));
    }

    #[test]
    fn una_raiz_inexistente_es_error() {
        let dir_b = tempdir().expect("tempdir");
        let result = run(&settings(
            Path::new("/no/existe/corpus_a"),
            dir_b.path(),
            10.0,
            1,
        ));
        assert!(result.is_err());
    }
}
