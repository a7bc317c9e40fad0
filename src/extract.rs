//! Extracción de texto plano de un documento, polimórfica sobre el formato.
//!
//! Contrato: `extract_text(path) -> String`. Cualquier fallo (fichero
//! corrupto, codificación no soportada, error de E/S) se queda dentro de
//! este módulo: se registra un diagnóstico con la ruta y el detalle y se
//! devuelve la cadena vacía, de modo que un documento malo nunca aborta
//! la comparación completa.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::warn;

/// Variantes de formato reconocidas, derivadas de la extensión del fichero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Other,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            _ => Self::Other,
        }
    }
}

/// Extrae el texto de un documento. Devuelve la cadena vacía si la
/// extracción falla por cualquier motivo; el fallo se registra aquí.
pub fn extract_text(path: &Path) -> String {
    let result = match DocumentKind::from_path(path) {
        DocumentKind::Pdf => extract_pdf(path),
        DocumentKind::Docx => extract_docx(path),
        // Los formatos antiguos y el resto pasan por el lector genérico.
        DocumentKind::Doc | DocumentKind::Other => extract_sniffed(path),
    };
    match result {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "No se pudo extraer texto de {}: {err}. Se continúa con texto vacío.",
                path.display()
            );
            String::new()
        }
    }
}

fn extract_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path)
        .map_err(|err| anyhow!("error leyendo el PDF: {err}"))
}

/// Lee un .docx y concatena el texto de todos sus párrafos separados por
/// espacios. Un .docx es un ZIP con XML dentro; docx-rs lo expone como el
/// árbol Document → Paragraph → Run → Text.
fn extract_docx(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let docx = read_docx(&bytes).map_err(|err| anyhow!("error analizando el .docx: {err:?}"))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut runs = Vec::new();
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            runs.push(text.text.clone());
                        }
                    }
                }
            }
            let paragraph_text = runs.concat();
            if !paragraph_text.trim().is_empty() {
                paragraphs.push(paragraph_text);
            }
        }
    }

    Ok(paragraphs.join(" "))
}

/// Lector genérico para el resto de formatos: si el tipo MIME apunta a un
/// fichero de texto se lee tal cual; si no, se rescatan las secuencias de
/// caracteres imprimibles incrustadas en el binario (suficiente para el
/// texto plano que contienen los .doc antiguos).
fn extract_sniffed(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let mime = mime_guess::from_path(path).first();
    if mime.map(|m| m.type_() == mime_guess::mime::TEXT).unwrap_or(false) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(harvest_printable_runs(&bytes))
}

/// Longitud mínima de una secuencia imprimible para considerarla texto real
/// y no ruido del contenedor binario.
const MIN_RUN_CHARS: usize = 4;

fn harvest_printable_runs(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in decoded.chars() {
        let printable = ch == ' ' || ch == '\t' || (!ch.is_control() && ch != '\u{FFFD}');
        if printable {
            current.push(ch);
        } else if !current.is_empty() {
            push_run(&mut runs, &mut current);
        }
    }
    if !current.is_empty() {
        push_run(&mut runs, &mut current);
    }

    runs.join(" ")
}

fn push_run(runs: &mut Vec<String>, current: &mut String) {
    let candidate = std::mem::take(current);
    let trimmed = candidate.trim();
    if trimmed.chars().count() >= MIN_RUN_CHARS && trimmed.chars().any(|c| c.is_alphanumeric()) {
        runs.push(trimmed.to_string());
    }
}
