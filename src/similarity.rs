//! Puntuación de similitud entre dos textos.
//!
//! Se construye un espacio TF-IDF restringido al corpus de dos documentos
//! que se están comparando, con una lista fija de palabras vacías en
//! inglés, y se calcula la similitud del coseno entre los dos vectores,
//! escalada a un porcentaje en [0, 100].

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

/// Palabras vacías del inglés excluidas del vocabulario. Lista fija; los
/// corpus que se comparan están redactados en ese idioma.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had", "has",
    "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
    "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours", "yourself", "yourselves",
];

/// Longitud mínima de un término; los tokens de un solo carácter no aportan.
const MIN_TOKEN_CHARS: usize = 2;

/// Devuelve la similitud entre dos textos como porcentaje en [0, 100].
///
/// Casos límite, en orden de prioridad:
///   1. Si cualquiera de los textos queda vacío tras recortar espacios,
///      se devuelve 0.0 sin intentar vectorizar.
///   2. Si la vectorización degenera (vocabulario vacío tras quitar las
///      palabras vacías), se registra un diagnóstico y se devuelve 0.0.
pub fn score(text_a: &str, text_b: &str) -> f64 {
    if text_a.trim().is_empty() || text_b.trim().is_empty() {
        return 0.0;
    }

    let tokens_a = tokenize(text_a);
    let tokens_b = tokenize(text_b);

    match cosine_tfidf(&tokens_a, &tokens_b) {
        Some(similarity) => (similarity * 100.0).clamp(0.0, 100.0),
        None => {
            warn!("No se pudo vectorizar la pareja: vocabulario vacío tras filtrar palabras vacías.");
            0.0
        }
    }
}

/// Tokeniza en minúsculas sobre secuencias alfanuméricas, descartando los
/// términos demasiado cortos y las palabras vacías.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Similitud del coseno en el espacio TF-IDF de dos documentos.
/// `None` cuando el vocabulario conjunto está vacío (espacio degenerado).
/// IDF suavizado: ln((1 + n) / (1 + df)) + 1, con n = 2 documentos.
fn cosine_tfidf(tokens_a: &[String], tokens_b: &[String]) -> Option<f64> {
    let counts_a = term_counts(tokens_a);
    let counts_b = term_counts(tokens_b);

    let vocabulary: BTreeSet<&str> = counts_a.keys().chain(counts_b.keys()).copied().collect();
    if vocabulary.is_empty() {
        return None;
    }

    let documents = 2.0_f64;
    let mut vector_a = Vec::with_capacity(vocabulary.len());
    let mut vector_b = Vec::with_capacity(vocabulary.len());
    for term in &vocabulary {
        let tf_a = counts_a.get(term).copied().unwrap_or(0) as f64;
        let tf_b = counts_b.get(term).copied().unwrap_or(0) as f64;
        let df = [tf_a, tf_b].iter().filter(|&&tf| tf > 0.0).count() as f64;
        let idf = ((1.0 + documents) / (1.0 + df)).ln() + 1.0;
        vector_a.push(tf_a * idf);
        vector_b.push(tf_b * idf);
    }

    let norm_a = vector_a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = vector_b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    let dot: f64 = vector_a.iter().zip(&vector_b).map(|(x, y)| x * y).sum();
    Some(dot / (norm_a * norm_b))
}
