use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Chiave di ordinamento insensibile a maiuscole e accenti ("Ètienne" ~ "etienne").
pub fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Ordina e rimuove i duplicati (case-insensitive), mantenendo la prima grafia incontrata.
pub fn sort_dedup(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        let lower = value.to_lowercase();
        if out.iter().any(|v| v.to_lowercase() == lower) {
            continue;
        }
        out.push(value);
    }
    out.sort_by(|a, b| {
        collation_key(a)
            .cmp(&collation_key(b))
            .then_with(|| a.cmp(b))
    });
    out
}

/// Spazi compressi e bordi rimossi
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Chiave di login derivata da nome e cognome: "  Mario   ROSSI " -> "mario rossi"
/// Forma canonica dell'operatore usata per confronti e vincoli di unicità.
/// `lower()` di SQLite gestisce solo ASCII, quindi la chiave si calcola qui.
pub fn operator_key(operator: &str) -> String {
    collapse_whitespace(operator).to_lowercase()
}

pub fn login_key_from_name(first_name: &str, last_name: &str) -> String {
    collapse_whitespace(&format!("{} {}", first_name, last_name)).to_lowercase()
}

pub fn login_key_from_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parole (minuscole) di una ricerca libera
pub fn search_tokens(s: &str) -> Vec<String> {
    s.split_whitespace().map(|t| t.to_lowercase()).collect()
}
