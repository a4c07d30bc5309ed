//! Fallback reasons for banned matches whose rule has none.

use super::PatternRule;

/// Well-known sensitive-file signatures, checked in order against the
/// lower-cased path. Each signature is a list of alternatives.
const SIGNATURES: &[(Signature, &str)] = &[
    (Signature::Suffix(&[".pem", ".key", ".p12", ".pfx", ".p8"]), "Private key"),
    (Signature::Contains(&["id_rsa"]), "SSH private key"),
    (
        Signature::Contains(&["google-services", "serviceaccount"]),
        "Cloud credentials",
    ),
    (Signature::Contains(&[".aws/", "credentials"]), "Credentials"),
    (Signature::Contains(&[".env"]), "Dotenv secrets"),
    (Signature::Suffix(&[".db", ".sqlite"]), "Database dump"),
    (Signature::Suffix(&[".log"]), "Log output"),
    (Signature::Contains(&["node_modules/"]), "Vendored dependencies"),
    (Signature::Contains(&["dist/"]), "Build output"),
    (Signature::Contains(&[".vscode", ".idea"]), "IDE settings"),
    (Signature::Contains(&["coverage", "nyc_output"]), "Coverage output"),
    (Signature::Contains(&["thumbs.db", ".ds_store"]), "OS artifact"),
    (Signature::Contains(&["tfvars"]), "Terraform secrets"),
    (
        Signature::Contains(&["docker-compose.override"]),
        "Service credentials",
    ),
];

enum Signature {
    Suffix(&'static [&'static str]),
    Contains(&'static [&'static str]),
}

impl Signature {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Signature::Suffix(alts) => alts.iter().any(|s| lower.ends_with(s)),
            Signature::Contains(alts) => alts.iter().any(|s| lower.contains(s)),
        }
    }
}

/// Heuristic reason for a path, if it has a well-known signature.
pub fn heuristic_reason(file: &str) -> Option<&'static str> {
    let lower = file.to_lowercase();
    SIGNATURES
        .iter()
        .find(|(sig, _)| sig.matches(&lower))
        .map(|(_, reason)| *reason)
}

/// Reason shown for a banned hit: the rule's own, else the heuristic one,
/// else a generic label naming the pattern.
pub fn reason_for(file: &str, rule: &PatternRule) -> String {
    if let Some(reason) = &rule.reason {
        return reason.clone();
    }
    match heuristic_reason(file) {
        Some(reason) => reason.to_string(),
        None => format!("Sensitive ({})", rule.display()),
    }
}
