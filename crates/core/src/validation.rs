//! Input validation shared by the HTTP layer.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Institutional e-mail suffix required at login.
pub const INSTITUTIONAL_EMAIL_SUFFIX: &str = "mt.gov.br";

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Evidence file extensions accepted by the upload endpoint.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &[
    "txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "xls", "xlsx",
];

/// Default maximum upload size: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Longest stored filename component after sanitizing.
pub const MAX_FILENAME_LENGTH: usize = 200;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Reject empty or whitespace-only values for a required field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("Campo obrigatório: {field}")));
    }
    Ok(())
}

/// Login e-mails must belong to the state government domain.
pub fn validate_institutional_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(CoreError::Validation("E-mail inválido".to_string()));
    }
    if !email.to_ascii_lowercase().ends_with(INSTITUTIONAL_EMAIL_SUFFIX) {
        return Err(CoreError::Validation(format!(
            "Use um e-mail institucional ({INSTITUTIONAL_EMAIL_SUFFIX})"
        )));
    }
    Ok(())
}

/// Passwords must be at least [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "A senha deve ter pelo menos {MIN_PASSWORD_LENGTH} caracteres"
        )));
    }
    Ok(())
}

/// Returns the lower-cased extension when it is allowed.
pub fn validate_upload_extension(filename: &str) -> Result<String, CoreError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| CoreError::Validation("Arquivo sem extensão".to_string()))?;

    if !ALLOWED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CoreError::Validation(format!(
            "Tipo de arquivo não permitido: .{extension}. Permitidos: {}",
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        )));
    }
    Ok(extension)
}

/// Reduce an uploaded filename to a safe single path component.
///
/// Directory parts are dropped, runs of unsafe characters become `_`,
/// leading dots are stripped. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let trimmed = cleaned.trim_start_matches('.');

    let mut result: String = trimmed.chars().take(MAX_FILENAME_LENGTH).collect();
    if result.is_empty() || result.chars().all(|c| c == '_') {
        result = "arquivo".to_string();
    }
    result
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn required_field_rejects_blank() {
        assert!(require_non_empty("nome", "CGE").is_ok());
        assert_matches!(
            require_non_empty("nome", "  "),
            Err(CoreError::Validation(msg)) if msg.contains("nome")
        );
    }

    #[test]
    fn institutional_email_suffix() {
        assert!(validate_institutional_email("admin@cge.mt.gov.br").is_ok());
        assert!(validate_institutional_email("Fulano@SEFAZ.MT.GOV.BR").is_ok());
        assert_matches!(
            validate_institutional_email("someone@gmail.com"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(validate_institutional_email(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password_strength("123456").is_ok());
        assert!(validate_password_strength("çççççç").is_ok());
        assert_matches!(validate_password_strength("12345"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn upload_extensions() {
        assert_eq!(validate_upload_extension("relatorio.PDF").unwrap(), "pdf");
        assert_eq!(validate_upload_extension("a.b.xlsx").unwrap(), "xlsx");
        assert_matches!(validate_upload_extension("script.exe"), Err(CoreError::Validation(_)));
        assert_matches!(validate_upload_extension("LEIAME"), Err(CoreError::Validation(_)));
        assert_matches!(validate_upload_extension("ponto."), Err(CoreError::Validation(_)));
    }

    #[test]
    fn sanitize_strips_paths_and_unsafe_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\plano final.pdf"), "plano_final.pdf");
        assert_eq!(sanitize_filename("..hidden.txt"), "hidden.txt");
        assert_eq!(sanitize_filename("política de riscos.docx"), "pol_tica_de_riscos.docx");
        assert_eq!(sanitize_filename("///"), "arquivo");
    }
}
