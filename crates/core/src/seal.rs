//! Maturity seal: the badge shown for an organization's classification.

use serde::Serialize;

use crate::maturity::{MaturityClassification, MAX_LEVEL, MIN_TARGET_LEVEL};

pub const SEAL_SUBTITLE: &str = "Gestão de Riscos ISO 31000";
pub const CERTIFIED_ICON: &str = "bi-award-fill";
pub const PENDING_ICON: &str = "bi-hourglass-split";

/// `(level, primary color, secondary color, color name)`.
const LEVEL_COLORS: &[(u8, &str, &str, &str)] = &[
    (1, "#6c757d", "#495057", "Cinza"),
    (2, "#ffc107", "#e0a800", "Bronze"),
    (3, "#fd7e14", "#e8590c", "Prata"),
    (4, "#20c997", "#1aa179", "Ouro"),
    (5, "#6f42c1", "#59359a", "Platina"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaturitySeal {
    #[serde(rename = "mostrar_selo")]
    pub visible: bool,
    #[serde(rename = "nivel")]
    pub level: u8,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "subtitulo")]
    pub subtitle: &'static str,
    #[serde(rename = "cor_principal")]
    pub primary_color: &'static str,
    #[serde(rename = "cor_secundaria")]
    pub secondary_color: &'static str,
    #[serde(rename = "nome_cor")]
    pub color_name: &'static str,
    #[serde(rename = "icone")]
    pub icon: &'static str,
    #[serde(rename = "certificado")]
    pub certified: bool,
}

impl MaturitySeal {
    pub fn for_classification(classification: &MaturityClassification) -> Self {
        let level = classification.level;
        let certifiable = (MIN_TARGET_LEVEL..=MAX_LEVEL).contains(&level);

        match LEVEL_COLORS.iter().find(|(l, ..)| *l == level) {
            Some(&(_, primary, secondary, name))
                if classification.is_certified() && certifiable =>
            {
                Self {
                    visible: true,
                    level,
                    title: format!("Nível {level}"),
                    subtitle: SEAL_SUBTITLE,
                    primary_color: primary,
                    secondary_color: secondary,
                    color_name: name,
                    icon: CERTIFIED_ICON,
                    certified: true,
                }
            }
            _ => Self::pending(),
        }
    }

    /// Seal shown while no level is certified.
    pub fn pending() -> Self {
        let (_, primary, secondary, _) = LEVEL_COLORS[0];
        Self {
            visible: true,
            level: 1,
            title: "Nível Inicial".to_string(),
            subtitle: "Continue avaliando para obter certificação",
            primary_color: primary,
            secondary_color: secondary,
            color_name: "Sem Certificação",
            icon: PENDING_ICON,
            certified: false,
        }
    }
}
