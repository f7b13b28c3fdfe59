//! Activity catalog: the ordered activity codes that make up each
//! maturity level, grouped into KPAs (key process areas).
//!
//! The catalog is read from `modelo_avaliacao.json` at startup. Any
//! failure (missing file, unreadable file, malformed document) falls back
//! to a fixed skeleton so the rest of the system always has a catalog to
//! evaluate against. Loading never returns an error to the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File name of the catalog document.
pub const CATALOG_FILE_NAME: &str = "modelo_avaliacao.json";

/// Default search locations, in precedence order. First existing file wins.
pub const DEFAULT_CATALOG_PATHS: &[&str] = &[
    "modelo_avaliacao.json",
    "public/modelo_avaliacao.json",
    "../public/modelo_avaliacao.json",
    "upload/modelo_avaliacao.json",
];

/// Fallback skeleton: number of activities in each KPA, per level.
///
/// Every level has 30 activities; KPA 2.6 is the short one with 4.
pub const FALLBACK_LEVEL_SHAPE: &[(u8, &[usize])] = &[
    (2, &[5, 5, 5, 6, 5, 4]),
    (3, &[5, 5, 5, 5, 5, 5]),
    (4, &[5, 5, 5, 5, 5, 5]),
    (5, &[5, 5, 5, 5, 5, 5]),
];

/// Area name reported for KPA codes the catalog and the default table
/// do not know.
pub const UNKNOWN_AREA: &str = "Área não identificada";

/// Default area names by KPA index, shared by levels 2 to 5.
const DEFAULT_AREA_NAMES: &[&str] = &[
    "Governança de Riscos",
    "Estratégia e Objetivos",
    "Implementação",
    "Avaliação e Melhoria",
    "Comunicação e Consulta",
    "Monitoramento e Análise Crítica",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where a loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Fallback,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// One KPA of a level: its code, optional area name and ordered activities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpaDefinition {
    pub code: String,
    pub area: Option<String>,
    pub activities: Vec<String>,
}

/// Level -> ordered KPAs -> ordered activity codes.
///
/// Built once per process and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    levels: BTreeMap<u8, Vec<KpaDefinition>>,
    source: CatalogSource,
}

// -- On-disk document shape --------------------------------------------------

#[derive(Deserialize)]
struct CatalogDocument {
    kpas_por_nivel: BTreeMap<String, Vec<KpaEntry>>,
}

#[derive(Deserialize)]
struct KpaEntry {
    codigo: Option<String>,
    area: Option<String>,
    #[serde(default)]
    atividades: Vec<ActivityEntry>,
}

#[derive(Deserialize)]
struct ActivityEntry {
    id: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

impl ActivityCatalog {
    /// The hard-coded skeleton with codes `"{level}.{kpa}.{seq}"`.
    pub fn fallback() -> Self {
        let levels = FALLBACK_LEVEL_SHAPE
            .iter()
            .map(|&(level, sizes)| {
                let kpas = sizes
                    .iter()
                    .enumerate()
                    .map(|(idx, &size)| {
                        let kpa = idx + 1;
                        KpaDefinition {
                            code: format!("{level}.{kpa}"),
                            area: None,
                            activities: (1..=size)
                                .map(|seq| format!("{level}.{kpa}.{seq}"))
                                .collect(),
                        }
                    })
                    .collect();
                (level, kpas)
            })
            .collect();

        Self {
            levels,
            source: CatalogSource::Fallback,
        }
    }

    /// Parse a catalog document.
    ///
    /// Activities without an `id` are skipped. A KPA without `codigo`
    /// takes the KPA prefix of its first activity, or `"{level}.{n}"`
    /// when it has none.
    pub fn from_json_str(json: &str, source: CatalogSource) -> Result<Self, CoreError> {
        let document: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Malformed activity catalog: {e}")))?;

        let mut levels = BTreeMap::new();
        for (key, entries) in document.kpas_por_nivel {
            let level: u8 = key.trim().parse().map_err(|_| {
                CoreError::Validation(format!("Invalid level key '{key}' in activity catalog"))
            })?;

            let kpas = entries
                .into_iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let activities: Vec<String> =
                        entry.atividades.into_iter().filter_map(|a| a.id).collect();
                    let code = entry
                        .codigo
                        .or_else(|| {
                            activities
                                .first()
                                .and_then(|code| kpa_code(code))
                                .map(str::to_string)
                        })
                        .unwrap_or_else(|| format!("{level}.{}", idx + 1));
                    KpaDefinition {
                        code,
                        area: entry.area,
                        activities,
                    }
                })
                .collect();
            levels.insert(level, kpas);
        }

        Ok(Self { levels, source })
    }

    /// Load from the first existing candidate path, falling back to the
    /// skeleton on any failure. Failures are logged, never returned.
    pub fn load(candidates: &[PathBuf]) -> Self {
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            tracing::warn!(
                searched = candidates.len(),
                "Activity catalog not found, using built-in fallback"
            );
            return Self::fallback();
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read activity catalog, using built-in fallback"
                );
                return Self::fallback();
            }
        };

        match Self::from_json_str(&contents, CatalogSource::File(path.clone())) {
            Ok(catalog) => {
                tracing::info!(
                    path = %path.display(),
                    levels = catalog.levels.len(),
                    activities = catalog.total_activities(),
                    "Loaded activity catalog"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Invalid activity catalog, using built-in fallback"
                );
                Self::fallback()
            }
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Levels present in the catalog, ascending.
    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.keys().copied()
    }

    /// KPAs of a level in catalog order. Empty for unknown levels.
    pub fn kpas(&self, level: u8) -> &[KpaDefinition] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All activity codes of a level in catalog order.
    pub fn activity_codes(&self, level: u8) -> Vec<&str> {
        self.kpas(level)
            .iter()
            .flat_map(|kpa| kpa.activities.iter().map(String::as_str))
            .collect()
    }

    /// Number of activities expected for a level.
    pub fn expected_count(&self, level: u8) -> usize {
        self.kpas(level).iter().map(|kpa| kpa.activities.len()).sum()
    }

    pub fn total_activities(&self) -> usize {
        self.levels
            .values()
            .flatten()
            .map(|kpa| kpa.activities.len())
            .sum()
    }

    /// Area name for a KPA code: the catalog's own name when it has one,
    /// otherwise the default table.
    pub fn area_name(&self, kpa: &str) -> String {
        self.levels
            .values()
            .flatten()
            .find(|def| def.code == kpa)
            .and_then(|def| def.area.clone())
            .unwrap_or_else(|| default_area_name(kpa).to_string())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Candidate paths in precedence order: the configured path first (when
/// given), then [`DEFAULT_CATALOG_PATHS`].
pub fn candidate_paths(configured: Option<&Path>) -> Vec<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(DEFAULT_CATALOG_PATHS.iter().map(PathBuf::from))
        .collect()
}

/// KPA code of an activity: its first two dot-separated segments.
///
/// Returns `None` when the code has fewer than two non-empty segments.
pub fn kpa_code(activity_code: &str) -> Option<&str> {
    let mut parts = activity_code.splitn(3, '.');
    let level = parts.next()?;
    let kpa = parts.next()?;
    if level.is_empty() || kpa.is_empty() {
        return None;
    }
    Some(&activity_code[..level.len() + 1 + kpa.len()])
}

/// Default area name for a KPA code such as `"3.4"`.
pub fn default_area_name(kpa: &str) -> &'static str {
    let Some((level, index)) = kpa.split_once('.') else {
        return UNKNOWN_AREA;
    };
    let (Ok(level), Ok(index)) = (level.parse::<u8>(), index.parse::<usize>()) else {
        return UNKNOWN_AREA;
    };
    if !(2..=5).contains(&level) || index == 0 {
        return UNKNOWN_AREA;
    }
    DEFAULT_AREA_NAMES
        .get(index - 1)
        .copied()
        .unwrap_or(UNKNOWN_AREA)
}
