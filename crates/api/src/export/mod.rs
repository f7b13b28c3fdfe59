//! Report exporters.
//!
//! Reports are first flattened into an [`ExportDocument`] (a title plus
//! tabular sections), then handed to a [`ReportRenderer`] that produces
//! the file bytes. Renderers are pure sinks and never touch the database.

pub mod csv;
pub mod pdf;
pub mod xlsx;

use chrono::{DateTime, Utc};
use prisma_core::error::CoreError;
use prisma_core::report::KpaDetail;

use crate::engine::report::{AdminReport, IndividualReport};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Pdf, Self::Xlsx, Self::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Parse a `formato` value. Matching is case-insensitive.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lowered)
            .ok_or_else(|| CoreError::Validation(format!("Formato não suportado: {s}")))
    }

    pub fn renderer(&self) -> Box<dyn ReportRenderer + Send + Sync> {
        match self {
            Self::Pdf => Box::new(pdf::PdfRenderer),
            Self::Xlsx => Box::new(xlsx::XlsxRenderer),
            Self::Csv => Box::new(csv::CsvRenderer),
        }
    }
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// Plain-text rendering used by the text-based formats.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u8> for Cell {
    fn from(n: u8) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Section {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    /// Free lines printed under the title (organization, generation date).
    pub preamble: Vec<String>,
    pub sections: Vec<Section>,
}

/// A sink turning an [`ExportDocument`] into file bytes.
pub trait ReportRenderer {
    fn content_type(&self) -> &'static str;
    fn extension(&self) -> &'static str;
    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError>;
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

/// `{prefix}_{YYYYmmdd_HHMMSS}.{extension}`.
pub fn export_filename(prefix: &str, generated_at: DateTime<Utc>, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", generated_at.format("%Y%m%d_%H%M%S"))
}

pub fn individual_document(
    report: &IndividualReport,
    generated_at: DateTime<Utc>,
) -> ExportDocument {
    let classification = &report.classification;

    let mut summary = Section::new("Classificação de Maturidade", &["Campo", "Valor"]);
    summary.row(vec!["Nível".into(), classification.level.into()]);
    summary.row(vec!["Status".into(), classification.status.label().into()]);
    summary.row(vec!["Descrição".into(), classification.description.clone().into()]);
    summary.row(vec![
        "Data de certificação".into(),
        classification
            .certified_at
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string())
            .into(),
    ]);
    summary.row(vec!["Selo".into(), report.seal.color_name.into()]);

    let mut kpas = Section::new(
        "Maturidade por KPA",
        &[
            "KPA",
            "Área",
            "Total",
            "Instituídas",
            "Institucionalizadas",
            "% Instituídas",
            "% Institucionalizadas",
        ],
    );
    for k in &report.kpa_maturity {
        kpas.row(vec![
            k.kpa_code.clone().into(),
            k.area.clone().into(),
            k.total.into(),
            k.instituted.into(),
            k.institutionalized.into(),
            k.instituted_pct.into(),
            k.institutionalized_pct.into(),
        ]);
    }

    let mut evolution = Section::new(
        "Evolução Temporal",
        &[
            "Nível",
            "Avaliação",
            "Data",
            "Total",
            "Instituídas",
            "Institucionalizadas",
            "Maturidade (%)",
        ],
    );
    for p in &report.evolution {
        evolution.row(vec![
            p.level.into(),
            p.title.clone().into(),
            format_date(&p.assessed_at).into(),
            p.total.into(),
            p.instituted.into(),
            p.institutionalized.into(),
            p.overall_pct.into(),
        ]);
    }

    let mut details = Section::new(
        "Detalhamento por KPA",
        &["Nível", "KPA", "Área", "Avaliação", "Situação", "Detalhe"],
    );
    for d in &report.kpa_details {
        match d {
            KpaDetail::Finalized(f) => details.row(vec![
                f.level.into(),
                f.kpa_code.clone().into(),
                f.area.clone().into(),
                f.title.clone().into(),
                f.status.label().into(),
                format!("{}/{} institucionalizadas", f.institutionalized, f.total).into(),
            ]),
            KpaDetail::InProgress(p) => details.row(vec![
                p.level.into(),
                p.kpa_code.clone().into(),
                p.area.clone().into(),
                p.title.clone().into(),
                p.status.into(),
                format!("{}% preenchido", p.fill_pct).into(),
            ]),
        }
    }

    let mut recommendations =
        Section::new("Recomendações", &["Prioridade", "Título", "Descrição"]);
    for r in &report.recommendations {
        recommendations.row(vec![
            r.priority.label().into(),
            r.title.clone().into(),
            r.description.clone().into(),
        ]);
    }

    let mut assessments =
        Section::new("Avaliações", &["ID", "Título", "Nível", "Status", "Data"]);
    for a in &report.assessments {
        assessments.row(vec![
            a.id.into(),
            a.title.clone().into(),
            a.target_level.into(),
            a.status.clone().into(),
            format_date(&a.created_at).into(),
        ]);
    }

    ExportDocument {
        title: "Relatório Individual de Maturidade em Gestão de Riscos".to_string(),
        preamble: vec![
            format!(
                "Órgão: {} ({})",
                report.organization.name, report.organization.abbreviation
            ),
            format!("Gerado em: {}", generated_at.format("%d/%m/%Y %H:%M:%S")),
        ],
        sections: vec![summary, kpas, evolution, details, recommendations, assessments],
    }
}

pub fn admin_document(report: &AdminReport, generated_at: DateTime<Utc>) -> ExportDocument {
    let general = &report.general;
    let detailed = &report.detailed;

    let mut stats = Section::new("Estatísticas Gerais", &["Indicador", "Valor"]);
    stats.row(vec!["Total de avaliações".into(), general.total_assessments.into()]);
    stats.row(vec!["Avaliações finalizadas".into(), general.finalized_assessments.into()]);
    stats.row(vec![
        "Órgãos participantes".into(),
        general.participating_organizations.into(),
    ]);
    stats.row(vec!["Média de maturidade (%)".into(), general.mean_maturity.into()]);
    stats.row(vec!["Total de órgãos".into(), detailed.total_organizations.into()]);
    stats.row(vec![
        "Órgãos certificados".into(),
        detailed.certified_organizations.into(),
    ]);

    let mut ranking = Section::new(
        "Ranking de Maturidade",
        &[
            "Posição",
            "Órgão",
            "Sigla",
            "Nível",
            "Maturidade (%)",
            "Certificação",
            "Total Avaliações",
            "Finalizadas",
            "Em Andamento",
            "Última Avaliação",
        ],
    );
    for (position, entry) in report.ranking.iter().enumerate() {
        ranking.row(vec![
            (position + 1).into(),
            entry.name.clone().into(),
            entry.abbreviation.clone().into(),
            entry.level.into(),
            entry.maturity_mean.into(),
            entry.certification_status.label().into(),
            entry.total_assessments.into(),
            entry.finalized_assessments.into(),
            entry.in_progress_assessments.into(),
            entry.last_assessment.clone().unwrap_or_else(|| "-".to_string()).into(),
        ]);
    }

    let mut by_level = Section::new("Órgãos por Nível", &["Nível", "Órgãos"]);
    for (level, count) in &detailed.organizations_by_level {
        by_level.row(vec![(*level).into(), (*count).into()]);
    }

    ExportDocument {
        title: "Relatório Consolidado de Maturidade - CGE/MT".to_string(),
        preamble: vec![format!(
            "Gerado em: {}",
            generated_at.format("%d/%m/%Y %H:%M:%S")
        )],
        sections: vec![stats, ranking, by_level],
    }
}
