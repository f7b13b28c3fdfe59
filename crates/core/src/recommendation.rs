//! Recommendation rules for the individual maturity report.
//!
//! Rules live in one ordered table. Each rule inspects a
//! [`RecommendationContext`] and yields zero or more messages at the
//! rule's priority. Output is sorted by priority and capped at
//! [`MAX_RECOMMENDATIONS`], with the continuous-monitoring entry always
//! kept as the last item.

use serde::Serialize;

use crate::maturity::{AssessmentEvidence, MaturityClassification, MAX_LEVEL};
use crate::report::{KpaMaturity, Trend, TrendDirection};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of recommendations returned, monitoring entry included.
pub const MAX_RECOMMENDATIONS: usize = 8;

/// Share of complete KPAs above which the "consolidate" rule fires.
pub const CONSOLIDATION_THRESHOLD: f64 = 0.7;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Alta,
    Media,
    Baixa,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Media => "Média",
            Self::Baixa => "Baixa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

/// Inputs the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationContext<'a> {
    pub kpas: &'a [KpaMaturity],
    pub in_progress: &'a [AssessmentEvidence],
    pub trend: Option<&'a Trend>,
    pub classification: &'a MaturityClassification,
}

/// `(title, description)` pairs produced by a rule.
type Messages = Vec<(String, String)>;

pub struct RecommendationRule {
    pub name: &'static str,
    pub priority: Priority,
    pub evaluate: fn(&RecommendationContext<'_>) -> Messages,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

pub const RULES: &[RecommendationRule] = &[
    RecommendationRule {
        name: "partial_kpa",
        priority: Priority::Alta,
        evaluate: partial_kpas,
    },
    RecommendationRule {
        name: "resume_in_progress",
        priority: Priority::Media,
        evaluate: resume_in_progress,
    },
    RecommendationRule {
        name: "declining_trend",
        priority: Priority::Alta,
        evaluate: declining_trend,
    },
    RecommendationRule {
        name: "next_level",
        priority: Priority::Baixa,
        evaluate: next_level,
    },
    RecommendationRule {
        name: "best_practices",
        priority: Priority::Baixa,
        evaluate: best_practices,
    },
];

/// Appended after the capped rule output.
pub const MONITORING_RULE: RecommendationRule = RecommendationRule {
    name: "continuous_monitoring",
    priority: Priority::Baixa,
    evaluate: continuous_monitoring,
};

fn partial_kpas(ctx: &RecommendationContext<'_>) -> Messages {
    ctx.kpas
        .iter()
        .filter(|k| k.institutionalized_pct > 0 && k.institutionalized_pct < 100)
        .map(|k| {
            let missing = k.total - k.institutionalized;
            (
                format!("Completar {} - {}", k.kpa_code, k.area),
                format!(
                    "Faltam {missing} de {} atividades para institucionalização completa. \
                     Priorize a implementação das atividades pendentes para alcançar 100% \
                     de maturidade nesta área.",
                    k.total
                ),
            )
        })
        .collect()
}

fn resume_in_progress(ctx: &RecommendationContext<'_>) -> Messages {
    ctx.in_progress
        .iter()
        .map(|a| {
            (
                format!("Retomar avaliação \"{}\"", a.title),
                format!(
                    "Avaliação do Nível {} está em andamento. Recomenda-se definir cronograma \
                     para conclusão e designar responsáveis para cada KPA pendente.",
                    a.level
                ),
            )
        })
        .collect()
}

fn declining_trend(ctx: &RecommendationContext<'_>) -> Messages {
    match ctx.trend {
        Some(t) if t.direction == TrendDirection::Decline => vec![(
            "Reverter tendência de declínio".to_string(),
            format!(
                "A maturidade apresentou declínio de {} pontos percentuais. Recomenda-se \
                 revisar os processos implementados e reforçar as práticas de gestão de riscos.",
                t.delta.unsigned_abs()
            ),
        )],
        _ => Vec::new(),
    }
}

fn next_level(ctx: &RecommendationContext<'_>) -> Messages {
    let current = ctx.classification.level;
    if !ctx.classification.is_certified() || current >= MAX_LEVEL {
        return Vec::new();
    }
    let next = current + 1;
    vec![(
        format!("Preparar para Nível {next}"),
        format!(
            "Com o Nível {current} certificado, considere iniciar a preparação para avaliação \
             do Nível {next}. Estude os requisitos e planeje a implementação das novas práticas."
        ),
    )]
}

fn best_practices(ctx: &RecommendationContext<'_>) -> Messages {
    let total = ctx.kpas.len();
    if total == 0 {
        return Vec::new();
    }
    let complete = ctx
        .kpas
        .iter()
        .filter(|k| k.institutionalized_pct == 100)
        .count();

    if complete == total {
        vec![(
            "Manter excelência operacional".to_string(),
            "Todos os KPAs avaliados estão com 100% de institucionalização. Mantenha as \
             práticas implementadas e considere auditorias periódicas para garantir a \
             continuidade."
                .to_string(),
        )]
    } else if complete as f64 > total as f64 * CONSOLIDATION_THRESHOLD {
        vec![(
            "Consolidar boas práticas".to_string(),
            format!(
                "Boa performance com {complete} de {total} KPAs completos. Documente as \
                 práticas bem-sucedidas e replique para as áreas pendentes."
            ),
        )]
    } else {
        Vec::new()
    }
}

fn continuous_monitoring(_: &RecommendationContext<'_>) -> Messages {
    vec![(
        "Monitoramento contínuo".to_string(),
        "Estabeleça rotina de monitoramento mensal do progresso das avaliações e revisão \
         trimestral da maturidade em gestão de riscos. Utilize este relatório como baseline \
         para acompanhamento."
            .to_string(),
    )]
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn apply(rule: &RecommendationRule, ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
    (rule.evaluate)(ctx)
        .into_iter()
        .map(|(title, description)| Recommendation {
            priority: rule.priority,
            title,
            description,
        })
        .collect()
}

/// Evaluate [`RULES`] once, sort by priority (stable), cap, then append
/// the monitoring entry.
pub fn generate(ctx: &RecommendationContext<'_>) -> Vec<Recommendation> {
    generate_with_limit(ctx, MAX_RECOMMENDATIONS)
}

pub fn generate_with_limit(ctx: &RecommendationContext<'_>, limit: usize) -> Vec<Recommendation> {
    if limit == 0 {
        return Vec::new();
    }

    let mut items: Vec<Recommendation> = RULES.iter().flat_map(|rule| apply(rule, ctx)).collect();
    items.sort_by_key(|r| r.priority);
    items.truncate(limit - 1);
    items.extend(apply(&MONITORING_RULE, ctx));
    items
}
