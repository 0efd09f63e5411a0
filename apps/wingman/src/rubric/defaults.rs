//! Built-in Senior Finance rubric and the default lookup tables.

use std::collections::BTreeMap;

use super::{CategoryConfig, EvaluationConfig, InferenceConfig, QuestionRule, TitleRank};

pub const DEFAULT_VERSION: &str = "1.0";

pub(crate) fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn title_ranks() -> Vec<TitleRank> {
    [
        ("jefe", 3),
        ("gerente", 4),
        ("subgerente", 3),
        ("director", 4),
        ("analista senior", 2),
        ("controller", 3),
        ("contador auditor", 2),
        ("encargado", 2),
        ("lider", 2),
        ("head", 4),
        ("lead", 3),
    ]
    .into_iter()
    .map(|(title, rank)| TitleRank::new(title, rank))
    .collect()
}

pub fn adaptability_keywords() -> Vec<String> {
    strings(&[
        "aprendizaje",
        "autodidacta",
        "adaptación",
        "flexible",
        "polifuncional",
        "innovación",
        "tecnología",
        "growth",
    ])
}

/// First-person achievement verbs.
pub fn action_verbs() -> Vec<String> {
    strings(&[
        "lideré",
        "implementé",
        "gestioné",
        "creé",
        "desarrollé",
        "administré",
        "diseñé",
        "logré",
        "aumenté",
        "reduje",
    ])
}

pub fn question_rules() -> BTreeMap<String, Vec<QuestionRule>> {
    BTreeMap::from([
        (
            "admin".to_string(),
            vec![
                QuestionRule::MissingKeyword {
                    keyword: "cierre contable".to_string(),
                    question: "No veo 'Cierre Contable' explícito. ¿Cuál es tu nivel de autonomía cerrando el mes?".to_string(),
                },
                QuestionRule::MissingKeyword {
                    keyword: "imputación".to_string(),
                    question: "¿Cómo garantizas la integridad de la imputación de gastos?".to_string(),
                },
                QuestionRule::MissingSummary { limit: 2 },
            ],
        ),
        (
            "ops".to_string(),
            vec![
                QuestionRule::MissingKeyword {
                    keyword: "flujo de caja".to_string(),
                    question: "El Cash Flow es crítico. ¿Has construido flujos de caja desde cero?".to_string(),
                },
                QuestionRule::MissingKeyword {
                    keyword: "tesorería".to_string(),
                    question: "¿Qué volumen de tesorería/pagos has gestionado simultáneamente?".to_string(),
                },
            ],
        ),
        (
            "biz".to_string(),
            vec![QuestionRule::LowExecution {
                threshold: 2,
                question: "Tu perfil parece más de análisis. ¿Qué tres proyectos concretos LIDERASTE e implementaste?".to_string(),
            }],
        ),
    ])
}

fn finance_categories() -> BTreeMap<String, CategoryConfig> {
    let admin = CategoryConfig {
        name: "Admin & Finanzas".to_string(),
        keywords: strings(&[
            "cierre contable",
            "mensual",
            "imputación",
            "gastos",
            "ingresos",
            "reportes financieros",
            "análisis de cuentas",
            "excel",
            "trazabilidad",
            "contratos",
            "auditoría",
            "estados financieros",
            "contabilidad",
            "balance",
            "control administrativo",
            "procedimientos",
            "normativa",
        ]),
        max_expected: 6,
        culture_booster_keywords: Vec::new(),
    };

    let ops = CategoryConfig {
        name: "Operaciones y Tesorería".to_string(),
        keywords: strings(&[
            "flujo de caja",
            "cash flow",
            "semanal",
            "proyección",
            "liquidez",
            "priorizar pagos",
            "tesorería",
            "banco",
            "transferencias",
            "conciliación bancaria",
            "contingencias",
            "pagos",
            "operaciones financieras",
            "clearing",
            "recaudación",
        ]),
        max_expected: 5,
        culture_booster_keywords: strings(&[
            "fintech",
            "startup",
            "emprendimiento",
            "rápido crecimiento",
            "scaleup",
        ]),
    };

    let biz = CategoryConfig {
        name: "Growth & Cultura".to_string(),
        keywords: strings(&[
            "procesos",
            "implementación",
            "mejora continua",
            "liderazgo",
            "equipo",
            "autonomía",
            "proactividad",
            "bi",
            "business intelligence",
            "automatización",
            "eficiencia",
            "escalable",
            "estrategia",
            "kpi",
            "growth",
            "ownership",
            "colaboración",
            "user-centric",
        ]),
        max_expected: 6,
        culture_booster_keywords: Vec::new(),
    };

    BTreeMap::from([
        ("admin".to_string(), admin),
        ("ops".to_string(), ops),
        ("biz".to_string(), biz),
    ])
}

fn finance_inference() -> InferenceConfig {
    InferenceConfig {
        technical_keywords: strings(&[
            "imputación",
            "asiento",
            "conciliación",
            "tabla dinámica",
            "macros",
            "sql",
            "erp",
            "sap",
            "manager",
            "digitación",
            "facturación",
            "rendición",
            "análisis de cuentas",
            "balance",
            "declaración",
        ]),
        strategic_keywords: strings(&[
            "dirección",
            "supervisión",
            "reporta al directorio",
            "estrategia",
            "negociación",
            "fusión",
            "adquisición",
            "board",
            "comité",
        ]),
        corporate_scope_keywords: strings(&[
            "regional",
            "latam",
            "global",
            "multinacional",
            "holding",
            "filiales",
            "m&a",
            "ipo",
            "apertura en bolsa",
            "billones",
            "mmus$",
            "corporate",
            "directorio",
            "gobernanza",
        ]),
    }
}

/// The Senior Finance rubric. Built field by field from literals that satisfy
/// every validation rule, so no fallible constructor is involved.
pub(crate) fn finance_rubric() -> EvaluationConfig {
    EvaluationConfig {
        version: DEFAULT_VERSION.to_string(),
        categories: finance_categories(),
        inference: finance_inference(),
        industry_multipliers: Default::default(),
        title_ranks: title_ranks(),
        adaptability_keywords: adaptability_keywords(),
        action_verbs: action_verbs(),
        question_rules: question_rules(),
    }
}
