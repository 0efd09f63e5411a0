//! Operator-written directives embedded in review comments.
//!
//! Recognized forms (case-insensitive): `hands on: 80%`, `indicador 40%`,
//! `potencial: alto|medio|bajo|NN`, `retención: alto|medio|bajo`, `score: 45%`,
//! `admin: NN`, `ops|operaciones: NN`, `biz|growth|cultura: NN`.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::models::evaluation::RetentionRisk;
use crate::models::review::ReviewComment;

/// Structured override of automatic scores. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentDirective {
    pub score_promedio: Option<u32>,
    pub score_admin: Option<u32>,
    pub score_ops: Option<u32>,
    pub score_biz: Option<u32>,
    pub hands_on_index: Option<u32>,
    pub potential_score: Option<u32>,
    pub retention_risk: Option<RetentionRisk>,
}

impl AdjustmentDirective {
    pub fn is_empty(&self) -> bool {
        *self == AdjustmentDirective::default()
    }

    /// Field-by-field merge where values set in `other` win.
    pub fn overlay(&mut self, other: &AdjustmentDirective) {
        fn take<T: Copy>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.score_promedio, other.score_promedio);
        take(&mut self.score_admin, other.score_admin);
        take(&mut self.score_ops, other.score_ops);
        take(&mut self.score_biz, other.score_biz);
        take(&mut self.hands_on_index, other.hands_on_index);
        take(&mut self.potential_score, other.potential_score);
        take(&mut self.retention_risk, other.retention_risk);
    }

    /// Sub-score override for a category key, if that key has a directive slot.
    pub fn category_score(&self, category_key: &str) -> Option<u32> {
        match category_key {
            "admin" => self.score_admin,
            "ops" => self.score_ops,
            "biz" => self.score_biz,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    HandsOn,
    Potential,
    Retention,
    Score,
    Admin,
    Ops,
    Biz,
}

/// Alternatives for one target are tried in order; the first that matches is used.
const PATTERNS: [(Target, &[&str]); 7] = [
    (
        Target::HandsOn,
        &[r"hands?[-\s]?on[:\s]*(?:a\s+)?(\d+)%?", r"indicador\s+(?:a\s+)?(\d+)%?"],
    ),
    (Target::Potential, &[r"potencial[:\s]+(alto|medio|bajo|\d+)%?"]),
    (Target::Retention, &[r"(?:riesgo\s+)?retenci[oó]n[:\s]+(alto|medio|bajo)"]),
    (Target::Score, &[r"score[:\s]+(\d+)%?"]),
    (Target::Admin, &[r"admin[:\s]+(\d+)%?"]),
    (Target::Ops, &[r"(?:ops|operaciones)[:\s]+(\d+)%?"]),
    (Target::Biz, &[r"(?:biz|growth|cultura)[:\s]+(\d+)%?"]),
];

type CompiledPatterns = Vec<(Target, Vec<Regex>)>;

fn compiled() -> &'static CompiledPatterns {
    static COMPILED: OnceLock<CompiledPatterns> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(target, sources)| {
                let regexes = sources
                    .iter()
                    .filter_map(|source| match Regex::new(source) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            error!("Invalid directive pattern {}: {}", source, e);
                            None
                        }
                    })
                    .collect();
                (*target, regexes)
            })
            .collect()
    })
}

fn percentage(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|v| *v <= 100)
}

fn potential_value(raw: &str) -> Option<u32> {
    match raw {
        "alto" => Some(85),
        "medio" => Some(55),
        "bajo" => Some(25),
        other => percentage(other),
    }
}

impl Target {
    /// Writes `raw` into the directive. Unparseable or out-of-range values are skipped.
    fn apply(self, raw: &str, directive: &mut AdjustmentDirective) -> bool {
        let slot = match self {
            Target::Retention => {
                return match RetentionRisk::parse_label(raw) {
                    Some(risk) => {
                        directive.retention_risk = Some(risk);
                        true
                    }
                    None => false,
                };
            }
            Target::Potential => {
                return match potential_value(raw) {
                    Some(v) => {
                        directive.potential_score = Some(v);
                        true
                    }
                    None => false,
                };
            }
            Target::HandsOn => &mut directive.hands_on_index,
            Target::Score => &mut directive.score_promedio,
            Target::Admin => &mut directive.score_admin,
            Target::Ops => &mut directive.score_ops,
            Target::Biz => &mut directive.score_biz,
        };
        match percentage(raw) {
            Some(v) => {
                *slot = Some(v);
                true
            }
            None => false,
        }
    }
}

/// Parses directives in a single comment text.
pub fn parse_directive_text(text: &str) -> AdjustmentDirective {
    let lower = text.to_lowercase();
    let mut directive = AdjustmentDirective::default();

    for (target, regexes) in compiled() {
        let captured = regexes
            .iter()
            .find_map(|re| re.captures(&lower))
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()));

        if let Some(raw) = captured {
            if target.apply(&raw, &mut directive) {
                debug!("Manual directive {:?} = {}", target, raw);
            } else {
                debug!("Skipping unparseable directive {:?} = {}", target, raw);
            }
        }
    }
    directive
}

/// Scans every comment in order. A later comment overwrites earlier values
/// for the same field.
pub fn parse_manual_directives(comments: &[ReviewComment]) -> AdjustmentDirective {
    comments
        .iter()
        .fold(AdjustmentDirective::default(), |mut merged, comment| {
            merged.overlay(&parse_directive_text(&comment.text));
            merged
        })
}
