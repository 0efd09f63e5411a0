use crate::rubric::QuestionRule;

/// Evaluates a category's rule table in order. Categories without rules get no questions.
pub fn generate_questions(
    rules: &[QuestionRule],
    found: &[String],
    missing: &[String],
    action_verb_count: u32,
) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| match rule {
            QuestionRule::MissingKeyword { keyword, question } => {
                let keyword = keyword.to_lowercase();
                let present = found.iter().any(|f| f.to_lowercase() == keyword);
                (!present).then(|| question.clone())
            }
            QuestionRule::MissingSummary { limit } => {
                if missing.is_empty() || *limit == 0 {
                    return None;
                }
                let top: Vec<&str> = missing.iter().take(*limit).map(String::as_str).collect();
                Some(format!("Faltan conceptos clave: {}. Profundizar.", top.join(", ")))
            }
            QuestionRule::LowExecution {
                threshold,
                question,
            } => (action_verb_count < *threshold).then(|| question.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_keyword_rule_fires_only_when_absent() {
        let rules = vec![QuestionRule::MissingKeyword {
            keyword: "tesorería".to_string(),
            question: "¿Tesorería?".to_string(),
        }];
        let asked = generate_questions(&rules, &[], &strings(&["tesorería"]), 0);
        assert_eq!(asked, vec!["¿Tesorería?"]);

        let skipped = generate_questions(&rules, &strings(&["tesorería"]), &[], 0);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_missing_summary_lists_top_missing() {
        let rules = vec![QuestionRule::MissingSummary { limit: 2 }];
        let asked = generate_questions(&rules, &[], &strings(&["excel", "balance", "gastos"]), 0);
        assert_eq!(asked, vec!["Faltan conceptos clave: excel, balance. Profundizar."]);
    }

    #[test]
    fn test_missing_summary_silent_when_nothing_missing() {
        let rules = vec![QuestionRule::MissingSummary { limit: 2 }];
        assert!(generate_questions(&rules, &strings(&["excel"]), &[], 0).is_empty());
    }

    #[test]
    fn test_low_execution_threshold() {
        let rules = vec![QuestionRule::LowExecution {
            threshold: 2,
            question: "¿Proyectos?".to_string(),
        }];
        assert_eq!(generate_questions(&rules, &[], &[], 1).len(), 1);
        assert!(generate_questions(&rules, &[], &[], 2).is_empty());
    }

    #[test]
    fn test_no_rules_no_questions() {
        assert!(generate_questions(&[], &[], &strings(&["x"]), 0).is_empty());
    }
}
