// Prompts for the interview-feedback adjustment advisor.
// Reviewers write in Spanish, so the instructions and labels stay in Spanish.

/// System prompt: role plus the JSON-only contract.
pub const ADVISOR_SYSTEM: &str = "Eres un analista de selección que traduce notas de \
    entrevista en ajustes numéricos de evaluación. Responde únicamente con un objeto JSON \
    válido, sin texto adicional ni bloques de código.";

/// User prompt template. `{feedback}` is replaced with the rendered comments.
pub const ADVISOR_PROMPT_TEMPLATE: &str = r#"Analiza los siguientes comentarios de entrevista de un candidato y extrae ajustes de evaluación.

COMENTARIOS DE EVALUADORES:
---
{feedback}
---

REGLAS DE AJUSTE:
- Comentarios MUY NEGATIVOS ("no match cultural", "descartar", "no funciona", "mala actitud") -> score 30-50
- Comentarios NEGATIVOS ("brechas", "falta experiencia", "sin ownership") -> score 50-65
- Comentarios MIXTOS (positivos y negativos) -> score 60-75
- Comentarios POSITIVOS -> mantener 80 o más
- Si mencionan "perfil ejecutor" o "sin ownership" -> hands_on_index bajo (30-50)
- Si mencionan "brecha para rol Senior" -> potential_score bajo (30-50)
- Si mencionan "riesgo de que se vaya" o "no match cultural" -> retention_risk "Alto"
- Si el evaluador quiere descartar al candidato, score_promedio debe ser 40 o menos.

Responde con este JSON:
{
    "score_promedio": número 0-100 o null,
    "hands_on_index": número 0-100 o null,
    "potential_score": número 0-100 o null,
    "retention_risk": "Alto" | "Medio" | "Bajo" | null,
    "reasoning": "explicación breve de los ajustes"
}"#;

pub fn build_advisor_prompt(feedback: &str) -> String {
    ADVISOR_PROMPT_TEMPLATE.replace("{feedback}", feedback)
}
