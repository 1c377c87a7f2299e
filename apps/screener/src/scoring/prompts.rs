// Evaluation prompt templates.

pub const EVALUATION_SYSTEM: &str = "\
You are an expert technical recruiter. \
You evaluate candidates against a job description using their resume and GitHub activity. \
You MUST respond with valid JSON only, with no markdown fences, no explanations.";

/// Replace `{job_description}`, `{resume_json}` and `{github_json}` before sending.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this candidate for the role below and return a score with a structured explanation.

JOB DESCRIPTION:
---
{job_description}
---

RESUME (parsed):
---
{resume_json}
---

GITHUB PROFILE (parsed; null when no profile was found, {"error": ...} when it could not be fetched).
Pay close attention to each project's readme_text and recent_commits:
---
{github_json}
---

Return a JSON object with this EXACT schema:
{
  "score": 8,
  "explanation": {
    "strengths": ["Strong Python skills as demonstrated in project X"],
    "weaknesses": ["No production experience with PostgreSQL replication"]
  }
}

RULES:
1. score is an integer from 1 to 10 for the candidate's fit for the role.
2. Each strength cites a specific example (project name, skill, repository, language, stars).
3. Each weakness names a gap relative to the job description.
4. If no GitHub data is available, say so in weaknesses.
5. Return ONLY the JSON object, with no code fences."#;
