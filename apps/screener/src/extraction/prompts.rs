// Extraction prompt templates.
// All prompts for the extraction module are defined here.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are an expert resume parser. \
Extract structured candidate information from raw resume text. \
You MUST respond with valid JSON only, with no markdown fences, no explanations.";

/// Replace `{resume_text}` and `{no_invention}` before sending.
pub const RESUME_PARSE_PROMPT: &str = r#"Extract the following information from the raw text of a resume.

RESUME TEXT:
---
{resume_text}
---

OUTPUT SCHEMA (return exactly this structure, use null for anything missing):
{
  "name": "Full Name",
  "email": "email@example.com",
  "phone": "123-456-7890",
  "github_url": "https://github.com/username",
  "linkedin_url": "https://www.linkedin.com/in/username",
  "skills": ["Skill1", "Skill2"],
  "experience": [
    {"company": "Company A", "title": "Job Title", "duration": "Start Date - End Date"}
  ],
  "projects": [
    {"name": "Project Name", "description": "Project Description"}
  ],
  "education": [
    {"degree": "Degree Name", "institution": "University Name", "year": "Graduation Year"}
  ]
}

RULES:
1. Extract the candidate's full name exactly as written.
2. List every skill once.
3. Keep experience, projects and education in the order they appear.
4. {no_invention}
5. Return ONLY the JSON object, with no code fences."#;

pub const GITHUB_IDENTIFIER_SYSTEM: &str = "\
You locate a candidate's GitHub profile in resume text. \
Respond with a single line and nothing else.";

/// Replace `{resume_text}` before sending.
pub const GITHUB_IDENTIFIER_PROMPT: &str = r#"From the following text, find the candidate's GitHub profile.
It may be written as a full link (e.g. https://github.com/username), a shortened link, or just a username.

RULES:
- Only report a username if it is clearly associated with the word "GitHub" or a github.com link.
- If you find a full URL, return it exactly as written.
- If you find only a username, return the username exactly as written.
- Do not correct, reconstruct or guess a username.
- If there is no GitHub profile, return null.

RESUME TEXT:
---
{resume_text}
---

Your response:"#;
