// Task instructions for each structured-output call.
// The shared JSON-only system prompt lives in llm_client/prompts.rs.

pub const JOB_DESCRIPTION_TASK: &str = "\
    Extract the details of the job posting below: the company, job title, team, \
    a short summary, the salary, the duties and the qualifications.";

pub const JOB_SKILLS_TASK: &str = "\
    List the skills the job posting below asks for, split into technical skills \
    (languages, technologies, tools) and non-technical soft skills.";

pub const RESUME_SKILLS_TASK: &str = "\
    List the skills shown in the resume below, split into technical skills \
    and non-technical soft skills. Each skill is its own list item.";

pub const RESUME_FORMAT_TASK: &str = "\
    Reorganise the resume below into its standard sections. Keep the \
    candidate's own facts; do not add employers, dates or degrees.";

pub const RESUME_IMPROVEMENTS_TASK: &str = "\
    Review the resume below and suggest concrete improvements. When a job \
    posting is given as additional context, focus on closing gaps against it.";

/// Heads the document text in every analysis prompt.
pub const DOCUMENT_HEADER: &str = "DOCUMENT:";

/// Heads caller-supplied context, which follows the document.
pub const CONTEXT_HEADER: &str = "ADDITIONAL CONTEXT:";
