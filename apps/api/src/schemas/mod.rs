#![allow(dead_code)]

//! Structured-output contracts for resume and job-posting analysis.
//!
//! Each record type carries a static field table (`Schema::FIELDS`) that drives
//! the format instructions sent to the model and the coercion of its reply.
//! Nullability is declared per field; nullable fields are `Option<String>`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub mod coercion;
pub mod format;

pub use coercion::{coerce, Coercion};
pub use format::format_instructions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    Required,
    /// The model may answer null when the document does not state the value.
    Nullable,
}

/// One declared field: JSON key, kind, guidance for the model, nullability.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub nullability: Nullability,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            nullability: Nullability::Required,
        }
    }

    const fn nullable(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            description,
            nullability: Nullability::Nullable,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullability == Nullability::Nullable
    }
}

/// A record type the model is asked to populate.
pub trait Schema: Serialize + DeserializeOwned + Send + 'static {
    const TITLE: &'static str;
    /// Record-level guidance; empty when the record has none.
    const DESCRIPTION: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn field_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.name).collect()
    }
}

/// Description of a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub company: String,
    pub job_title: String,
    pub team: Option<String>,
    pub job_summary: String,
    pub salary: Option<String>,
    pub duties: Vec<String>,
    pub qualifications: Vec<String>,
}

impl Schema for JobDescription {
    const TITLE: &'static str = "Job_Description";
    const DESCRIPTION: &'static str = "Description of a job posting";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "company",
            FieldKind::Text,
            "Name of the company that has the job opening",
        ),
        FieldSpec::required("job_title", FieldKind::Text, "Job title"),
        FieldSpec::nullable(
            "team",
            "Name of the team within the company. Team name should be null if it's not known.",
        ),
        FieldSpec::required(
            "job_summary",
            FieldKind::Text,
            "Brief summary of the job, not exceeding 100 words",
        ),
        FieldSpec::nullable(
            "salary",
            "Salary amount or range. Salary should be null if it's not known.",
        ),
        FieldSpec::required(
            "duties",
            FieldKind::TextList,
            "The role, responsibilities and duties of the job as an itemized list, not exceeding 500 words",
        ),
        FieldSpec::required(
            "qualifications",
            FieldKind::TextList,
            "The qualifications, skills, and experience required for the job as an itemized list, not exceeding 500 words",
        ),
    ];
}

/// Skills requested by a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSkills {
    pub technical_skills: Vec<String>,
    pub non_technical_skills: Vec<String>,
}

impl Schema for JobSkills {
    const TITLE: &'static str = "Job_Skills";
    const DESCRIPTION: &'static str = "Skills from a job posting";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "technical_skills",
            FieldKind::TextList,
            "An itemized list of technical skills, including programming languages, technologies, and tools.",
        ),
        FieldSpec::required(
            "non_technical_skills",
            FieldKind::TextList,
            "An itemized list of non-technical Soft skills.",
        ),
    ];
}

/// Skills listed on a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkills {
    pub technical_skills: Vec<String>,
    pub non_technical_skills: Vec<String>,
}

impl Schema for ResumeSkills {
    const TITLE: &'static str = "Resume_Skills";
    const DESCRIPTION: &'static str = "";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "technical_skills",
            FieldKind::TextList,
            "An individual itemized list of technical skills. Examples: Python, MS Office etc",
        ),
        FieldSpec::required(
            "non_technical_skills",
            FieldKind::TextList,
            "An individual itemized list of non-technical skills like soft skills",
        ),
    ];
}

/// Sectioned layout of a resume. Keys keep their capitalised wire names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFormat {
    #[serde(rename = "Basics")]
    pub basics: String,
    #[serde(rename = "Introduction")]
    pub introduction: String,
    #[serde(rename = "Work_Experiences")]
    pub work_experiences: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Awards")]
    pub awards: Option<String>,
    #[serde(rename = "Projects")]
    pub projects: String,
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
}

impl Schema for ResumeFormat {
    const TITLE: &'static str = "Resume_Format";
    const DESCRIPTION: &'static str = "Format of resume";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "Basics",
            FieldKind::Text,
            "The basics of the given user resume input.",
        ),
        FieldSpec::required(
            "Introduction",
            FieldKind::Text,
            "Write only 1 line introduction for the introduction section for given user resume input.",
        ),
        FieldSpec::required(
            "Work_Experiences",
            FieldKind::Text,
            "The experience of the candidates with job, duration and description of work done like xyz company from 09-2022 to 08-2023 performed work on spark and databases",
        ),
        FieldSpec::required(
            "Education",
            FieldKind::Text,
            "The education of the candidates with university, duration and description of work done like xyz university from 08-2013 to 07-2018 studied these courses",
        ),
        FieldSpec::nullable(
            "Awards",
            "The awards are the achievements and honours of the candidates. If the resume doesn't have the award no need to add this to resume",
        ),
        FieldSpec::required(
            "Projects",
            FieldKind::Text,
            "The projects section contains the project, duration and roles and responsibilities of the candidate like xyz project from 05-2019 to 04-2020 worked on backend etc",
        ),
        FieldSpec::required(
            "Skills",
            FieldKind::TextList,
            "An itemized list of technical skills and non-technical Soft skills of the user",
        ),
    ];
}

/// Suggestions for improving a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeImprovements {
    pub improvements: Vec<String>,
}

impl Schema for ResumeImprovements {
    const TITLE: &'static str = "Resume_Improvements";
    const DESCRIPTION: &'static str = "";
    const FIELDS: &'static [FieldSpec] = &[FieldSpec::required(
        "improvements",
        FieldKind::TextList,
        "List of suggestions for improvement",
    )];
}
