use std::{collections::HashMap, fs};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::SurveyDefinition;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub survey_path: String,
    pub restrict_to_choices: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            survey_path: "survey.toml".into(),
            restrict_to_choices: false,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("survey_path") {
                settings.survey_path = v.clone();
            }
            if let Some(v) = file_cfg.get("restrict_to_choices") {
                if let Ok(parsed) = v.parse::<bool>() {
                    settings.restrict_to_choices = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("SURVEY_PATH") {
        settings.survey_path = v;
    }
    if let Ok(v) = std::env::var("APP__SURVEY_PATH") {
        settings.survey_path = v;
    }

    if let Ok(v) = std::env::var("APP__RESTRICT_TO_CHOICES") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.restrict_to_choices = parsed;
        }
    }

    settings
}

/// Load and validate the survey definition. The definition is read once at
/// startup and never mutated afterwards.
pub fn load_survey(path: &str) -> anyhow::Result<SurveyDefinition> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read survey definition '{path}'"))?;
    let survey: SurveyDefinition = toml::from_str(&raw)
        .with_context(|| format!("failed to parse survey definition '{path}'"))?;
    validate_survey(&survey)?;
    Ok(survey)
}

fn validate_survey(survey: &SurveyDefinition) -> anyhow::Result<()> {
    if survey.questions.is_empty() {
        anyhow::bail!("survey definition has no questions");
    }
    for (index, question) in survey.questions.iter().enumerate() {
        if question.prompt.trim().is_empty() {
            anyhow::bail!("question {index} has an empty prompt");
        }
        if question.choices.is_empty() {
            anyhow::bail!("question {index} offers no choices");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    const SAMPLE: &str = r#"
title = "Customer Satisfaction Survey"
instructions = "Please fill out a survey about your experience here."

[[questions]]
prompt = "Have you shopped here before?"
choices = ["Yes", "No"]

[[questions]]
prompt = "Are you likely to shop here again?"
choices = ["Yes", "No"]
"#;

    #[test]
    fn parses_and_validates_sample_definition() {
        let survey: SurveyDefinition = toml::from_str(SAMPLE).expect("parse");
        validate_survey(&survey).expect("valid");
        assert_eq!(survey.question_count(), 2);
        assert_eq!(survey.questions[0].choices, vec!["Yes", "No"]);
    }

    #[test]
    fn rejects_definition_without_questions() {
        let survey: SurveyDefinition = toml::from_str(
            r#"
title = "Empty"
instructions = "Nothing to answer."
questions = []
"#,
        )
        .expect("parse");
        assert!(validate_survey(&survey).is_err());
    }

    #[test]
    fn rejects_question_without_choices() {
        let survey: SurveyDefinition = toml::from_str(
            r#"
title = "Broken"
instructions = "One question, no choices."

[[questions]]
prompt = "Pick one?"
choices = []
"#,
        )
        .expect("parse");
        assert!(validate_survey(&survey).is_err());
    }

    #[test]
    fn load_survey_reads_definition_from_disk() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("survey_server_test_{suffix}.toml"));
        fs::write(&path, SAMPLE).expect("write");

        let survey = load_survey(path.to_string_lossy().as_ref()).expect("load");
        assert_eq!(survey.title, "Customer Satisfaction Survey");

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn load_survey_reports_missing_file_with_path() {
        let error = load_survey("/nonexistent/survey.toml").expect_err("missing file");
        assert!(error.to_string().contains("/nonexistent/survey.toml"));
    }
}
