//! Server-rendered HTML pages for the survey flow.

use shared::domain::{Question, SurveyDefinition};

pub fn start_page(survey: &SurveyDefinition) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    <h1>{title}</h1>
    <p>{instructions}</p>
    <form method="POST" action="/begin">
        <button type="submit">Start Survey</button>
    </form>
</body>
</html>
"#,
        title = escape_html(&survey.title),
        instructions = escape_html(&survey.instructions),
    )
}

pub fn question_page(
    index: usize,
    total: usize,
    question: &Question,
    notice: Option<&str>,
) -> String {
    let notice_html = notice
        .map(|text| format!("    <p class=\"notice\">{}</p>\n", escape_html(text)))
        .unwrap_or_default();

    let mut choices = String::new();
    for choice in &question.choices {
        let escaped = escape_html(choice);
        choices.push_str(&format!(
            "        <label><input type=\"radio\" name=\"answer\" value=\"{escaped}\" required> {escaped}</label><br>\n"
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Question {number} of {total}</title>
</head>
<body>
    <h2>Question {number} of {total}</h2>
{notice_html}    <p>{prompt}</p>
    <form method="POST" action="/answer">
{choices}        <button type="submit">Submit</button>
    </form>
</body>
</html>
"#,
        number = index + 1,
        prompt = escape_html(&question.prompt),
    )
}

pub fn completion_page(survey: &SurveyDefinition) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Survey Complete</title>
</head>
<body>
    <h1>Thank you!</h1>
    <p>You have completed the {title}.</p>
</body>
</html>
"#,
        title = escape_html(&survey.title),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_page_lists_prompt_choices_and_notice() {
        let question = Question {
            prompt: "Have you shopped here before?".into(),
            choices: vec!["Yes".into(), "No".into()],
        };
        let page = question_page(0, 3, &question, Some("Invalid question id: 2."));

        assert!(page.contains("Question 1 of 3"));
        assert!(page.contains("Have you shopped here before?"));
        assert!(page.contains("value=\"Yes\""));
        assert!(page.contains("value=\"No\""));
        assert!(page.contains("Invalid question id: 2."));
        assert!(page.contains("action=\"/answer\""));
    }

    #[test]
    fn survey_supplied_text_is_escaped() {
        let question = Question {
            prompt: "Rate <b>us</b> & be honest".into(),
            choices: vec!["\"Great\"".into()],
        };
        let page = question_page(1, 2, &question, None);

        assert!(page.contains("Rate &lt;b&gt;us&lt;/b&gt; &amp; be honest"));
        assert!(page.contains("&quot;Great&quot;"));
        assert!(!page.contains("<b>us</b>"));
    }
}
