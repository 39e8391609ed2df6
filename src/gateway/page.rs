//! Server-rendered HTML for the complaint form.

use std::fmt::Write;

use crate::gatekeeper::PredictionResult;

pub const PAGE_TITLE: &str = "Car Issue Predictor";
const PLACEHOLDER: &str = "Eg: engine cranks but won't start, burning smell, vibration...";

/// What the page shows below the form.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Prediction {
        result: &'a PredictionResult,
        suggestion: Option<&'a str>,
    },
    Rejected {
        message: &'a str,
    },
    FeedbackRecorded {
        total: usize,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageView<'a> {
    /// Echoed back into the text area.
    pub complaint: &'a str,
    pub outcome: Option<Outcome<'a>>,
    pub feedback_enabled: bool,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<main>
<h1>{title}</h1>
<form method="post" action="/predict">
<label for="complaint"><h3>Describe the car issue:</h3></label>
<textarea id="complaint" name="complaint" rows="6" cols="60" placeholder="{placeholder}">{complaint}</textarea>
<p><button type="submit">Predict Issue</button></p>
</form>
"#,
        title = PAGE_TITLE,
        placeholder = escape_html(PLACEHOLDER),
        complaint = escape_html(view.complaint),
    );

    match view.outcome {
        Some(Outcome::Prediction { result, suggestion }) => {
            render_prediction(&mut html, view, result, suggestion);
        }
        Some(Outcome::Rejected { message }) => {
            let _ = writeln!(
                html,
                r#"<p class="error" role="alert">{}</p>"#,
                escape_html(message)
            );
        }
        Some(Outcome::FeedbackRecorded { total }) => {
            let _ = writeln!(
                html,
                r#"<p class="notice">Thanks for the feedback! Total feedback received: {}</p>"#,
                total
            );
        }
        None => {}
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_prediction(
    html: &mut String,
    view: &PageView<'_>,
    result: &PredictionResult,
    suggestion: Option<&str>,
) {
    let _ = writeln!(
        html,
        r#"<p class="success">Likely Issue: <strong>{}</strong> ({:.1}%)</p>"#,
        escape_html(&result.label),
        result.confidence_percent()
    );

    if let Some(text) = suggestion {
        let _ = writeln!(
            html,
            r#"<p class="info">Suggested Action: <strong>{}</strong></p>"#,
            escape_html(text)
        );
    }

    let _ = writeln!(
        html,
        "<h3>Top {} Possible Issues:</h3>\n<ul>",
        result.alternatives.len()
    );
    for alt in &result.alternatives {
        let _ = writeln!(
            html,
            "<li>{} ({:.1}%)</li>",
            escape_html(&alt.label),
            alt.confidence_percent()
        );
    }
    html.push_str("</ul>\n");

    if view.feedback_enabled {
        let _ = write!(
            html,
            r#"<form method="post" action="/feedback">
<h3>Was this prediction correct?</h3>
<input type="hidden" name="input" value="{input}">
<input type="hidden" name="predicted_label" value="{label}">
<label><input type="radio" name="correct" value="yes" checked> Yes</label>
<label><input type="radio" name="correct" value="no"> No</label>
<p><textarea name="comment" rows="3" cols="60" placeholder="Optional comment"></textarea></p>
<p><button type="submit">Send Feedback</button></p>
</form>
"#,
            input = escape_html(view.complaint),
            label = escape_html(&result.label),
        );
    }
}
