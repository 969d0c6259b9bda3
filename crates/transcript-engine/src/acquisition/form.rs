//! Locate the lookup form on the login page and prepare its submission.

use crate::config::REGISTRATION_FIELD;
use scraper::{Html, Selector};

/// The lookup form, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupForm {
    /// Resolved absolute action URL.
    pub action_url: String,
    /// `GET` or `POST`, upper-cased.
    pub method: String,
    /// Named inputs in document order, hidden tokens included.
    pub fields: Vec<(String, String)>,
}

impl LookupForm {
    /// A bare form posting back to `base_url`, for pages without a `<form>`.
    pub fn fallback(base_url: &str) -> Self {
        Self {
            action_url: base_url.to_string(),
            method: "POST".to_string(),
            fields: Vec::new(),
        }
    }

    /// Set the registration field, replacing any pre-filled value.
    pub fn with_registration(mut self, reg: &str) -> Self {
        match self
            .fields
            .iter_mut()
            .find(|(name, _)| name == REGISTRATION_FIELD)
        {
            Some((_, value)) => *value = reg.to_string(),
            None => self
                .fields
                .push((REGISTRATION_FIELD.to_string(), reg.to_string())),
        }
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }
}

/// Find the form carrying the `REG` field, else the first form on the page.
///
/// Returns `None` when the page has no form at all.
pub fn find_lookup_form(html: &str, base_url: &str) -> Option<LookupForm> {
    let document = Html::parse_document(html);
    let form_sel = Selector::parse("form").expect("form selector is valid");
    let input_sel = Selector::parse("input").expect("input selector is valid");
    let reg_sel = Selector::parse(&format!("input[name=\"{REGISTRATION_FIELD}\"]"))
        .expect("registration selector is valid");

    let forms: Vec<_> = document.select(&form_sel).collect();
    let form = forms
        .iter()
        .find(|f| f.select(&reg_sel).next().is_some())
        .or_else(|| forms.first())?;

    let action_url = resolve_url(base_url, form.value().attr("action").unwrap_or("").trim());
    let method = form
        .value()
        .attr("method")
        .unwrap_or("POST")
        .trim()
        .to_uppercase();

    let fields = form
        .select(&input_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            if name.is_empty() {
                return None;
            }
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Some(LookupForm {
        action_url,
        method,
        fields,
    })
}

/// Resolve a potentially relative URL against a base URL.
fn resolve_url(base_url: &str, relative: &str) -> String {
    if relative.is_empty() {
        return base_url.to_string();
    }
    if relative.starts_with("http://") || relative.starts_with("https://") {
        return relative.to_string();
    }
    if let Ok(base) = url::Url::parse(base_url) {
        if let Ok(resolved) = base.join(relative) {
            return resolved.to_string();
        }
    }
    relative.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://lms.example.edu/login/index.php";

    #[test]
    fn test_picks_form_with_registration_field() {
        let html = r#"
        <html><body>
            <form action="/search" method="get"><input name="q"></form>
            <form action="result.php" method="post">
                <input type="hidden" name="token" value="abc123">
                <input type="text" id="REG" name="REG">
                <input type="submit" name="submit" value="Result">
            </form>
        </body></html>
        "#;
        let form = find_lookup_form(html, BASE).unwrap();
        assert_eq!(form.action_url, "http://lms.example.edu/login/result.php");
        assert_eq!(form.method, "POST");
        assert_eq!(
            form.fields,
            vec![
                ("token".to_string(), "abc123".to_string()),
                ("REG".to_string(), String::new()),
                ("submit".to_string(), "Result".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_action_posts_back_to_base() {
        let html = r#"<form><input name="REG"></form>"#;
        let form = find_lookup_form(html, BASE).unwrap();
        assert_eq!(form.action_url, BASE);
        assert_eq!(form.method, "POST");
    }

    #[test]
    fn test_first_form_when_no_registration_field() {
        let html = r#"<form action="https://other.example/go" method="GET"><input name="a" value="1"></form>"#;
        let form = find_lookup_form(html, BASE).unwrap();
        assert_eq!(form.action_url, "https://other.example/go");
        assert!(form.is_get());
    }

    #[test]
    fn test_no_form() {
        assert!(find_lookup_form("<html><body><p>down</p></body></html>", BASE).is_none());
    }

    #[test]
    fn test_with_registration_overrides_or_appends() {
        let form = LookupForm {
            action_url: BASE.into(),
            method: "POST".into(),
            fields: vec![("REG".into(), "placeholder".into())],
        }
        .with_registration("2022-ag-7755");
        assert_eq!(form.fields, vec![("REG".into(), "2022-ag-7755".into())]);

        let form = LookupForm::fallback(BASE).with_registration("2022-ag-7755");
        assert_eq!(form.fields, vec![("REG".into(), "2022-ag-7755".into())]);
    }
}
