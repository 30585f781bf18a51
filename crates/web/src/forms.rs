//! HTML form payloads and their validation.
//!
//! Every field defaults to empty so a missing field is reported as a
//! validation error on re-render instead of a 422 from the extractor.

use std::fmt;

use serde::Deserialize;
use url::Url;

use quill_core::Email;

use crate::models::PostContent;

/// Longest accepted title or subtitle.
const MAX_HEADING_LENGTH: usize = 250;

/// Longest accepted image URL.
const MAX_URL_LENGTH: usize = 2048;

/// Longest accepted post body or comment.
const MAX_BODY_LENGTH: usize = 50_000;

/// A validation message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All validation failures for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// First message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

fn require(errors: &mut FormErrors, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, "This field is required.");
        return false;
    }
    true
}

fn require_at_most(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if require(errors, field, value) && value.trim().chars().count() > max {
        errors.push(field, format!("Must be at most {max} characters."));
    }
}

/// Registration form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterForm {
    /// Check that every field is present and the email is well-formed.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if require(&mut errors, "email", &self.email) && Email::parse(self.email.trim()).is_err() {
            errors.push("email", "Invalid email address.");
        }
        if self.password.is_empty() {
            errors.push("password", "This field is required.");
        }
        require(&mut errors, "name", &self.name);
        errors.into_result(())
    }
}

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Check that both fields are present.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if require(&mut errors, "email", &self.email) && Email::parse(self.email.trim()).is_err() {
            errors.push("email", "Invalid email address.");
        }
        if self.password.is_empty() {
            errors.push("password", "This field is required.");
        }
        errors.into_result(())
    }
}

/// Create/edit post form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub img_url: String,
    pub body: String,
}

impl PostForm {
    /// Validate and normalize into the stored post fields.
    ///
    /// Title, subtitle and image URL are trimmed; the body is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<PostContent, FormErrors> {
        let mut errors = FormErrors::default();
        require_at_most(&mut errors, "title", &self.title, MAX_HEADING_LENGTH);
        require_at_most(&mut errors, "subtitle", &self.subtitle, MAX_HEADING_LENGTH);
        if require(&mut errors, "img_url", &self.img_url) {
            if let Err(message) = validate_image_url(self.img_url.trim()) {
                errors.push("img_url", message);
            }
        }
        require_at_most(&mut errors, "body", &self.body, MAX_BODY_LENGTH);

        errors.into_result(PostContent {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            body: self.body.clone(),
            img_url: self.img_url.trim().to_string(),
        })
    }
}

impl From<PostContent> for PostForm {
    fn from(content: PostContent) -> Self {
        Self {
            title: content.title,
            subtitle: content.subtitle,
            img_url: content.img_url,
            body: content.body,
        }
    }
}

fn validate_image_url(raw: &str) -> Result<(), &'static str> {
    if raw.len() > MAX_URL_LENGTH {
        return Err("URL is too long.");
    }
    let url = Url::parse(raw).map_err(|_| "Must be a full URL, e.g. https://example.com/a.png.")?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err("URL must start with http:// or https://.");
    }
    if url.host_str().is_none() {
        return Err("URL must include a host.");
    }
    Ok(())
}

/// Comment form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    /// Return the trimmed comment text.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment is blank or too long.
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        require_at_most(&mut errors, "text", &self.text, MAX_BODY_LENGTH);
        errors.into_result(self.text.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn post_form() -> PostForm {
        PostForm {
            title: " Hello ".to_string(),
            subtitle: "World".to_string(),
            img_url: "http://x/y.png".to_string(),
            body: "...".to_string(),
        }
    }

    #[test]
    fn test_register_requires_every_field() {
        let errors = RegisterForm::default().validate().unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("name").is_some());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let form = RegisterForm {
            email: "alice".to_string(),
            password: "pw123".to_string(),
            name: "Alice".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email address."));
        assert_eq!(errors.to_string(), "email: Invalid email address.");
    }

    #[test]
    fn test_register_accepts_example_account() {
        let form = RegisterForm {
            email: "alice@example.com".to_string(),
            password: "pw123".to_string(),
            name: "Alice".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm {
            email: "alice@example.com".to_string(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("password").is_some());
        assert!(errors.get("email").is_none());
    }

    #[test]
    fn test_post_form_normalizes() {
        let content = post_form().validate().unwrap();
        assert_eq!(content.title, "Hello");
        assert_eq!(content.img_url, "http://x/y.png");
    }

    #[test]
    fn test_post_form_rejects_relative_or_non_http_urls() {
        for url in ["y.png", "/static/y.png", "ftp://x/y.png", "javascript:alert(1)"] {
            let form = PostForm {
                img_url: url.to_string(),
                ..post_form()
            };
            assert!(
                form.validate().unwrap_err().get("img_url").is_some(),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_post_form_rejects_long_title() {
        let form = PostForm {
            title: "t".repeat(MAX_HEADING_LENGTH + 1),
            ..post_form()
        };
        assert!(form.validate().unwrap_err().get("title").is_some());
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let form = CommentForm {
            text: "   ".to_string(),
        };
        assert!(form.validate().is_err());

        let form = CommentForm {
            text: " Nice! ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "Nice!");
    }

    #[test]
    fn test_long_body_and_comment_are_rejected() {
        let form = PostForm {
            body: "b".repeat(MAX_BODY_LENGTH + 1),
            ..post_form()
        };
        assert_eq!(
            form.validate().unwrap_err().get("body"),
            Some("Must be at most 50000 characters.")
        );

        let form = CommentForm {
            text: "c".repeat(MAX_BODY_LENGTH + 1),
        };
        assert!(form.validate().unwrap_err().get("text").is_some());

        let form = CommentForm {
            text: "c".repeat(MAX_BODY_LENGTH),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_display_joins_errors() {
        let errors = CommentForm::default().validate().unwrap_err();
        assert_eq!(errors.to_string(), "text: This field is required.");
    }
}
