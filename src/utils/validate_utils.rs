use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::{ValidateUrl, ValidationError};

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{5,}$").expect("valid username regex"));
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][\w\-\+\.# ]{0,29}$").expect("valid tag regex"));

pub fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

pub fn trim_option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

pub fn validate_username(u: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(u) {
        return Err(ValidationError::new("username")
            .with_message("Letters, numbers and '_'. Minimum 5 characters".into()));
    }
    Ok(())
}

pub fn validate_skill_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    for tag in tags {
        let trimmed = tag.trim();

        if trimmed.is_empty() {
            return Err(
                ValidationError::new("skill_tags").with_message("Tag cannot be empty".into())
            );
        }

        if !TAG_REGEX.is_match(trimmed) {
            return Err(ValidationError::new("skill_tags")
                .with_message("Tag contains forbidden symbol".into()));
        }
    }
    Ok(())
}

pub fn validate_links(links: &Vec<String>) -> Result<(), ValidationError> {
    for link in links {
        let is_http = link.starts_with("http://") || link.starts_with("https://");
        if !is_http || !link.validate_url() {
            return Err(ValidationError::new("links")
                .with_message(format!("{link} is not a valid http(s) link").into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("worker_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn skill_tags_rules() {
        assert!(validate_skill_tags(&vec!["rust".to_string(), "C++".to_string()]).is_ok());
        assert!(validate_skill_tags(&vec![" ".to_string()]).is_err());
        assert!(validate_skill_tags(&vec!["<script>".to_string()]).is_err());
    }

    #[test]
    fn links_must_be_http() {
        assert!(validate_links(&vec!["https://example.com/work".to_string()]).is_ok());
        assert!(validate_links(&vec!["ftp://example.com".to_string()]).is_err());
        assert!(validate_links(&vec!["not a link".to_string()]).is_err());
    }
}
