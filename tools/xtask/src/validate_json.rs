#[cfg(test)]
#[path = "validate_json_test.rs"]
mod tests;

use std::fmt;
use std::fs;

use anyhow::Result;

pub struct Report {
    pub path: String,
    pub error: Option<String>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        return self.error.is_none();
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => return write!(f, "{}: JSON error: {err}", self.path),
            None => return write!(f, "{}: JSON is valid", self.path),
        }
    }
}

fn check(path: &str) -> Result<()> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str::<serde_json::Value>(&content)?;
    return Ok(());
}

pub fn validate(path: &str) -> Report {
    return Report {
        path: path.to_string(),
        error: check(path).err().map(|err| return err.to_string()),
    };
}

pub fn validate_all(paths: &[String]) -> Vec<Report> {
    return paths.iter().map(|path| return validate(path)).collect();
}
