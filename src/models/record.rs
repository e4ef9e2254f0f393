use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A stored PDF document. `filename` is the generated on-disk name.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PdfRecord {
    pub id: i64,
    pub filename: String,
    pub title: String,
    pub file_size: i64,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A generated summary, always owned by exactly one [`PdfRecord`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SummaryRecord {
    pub id: i64,
    pub pdf_id: i64,
    #[sqlx(try_from = "String")]
    pub style: SummaryStyle,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub language: Language,
    pub summary_time: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPdf {
    pub filename: String,
    pub title: String,
    pub file_size: i64,
    pub page_count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSummary {
    pub pdf_id: i64,
    pub style: SummaryStyle,
    pub content: String,
    pub language: Language,
    pub summary_time: f64,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SummaryStyle {
    Short,
    #[default]
    General,
    Detailed,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Short => "short",
            SummaryStyle::General => "general",
            SummaryStyle::Detailed => "detailed",
        }
    }
}

impl FromStr for SummaryStyle {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryStyle::Short),
            "general" => Ok(SummaryStyle::General),
            "detailed" => Ok(SummaryStyle::Detailed),
            _ => Err(ParseEnumError {
                kind: "summary style",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SummaryStyle {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    #[default]
    English,
    Indonesian,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Indonesian => "indonesian",
        }
    }
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "indonesian" => Ok(Language::Indonesian),
            _ => Err(ParseEnumError {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
