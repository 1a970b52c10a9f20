use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::question::QuestionRecord;

/// Header names every question sheet must carry
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "category",
    "question",
    "choice1",
    "choice2",
    "choice3",
    "choice4",
    "answer",
    "explanation",
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("question sheet is empty (no header row)")]
    MissingHeader,
    #[error("question sheet header is missing the \"{0}\" column")]
    MissingColumn(String),
    #[error("answer must be 1-4 (line {line}, raw={raw:?})")]
    InvalidAnswer { line: u64, raw: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Normalize a raw sheet cell: NBSP becomes a space, zero-width characters
/// and the BOM are dropped, surrounding (including ideographic) whitespace is trimmed
pub fn clean_cell(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolve an answer cell to 1..=4. Full-width digits and a single pair of
/// surrounding double quotes are accepted, nothing else is.
pub fn normalize_answer(raw: &str) -> Option<u8> {
    let half_width: String = raw
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect();

    let cleaned = clean_cell(&half_width);
    let unquoted = cleaned
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&cleaned)
        .trim();

    match unquoted {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(3),
        "4" => Some(4),
        _ => None,
    }
}

struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, IngestError> {
        let index: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| (clean_cell(h), i))
            .collect();

        for required in REQUIRED_COLUMNS {
            if !index.contains_key(required) {
                return Err(IngestError::MissingColumn(required.to_string()));
            }
        }

        Ok(Self { index })
    }

    fn raw<'r>(&self, record: &'r StringRecord, name: &str) -> &'r str {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
    }

    fn cell(&self, record: &StringRecord, name: &str) -> String {
        clean_cell(self.raw(record, name))
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Parse a tab-separated question sheet into validated records
///
/// The first non-blank line is the header. Columns may appear in any order and
/// extra columns are ignored. Fields are split on tabs only; quotes are kept
/// as cell content.
pub fn parse_questions(text: &str) -> Result<Vec<QuestionRecord>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();

    let header = loop {
        match rows.next() {
            Some(record) => {
                let record = record?;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => return Err(IngestError::MissingHeader),
        }
    };
    let columns = Columns::from_header(&header)?;

    let mut questions = Vec::new();
    for record in rows {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_answer = columns.raw(&record, "answer");
        let answer = normalize_answer(raw_answer).ok_or_else(|| IngestError::InvalidAnswer {
            line,
            raw: raw_answer.to_string(),
        })?;

        let id = match columns.cell(&record, "id") {
            id if id.is_empty() => format!("row-{line}"),
            id => id,
        };

        questions.push(QuestionRecord {
            id,
            category: columns.cell(&record, "category"),
            question: columns.cell(&record, "question"),
            choices: [
                columns.cell(&record, "choice1"),
                columns.cell(&record, "choice2"),
                columns.cell(&record, "choice3"),
                columns.cell(&record, "choice4"),
            ],
            answer,
            explanation: columns.cell(&record, "explanation"),
        });
    }

    log::debug!("parsed {} questions", questions.len());
    Ok(questions)
}
