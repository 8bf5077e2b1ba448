use csv::{ReaderBuilder, StringRecord};

use crate::error::SeedError;

/// Title row, caption row and column header row.
pub const HEADER_ROWS: usize = 3;

#[derive(Debug, Clone)]
pub struct Sheet {
    pub semester: String,
    pub rows: Vec<StringRecord>,
}

pub fn load(text: &str) -> Result<Sheet, SeedError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    if records.len() <= HEADER_ROWS {
        return Err(SeedError::TooShort(records.len()));
    }

    let semester = records[0].get(0).unwrap_or_default().trim().to_string();
    let rows = records.into_iter().skip(HEADER_ROWS).collect();

    Ok(Sheet { semester, rows })
}
