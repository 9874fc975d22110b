use std::collections::HashMap;

use tracing::warn;

use super::CatalogError;

/// One data row, keyed by header name. Values are trimmed; fields missing
/// from a short row read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.is_empty())
    }
}

/// Split delimited text into header-aligned records.
///
/// Quoted fields may contain commas, and a doubled quote inside a quoted
/// field is a literal quote. Rows whose width differs from the header are
/// accepted and aligned by position. Blank lines are skipped. Bytes that are
/// not valid UTF-8 are replaced per field, so a badly encoded row is kept.
pub fn parse_records(data: impl AsRef<[u8]>) -> Result<Vec<RawRecord>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_ref());

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = String::from_utf8_lossy(h);
            // Spreadsheet exports often prefix the first header with a BOM
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.into_owned()
            }
        })
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CatalogError::MissingHeader);
    }

    let mut records = Vec::new();
    for (line, result) in reader.byte_records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                // The reader cannot recover the row's fields, so there is nothing to normalize
                warn!(line = line + 2, error = %e, "skipping unreadable dataset row");
                continue;
            }
        };

        if std::str::from_utf8(row.as_slice()).is_err() {
            warn!(line = line + 2, "dataset row is not valid UTF-8, replacing bad bytes");
        }

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = row.get(i).map(String::from_utf8_lossy).unwrap_or_default();
                (name.clone(), value.into_owned())
            })
            .collect();
        let record = RawRecord { fields };

        if !record.is_blank() {
            records.push(record);
        }
    }

    Ok(records)
}
