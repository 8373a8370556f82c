use std::{io::Read, path::Path};

use csv::{ReaderBuilder, Trim};

use crate::{Error, Result};

/// One app store region: the display name and the locale code used in feed URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storefront {
    pub name: String,
    pub code: String,
}

impl Storefront {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Loads the storefront list: a CSV with a header row, name in the first column
/// and locale code in the second.
pub fn load_storefronts(path: impl AsRef<Path>) -> Result<Vec<Storefront>> {
    let file = std::fs::File::open(path)?;
    read_storefronts(file)
}

pub fn read_storefronts(reader: impl Read) -> Result<Vec<Storefront>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut storefronts = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
        match (row.get(0), row.get(1)) {
            (Some(name), Some(code)) if !name.is_empty() && !code.is_empty() => {
                storefronts.push(Storefront::new(name, code));
            }
            _ if row.iter().all(str::is_empty) => continue,
            _ => return Err(Error::StorefrontRow(line)),
        }
    }
    Ok(storefronts)
}
