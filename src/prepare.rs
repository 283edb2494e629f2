use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use crate::corpus;


#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Preprocessor {
    #[default]
    PassThrough,
    Normalize,
}

/// A source ready to hand to a lexer. In normalize mode this owns the
/// re-encoded temp file, which is deleted when the value drops.
#[derive(Debug)]
pub struct Prepared {
    source: PathBuf,
    temp: Option<NamedTempFile>,
}

impl Prepared {
    pub fn path(&self) -> &Path {
        match &self.temp {
            Some(temp) => temp.path(),
            None => &self.source,
        }
    }
}

impl Preprocessor {
    pub fn prepare(&self, source: &Path) -> Result<Prepared> {
        let source = corpus::absolute(source)?;
        let temp = match self {
            Preprocessor::PassThrough => None,
            Preprocessor::Normalize => Some(normalize(&source)?),
        };
        Ok(Prepared { source, temp })
    }
}

fn normalize(source: &Path) -> Result<NamedTempFile> {
    let raw = fs::read(source)
        .with_context(|| format!("cannot read {}", source.display()))?;
    let text = decode(&raw)
        .with_context(|| format!("cannot decode {}", source.display()))?;
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
        bail!(
            "{}: non-ascii character {:?} survives normalization",
            source.display(),
            c
        );
    }
    let mut temp = NamedTempFile::new().context("cannot create temp file")?;
    temp.write_all(text.as_bytes())
        .with_context(|| format!("cannot write {}", temp.path().display()))?;
    temp.flush()
        .with_context(|| format!("cannot write {}", temp.path().display()))?;
    Ok(temp)
}

fn decode(raw: &[u8]) -> Result<String> {
    match raw {
        [0xff, 0xfe, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xfe, 0xff, rest @ ..] => utf16(rest, u16::from_be_bytes),
        _ => {
            let text = String::from_utf8_lossy(raw);
            Ok(text.strip_prefix('\u{feff}').unwrap_or(&text).to_string())
        }
    }
}

fn utf16(raw: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if raw.len() % 2 != 0 {
        bail!("truncated utf-16 code unit");
    }
    let units = raw.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .context("unpaired utf-16 surrogate")
}
