//! Combine command implementation.

use crate::display::{Family, decode, read_payload, write_raw};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;
use tacora_lib::prelude::*;
use tracing::info;

fn merge<T: Combine, W: Write>(first: &str, second: &str, pretty: bool, writer: W) -> Result<()> {
    let left: T = decode(first)?;
    let right: T = decode(second)?;
    let merged = left
        .combine(right)
        .with_context(|| format!("Failed to combine {} payloads", T::FAMILY))?;
    info!(family = T::FAMILY, rows = merged.len(), "combined payloads");
    write_raw(&merged, pretty, writer)
}

/// Merge two candle payloads, earlier one first, and write the result.
pub(crate) fn combine<W: Write>(
    first: &Path,
    second: &Path,
    family: Family,
    pretty: bool,
    mut writer: W,
) -> Result<()> {
    let left = read_payload(first)?;
    let right = read_payload(second)?;

    match family {
        Family::StockCandles => merge::<StockCandlesResponse, _>(&left, &right, pretty, &mut writer),
        Family::FundCandles => merge::<FundCandlesResponse, _>(&left, &right, pretty, &mut writer),
        Family::IndexCandles => merge::<IndexCandlesResponse, _>(&left, &right, pretty, &mut writer),
        other => bail!("{other} payloads cannot be combined"),
    }?;

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const JAN_4: &str = r#"{"s":"ok","t":[1672808400],"o":[355.43],"h":[357.6],"l":[353.01],"c":[354.5]}"#;
    const JAN_5: &str = r#"{"s":"ok","t":[1672894800],"o":[351.35],"h":[353.17],"l":[349.2],"c":[352.0]}"#;

    fn write_pair(first: &str, second: &str) -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, first).unwrap();
        std::fs::write(&b, second).unwrap();
        (dir, a, b)
    }

    #[test]
    fn test_combine_in_order() {
        let (_dir, a, b) = write_pair(JAN_4, JAN_5);
        let mut output = Vec::new();

        combine(&a, &b, Family::IndexCandles, false, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"s\":\"ok\",\"t\":[1672808400,1672894800],\"o\":[355.43,351.35],\
             \"h\":[357.6,353.17],\"l\":[353.01,349.2],\"c\":[354.5,352.0]}\n"
        );
    }

    #[test]
    fn test_combine_overlap() {
        let (_dir, a, b) = write_pair(JAN_4, JAN_4);
        let err = combine(&a, &b, Family::FundCandles, false, Vec::new()).unwrap_err();

        assert_eq!(err.to_string(), "Failed to combine fund candles payloads");
    }

    #[test]
    fn test_combine_unsupported_family() {
        let (_dir, a, b) = write_pair(JAN_4, JAN_5);
        let err = combine(&a, &b, Family::Earnings, false, Vec::new()).unwrap_err();

        assert_eq!(err.to_string(), "earnings payloads cannot be combined");
    }
}
