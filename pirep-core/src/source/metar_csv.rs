//! Reader for the aviationweather.gov METAR CSV product.
//!
//! The product starts with a few status lines before the header row, and
//! repeats the `sky_cover` / `cloud_base_ft_agl` columns once per layer.

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::normalize::metar::{MAX_CLOUD_LAYERS, RawObservation, RawSkyLayer};

struct Columns {
    station_id: usize,
    visibility: Option<usize>,
    wx_string: Option<usize>,
    sky: Vec<(usize, Option<usize>)>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        let all = |name: &str| -> Vec<usize> {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(i, _)| i)
                .collect()
        };

        let station_id =
            position("station_id").ok_or_else(|| anyhow!("METAR CSV has no `station_id` column"))?;

        let bases = all("cloud_base_ft_agl");
        let sky = all("sky_cover")
            .into_iter()
            .take(MAX_CLOUD_LAYERS)
            .enumerate()
            .map(|(n, cover)| (cover, bases.get(n).copied()))
            .collect();

        Ok(Self {
            station_id,
            visibility: position("visibility_statute_mi"),
            wx_string: position("wx_string"),
            sky,
        })
    }

    fn extract(&self, record: &StringRecord) -> RawObservation {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        RawObservation {
            station_id: field(Some(self.station_id)),
            visibility: field(self.visibility),
            sky: self
                .sky
                .iter()
                .map(|&(cover, base)| RawSkyLayer {
                    cover: field(Some(cover)),
                    base_ft: field(base),
                })
                .collect(),
            wx_string: field(self.wx_string),
        }
    }
}

/// Byte offset of the first line that looks like the header row.
fn header_offset(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_end().split(',').any(|f| f.trim() == "station_id") {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Parse the CSV body into raw rows. Rows the CSV reader cannot decode are
/// skipped; a body without a usable header is an error.
pub fn parse_metar_csv(text: &str) -> Result<Vec<RawObservation>> {
    let start = header_offset(text)
        .ok_or_else(|| anyhow!("METAR CSV contained no header row with a `station_id` column"))?;

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text[start..].as_bytes());

    let headers = reader.headers().context("Failed to read METAR CSV header")?.clone();
    let columns = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(columns.extract(&record)),
            Err(e) => tracing::warn!(line = line + 1, error = %e, "skipping unreadable METAR CSV row"),
        }
    }

    tracing::debug!(rows = rows.len(), "parsed METAR CSV");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
No errors
No warnings
12 ms
data source=metars
3 results
raw_text,station_id,observation_time,visibility_statute_mi,wx_string,sky_cover,cloud_base_ft_agl,sky_cover,cloud_base_ft_agl,sky_cover,cloud_base_ft_agl,sky_cover,cloud_base_ft_agl,flight_category
PAFA 011753Z 00000KT 1 1/2SM -SN BR OVC008 M12/M14 A2992,PAFA,2024-03-01T17:53:00Z,1.5,-SN BR,OVC,800,,,,,,,IFR
PANC 011753Z 34005KT 10SM FEW045 BKN120 M03/M09 A2987,PANC,2024-03-01T17:53:00Z,10+,,FEW,4500,BKN,12000,,,,,VFR
PAOM 011753Z 05015KT 10SM CLR M20/M25 A3012,PAOM,2024-03-01T17:53:00Z,10+,,CLR,,,,,,,,VFR
";

    #[test]
    fn skips_preamble_and_reads_rows() {
        let rows = parse_metar_csv(SAMPLE).unwrap();
        assert_eq!(rows.len(), 3);

        let fai = &rows[0];
        assert_eq!(fai.station_id.as_deref(), Some("PAFA"));
        assert_eq!(fai.visibility.as_deref(), Some("1.5"));
        assert_eq!(fai.wx_string.as_deref(), Some("-SN BR"));
        assert_eq!(
            fai.sky[0],
            RawSkyLayer { cover: Some("OVC".into()), base_ft: Some("800".into()) }
        );
        assert_eq!(fai.sky[1], RawSkyLayer::default());
    }

    #[test]
    fn repeated_sky_columns_pair_in_order() {
        let rows = parse_metar_csv(SAMPLE).unwrap();
        let anc = &rows[1];
        assert_eq!(anc.sky.len(), MAX_CLOUD_LAYERS);
        assert_eq!(anc.sky[1].cover.as_deref(), Some("BKN"));
        assert_eq!(anc.sky[1].base_ft.as_deref(), Some("12000"));
        assert_eq!(anc.wx_string, None);
    }

    #[test]
    fn header_only_gives_no_rows() {
        let rows = parse_metar_csv("station_id,visibility_statute_mi\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn body_without_header_is_an_error() {
        let err = parse_metar_csv("No errors\nSomething went wrong\n").unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }

    #[test]
    fn short_rows_degrade_to_missing_fields() {
        let rows = parse_metar_csv("station_id,visibility_statute_mi,wx_string\nPABE\n").unwrap();
        assert_eq!(rows[0].station_id.as_deref(), Some("PABE"));
        assert_eq!(rows[0].visibility, None);
        assert!(rows[0].sky.is_empty());
    }
}
