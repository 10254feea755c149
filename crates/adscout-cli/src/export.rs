//! `export` command: flatten stored ads into a CSV report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use adscout_db::ExportRow;
use anyhow::Context;
use sqlx::SqlitePool;

const HEADER: [&str; 9] = [
    "ad_id",
    "page_name",
    "start",
    "stop",
    "platforms",
    "title",
    "body",
    "score",
    "snapshot",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if first {
            first = false;
        } else {
            write!(w, ",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/// Report cells for one row. Platforms keep their stored JSON form; an
/// unscored ad gets an empty score cell.
fn row_cells(row: &ExportRow) -> [String; 9] {
    [
        row.ad_id.clone(),
        row.page_name.clone().unwrap_or_default(),
        row.ad_delivery_start_time.clone().unwrap_or_default(),
        row.ad_delivery_stop_time.clone().unwrap_or_default(),
        row.publisher_platforms_json.clone(),
        row.title.clone().unwrap_or_default(),
        row.body.clone().unwrap_or_default(),
        row.score.map(|s| format!("{s:.2}")).unwrap_or_default(),
        row.ad_snapshot_url.clone().unwrap_or_default(),
    ]
}

/// Writes the header and one line per row; returns the number of data rows.
fn write_csv<W: Write>(w: &mut W, rows: &[ExportRow]) -> io::Result<usize> {
    write_row(w, &HEADER)?;
    for row in rows {
        write_row(w, &row_cells(row))?;
    }
    w.flush()?;
    Ok(rows.len())
}

/// Reads the export snapshot and writes it to `out`, creating parent
/// directories as needed. Returns the number of rows written.
pub(crate) async fn export_csv(pool: &SqlitePool, out: &Path) -> anyhow::Result<usize> {
    let rows = adscout_db::list_export_rows(pool).await?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let written = write_csv(&mut writer, &rows)
        .with_context(|| format!("failed to write {}", out.display()))?;

    tracing::info!(rows = written, path = %out.display(), "export written");
    Ok(written)
}

/// # Errors
///
/// Returns an error if the database read or any file operation fails.
pub(crate) async fn run_export(pool: &SqlitePool, out: &Path) -> anyhow::Result<()> {
    let written = export_csv(pool, out).await?;
    println!("Exported {written} ads to {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscout_core::AdRecord;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn row(ad_id: &str) -> ExportRow {
        ExportRow {
            ad_id: ad_id.to_owned(),
            page_name: None,
            ad_delivery_start_time: None,
            ad_delivery_stop_time: None,
            publisher_platforms_json: "[]".to_owned(),
            title: None,
            body: None,
            score: None,
            ad_snapshot_url: None,
        }
    }

    fn render(rows: &[ExportRow]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_no_rows() {
        assert_eq!(
            render(&[]),
            "ad_id,page_name,start,stop,platforms,title,body,score,snapshot\n"
        );
    }

    #[test]
    fn fields_with_separators_or_quotes_are_quoted() {
        let mut r = row("1");
        r.page_name = Some("Lift, Inc.".to_owned());
        r.body = Some("say \"hi\"\nnow".to_owned());
        r.publisher_platforms_json = r#"["facebook","instagram"]"#.to_owned();
        r.score = Some(0.5749);

        let out = render(&[r]);
        let line = out.lines().nth(1).unwrap();
        assert!(line.starts_with("1,\"Lift, Inc.\",,,\"[\"\"facebook\"\",\"\"instagram\"\"]\",,"));
        assert!(out.contains("\"say \"\"hi\"\"\nnow\",0.57,\n"));
    }

    #[test]
    fn unscored_row_has_empty_score_cell() {
        let cells = row_cells(&row("7"));
        assert_eq!(cells[0], "7");
        assert_eq!(cells[4], "[]");
        assert_eq!(cells[7], "");
    }

    #[tokio::test]
    async fn export_creates_parent_dirs_and_counts_rows() {
        let pool = adscout_db::connect_in_memory().await.unwrap();
        let seen = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for id in ["A", "B"] {
            let record = AdRecord::from_value(json!({ "id": id, "page_name": "P" })).unwrap();
            adscout_db::upsert_ad_at(&pool, &record, seen).await.unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out/ads.csv");

        let before = export_csv(&pool, &out).await.unwrap();
        assert_eq!(before, 2);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().skip(1).all(|l| l.split(',').nth(7) == Some("")));

        adscout_db::recompute_scores(&pool, seen).await.unwrap();
        export_csv(&pool, &out).await.unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text
            .lines()
            .skip(1)
            .all(|l| l.split(',').nth(7) == Some("0.00")));
    }
}
