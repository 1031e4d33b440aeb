//! Spreadsheet export of activity reports

use ag_models::{ActivitySummary, DailyReport, PeriodReport};
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Datelike;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// What goes into one exported workbook
#[derive(Debug)]
pub struct ReportSheet<'a> {
    /// Sheet name and title cell, e.g. "Daily Report"
    pub title: &'static str,
    /// Date or period shown next to the title
    pub period: String,
    /// Download name without extension
    pub file_stem: String,
    pub summary: &'a ActivitySummary,
}

impl<'a> ReportSheet<'a> {
    pub fn daily(report: &'a DailyReport) -> Self {
        let date = report.date.format("%Y-%m-%d").to_string();
        Self {
            title: "Daily Report",
            file_stem: format!("daily_report_{}", date),
            period: date,
            summary: &report.summary,
        }
    }

    pub fn monthly(report: &'a PeriodReport) -> Self {
        let month = report.from.format("%Y-%m").to_string();
        Self {
            title: "Monthly Report",
            file_stem: format!("monthly_report_{}", month),
            period: month,
            summary: &report.summary,
        }
    }

    pub fn yearly(report: &'a PeriodReport) -> Self {
        let year = report.from.year().to_string();
        Self {
            title: "Yearly Report",
            file_stem: format!("yearly_report_{}", year),
            period: year,
            summary: &report.summary,
        }
    }

    pub fn filename(&self) -> String {
        format!("{}.xlsx", self.file_stem)
    }
}

/// Excel number format for `precision` decimals
fn hours_format(precision: usize) -> Format {
    let pattern = if precision == 0 {
        "0".to_string()
    } else {
        format!("0.{}", "0".repeat(precision))
    };
    Format::new().set_num_format(pattern)
}

/// Render a report into an in-memory `.xlsx` workbook
pub fn report_workbook(sheet: &ReportSheet<'_>, hours_precision: usize) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.title)?;

    let bold = Format::new().set_bold();
    let hours = hours_format(hours_precision);
    let summary = sheet.summary;

    worksheet.write_with_format(0, 0, sheet.title, &bold)?;
    worksheet.write(0, 1, sheet.period.as_str())?;

    let mut row: u32 = 2;
    worksheet.write_with_format(row, 0, "Summary", &bold)?;
    for (label, value) in [
        ("Total Workers", summary.total_workers),
        ("Total Operations", summary.total_operations),
        ("Completed Operations", summary.completed_operations),
        ("In Progress Operations", summary.in_progress_operations),
    ] {
        row += 1;
        worksheet.write(row, 0, label)?;
        worksheet.write(row, 1, value as f64)?;
    }
    row += 2;

    if !summary.operations_by_type.is_empty() {
        worksheet.write_with_format(row, 0, "Operations by Type", &bold)?;
        for (kind, count) in &summary.operations_by_type {
            row += 1;
            worksheet.write(row, 0, kind.as_str())?;
            worksheet.write(row, 1, *count as f64)?;
        }
        row += 2;
    }

    if !summary.worker_stats.is_empty() {
        worksheet.write_with_format(row, 0, "Worker Statistics", &bold)?;
        row += 1;
        write_header(worksheet, row, &["Worker Name", "Operations", "Hours Worked", "Fields Worked"], &bold)?;
        for stats in &summary.worker_stats {
            row += 1;
            worksheet.write(row, 0, stats.worker_name.as_str())?;
            worksheet.write(row, 1, stats.operations as f64)?;
            worksheet.write_with_format(row, 2, stats.hours_worked, &hours)?;
            worksheet.write(row, 3, stats.fields_worked as f64)?;
        }
        row += 2;
    }

    if !summary.field_stats.is_empty() {
        worksheet.write_with_format(row, 0, "Field Statistics", &bold)?;
        row += 1;
        write_header(worksheet, row, &["Field Name", "Operations", "Hours Worked", "Workers Count"], &bold)?;
        for stats in &summary.field_stats {
            row += 1;
            worksheet.write(row, 0, stats.field_name.as_str())?;
            worksheet.write(row, 1, stats.operations as f64)?;
            worksheet.write_with_format(row, 2, stats.hours_worked, &hours)?;
            worksheet.write(row, 3, stats.workers_count as f64)?;
        }
    }

    worksheet.set_column_width(0, 28)?;
    worksheet.set_column_width(2, 14)?;

    workbook.save_to_buffer()
}

fn write_header(
    worksheet: &mut Worksheet,
    row: u32,
    labels: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, label) in labels.iter().enumerate() {
        worksheet.write_with_format(row, col as u16, *label, format)?;
    }
    Ok(())
}

/// Attachment response for a rendered workbook
pub fn download(filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_models::WorkerStats;
    use chrono::NaiveDate;

    fn report() -> DailyReport {
        let mut summary = ActivitySummary {
            total_workers: 1,
            total_operations: 1,
            completed_operations: 1,
            ..Default::default()
        };
        summary.operations_by_type.insert("seeding".into(), 1);
        summary.worker_stats.push(WorkerStats {
            worker_id: 1,
            worker_name: "Mehmet".into(),
            operations: 1,
            hours_worked: 2.0,
            fields_worked: 1,
        });
        DailyReport {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            summary,
        }
    }

    #[test]
    fn test_daily_filename() {
        let report = report();
        let sheet = ReportSheet::daily(&report);
        assert_eq!(sheet.filename(), "daily_report_2024-05-01.xlsx");
        assert_eq!(sheet.period, "2024-05-01");
    }

    #[test]
    fn test_period_filenames() {
        let report = PeriodReport {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            summary: ActivitySummary::default(),
        };
        assert_eq!(ReportSheet::monthly(&report).filename(), "monthly_report_2024-02.xlsx");
        assert_eq!(ReportSheet::yearly(&report).filename(), "yearly_report_2024.xlsx");
    }

    #[test]
    fn test_workbook_is_zip() {
        let report = report();
        let bytes = report_workbook(&ReportSheet::daily(&report), 2).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_report_still_renders() {
        let report = DailyReport {
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            summary: ActivitySummary::default(),
        };
        assert!(report_workbook(&ReportSheet::daily(&report), 0).is_ok());
    }
}
