//! Excel export functionality

use std::collections::BTreeMap;
use std::path::Path;

use parkcov_domain::model::FleetModel;
use parkcov_domain::service::{Pivot, PolicyFinding};
use parkcov_types::{Annotation, Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

/// Export the coverage pivot, one row per model, with annotations joined by model name
pub fn export_coverage(
    pivot: &Pivot,
    annotations: &BTreeMap<String, Annotation>,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_coverage_sheet(sheet, pivot, annotations)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    info!(path = %output_path.display(), rows = pivot.model_count(), "coverage exported");
    Ok(())
}

/// Export policy findings in the order given
pub fn export_policy<'a, I>(findings: I, output_path: &Path) -> Result<()>
where
    I: IntoIterator<Item = &'a PolicyFinding>,
{
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let rows = write_policy_sheet(sheet, findings)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    info!(path = %output_path.display(), rows, "policy analysis exported");
    Ok(())
}

/// Export every annotation as a task list
pub fn export_annotations(
    annotations: &BTreeMap<String, Annotation>,
    output_path: &Path,
) -> Result<()> {
    if annotations.is_empty() {
        return Err(Error::InvalidInput("no annotations to export".to_string()));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_annotations_sheet(sheet, annotations)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    info!(path = %output_path.display(), rows = annotations.len(), "model tasks exported");
    Ok(())
}

/// Export fleet models with no product listed
pub fn export_uncovered(uncovered: &[&FleetModel], output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_uncovered_sheet(sheet, uncovered)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    info!(path = %output_path.display(), rows = uncovered.len(), "uncovered models exported");
    Ok(())
}

/// Pivot column label as a spreadsheet header ("AA|Filtros" -> "AA Filtros")
pub fn column_header(column: &str) -> String {
    column.replace('|', " ")
}

fn write_headers(sheet: &mut Worksheet, headers: &[String]) -> Result<()> {
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }
    Ok(())
}

fn write_coverage_sheet(
    sheet: &mut Worksheet,
    pivot: &Pivot,
    annotations: &BTreeMap<String, Annotation>,
) -> Result<()> {
    sheet
        .set_name("Coverage")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let mut headers = vec!["Brand".to_string(), "Model".to_string()];
    headers.extend(pivot.columns.iter().map(|c| column_header(c)));
    headers.push("Total Products".to_string());
    headers.push("Strategic Comments".to_string());
    write_headers(sheet, &headers)?;

    let total_col = (pivot.columns.len() + 2) as u16;
    let comment_col = total_col + 1;

    for (row_idx, (brand, model)) in pivot.rows().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, brand)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &model.model_name)
            .map_err(|e| Error::Excel(e.to_string()))?;

        for col_idx in 0..pivot.columns.len() {
            sheet
                .write_number(row, (col_idx + 2) as u16, model.count_at(col_idx) as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }

        sheet
            .write_number(row, total_col, model.total as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;

        if let Some(note) = annotations.get(&model.model_name) {
            sheet
                .write_string(row, comment_col, note.to_cell())
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
    }

    sheet
        .set_column_width(1, 24)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(comment_col, 48)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_policy_sheet<'a, I>(sheet: &mut Worksheet, findings: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a PolicyFinding>,
{
    sheet
        .set_name("Policy Analysis")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let headers: Vec<String> = [
        "Brand",
        "Model",
        "End Year",
        "Segment",
        "Status",
        "Original",
        "Premium",
        "Standard",
        "Suggested Actions",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    write_headers(sheet, &headers)?;

    let mut written = 0;
    for (row_idx, finding) in findings.into_iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &finding.brand)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &finding.model_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        if let Some(year) = finding.year_to {
            sheet
                .write_number(row, 2, year as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        sheet
            .write_string(row, 3, finding.segment.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 4, finding.status.label())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 5, finding.mix.original as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 6, finding.mix.premium as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 7, finding.mix.standard as f64)
            .map_err(|e| Error::Excel(e.to_string()))?;

        let actions: Vec<String> = finding.actions.iter().map(|a| a.summary()).collect();
        sheet
            .write_string(row, 8, actions.join(" | "))
            .map_err(|e| Error::Excel(e.to_string()))?;

        written += 1;
    }

    sheet
        .set_column_width(8, 60)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(written)
}

fn write_annotations_sheet(
    sheet: &mut Worksheet,
    annotations: &BTreeMap<String, Annotation>,
) -> Result<()> {
    sheet
        .set_name("Model Tasks")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let headers: Vec<String> = ["Model", "Task", "Team", "Date"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    write_headers(sheet, &headers)?;

    for (row_idx, (model_name, note)) in annotations.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, model_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &note.text)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 2, &note.team)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 3, note.date.format("%Y-%m-%d").to_string())
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

fn write_uncovered_sheet(sheet: &mut Worksheet, uncovered: &[&FleetModel]) -> Result<()> {
    sheet
        .set_name("Uncovered")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let headers: Vec<String> = ["Brand", "Model", "From", "To", "Category", "Fleet"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    write_headers(sheet, &headers)?;

    for (row_idx, model) in uncovered.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        sheet
            .write_string(row, 0, &model.brand)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &model.model_name)
            .map_err(|e| Error::Excel(e.to_string()))?;
        if let Some(year) = model.year_from {
            sheet
                .write_number(row, 2, year as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        if let Some(year) = model.year_to {
            sheet
                .write_number(row, 3, year as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        sheet
            .write_string(row, 4, &model.priority_category)
            .map_err(|e| Error::Excel(e.to_string()))?;
        if let Some(size) = model.fleet_size {
            sheet
                .write_number(row, 5, size as f64)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
    }

    Ok(())
}
