use super::{ExportError, HEADERS, row_cells};
use crate::dtos::ExportRow;
use rust_xlsxwriter::{Format, FormatBorder, Workbook};

const COLUMN_WIDTHS: [f64; 15] = [
    24.0, 24.0, 18.0, 14.0, 10.0, 14.0, 10.0, 10.0, 12.0, 18.0, 40.0, 30.0, 30.0, 30.0, 10.0,
];

/// Foglio "Report" con intestazione in grassetto bloccata
pub fn render_xlsx(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Report")?;

    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, row) in rows.iter().enumerate() {
        let line = (index + 1) as u32;
        for (col, value) in row_cells(row).iter().enumerate() {
            if !value.is_empty() {
                worksheet.write(line, col as u16, value.as_str())?;
            }
        }
    }

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    Ok(workbook.save_to_buffer()?)
}
