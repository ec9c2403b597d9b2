use super::{ExportError, HEADERS, row_cells};
use crate::dtos::ExportRow;
use csv::{Terminator, WriterBuilder};

/// `;` nei valori diventa `,`, gli a capo diventano spazi
fn sanitize(value: &str) -> String {
    value
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace(';', ",")
}

/// CSV separato da `;` con terminatore CRLF
pub fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b';')
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;
    for row in rows {
        wtr.write_record(row_cells(row).iter().map(|c| sanitize(c)))?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolons_and_newlines_are_neutralised() {
        let rows = vec![ExportRow {
            id: Some(1),
            operator: Some("LUCA BIANCHI".to_string()),
            cantiere: Some("Bergamo; Nord".to_string()),
            ore: Some(7.0),
            descrizione: Some("Scavo\nlato est\r\nfine".to_string()),
            ..Default::default()
        }];
        let out = String::from_utf8(render_csv(&rows).unwrap()).unwrap();
        let lines: Vec<&str> = out.split("\r\n").collect();

        assert!(lines[0].starts_with("Operatore;Cantiere;Macchina;Linea;Ore;Data;Inizio;Fine"));
        assert!(lines[0].ends_with(";ID"));
        assert_eq!(
            lines[1],
            "LUCA BIANCHI;Bergamo, Nord;;;7.00;;;;;;Scavo lato est fine;;;;1"
        );
        assert_eq!(lines[2], "");
    }

    #[test]
    fn empty_export_has_only_header() {
        let out = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(out.matches("\r\n").count(), 1);
    }
}
