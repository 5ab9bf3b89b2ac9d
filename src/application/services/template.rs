//! Template export: a downloadable sample artifact for the importer.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::COLUMN_HEADER;

/// Supported template encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Csv,
    Xlsx,
}

/// A rendered template ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct TemplateArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Sample rows: one root, a group level, and leaves, two levels deep.
pub const SAMPLE_ROWS: [[&str; 4]; 5] = [
    ["ROOT001", "Main Cost Center", "", "1"],
    ["SALES001", "Sales", "ROOT001", "1"],
    ["SALES-IT", "Sales Italy", "SALES001", "0"],
    ["SALES-EU", "Sales Europe", "SALES001", "0"],
    ["ADMIN001", "Administration", "ROOT001", "0"],
];

/// Renders import templates.
#[derive(Debug, Default)]
pub struct TemplateService;

impl TemplateService {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, format: TemplateFormat) -> ApplicationResult<TemplateArtifact> {
        match format {
            TemplateFormat::Csv => self.render_csv(),
            // Spreadsheet encoding is a collaborator this build does not
            // carry; same seam as spreadsheet decoding on import
            TemplateFormat::Xlsx => Err(ApplicationError::UnsupportedFormat {
                extension: "xlsx".to_string(),
            }),
        }
    }

    fn render_csv(&self) -> ApplicationResult<TemplateArtifact> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(COLUMN_HEADER)
            .and_then(|()| {
                SAMPLE_ROWS
                    .iter()
                    .try_for_each(|row| writer.write_record(row))
            })
            .map_err(|e| ApplicationError::OperationFailed {
                context: "render csv template".to_string(),
                source: Box::new(e),
            })?;

        let bytes = writer
            .into_inner()
            .map_err(|e| ApplicationError::OperationFailed {
                context: "flush csv template".to_string(),
                source: Box::new(e),
            })?;

        Ok(TemplateArtifact {
            filename: "cost_center_importer_template.csv".to_string(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_template_has_header_and_sample_rows() {
        let artifact = TemplateService::new().render(TemplateFormat::Csv).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "ID,Cost Center Name,Parent Cost Center,Is Group");
        assert_eq!(lines[1], "ROOT001,Main Cost Center,,1");
    }

    #[test]
    fn xlsx_template_is_refused() {
        let err = TemplateService::new().render(TemplateFormat::Xlsx).unwrap_err();
        assert!(matches!(err, ApplicationError::UnsupportedFormat { .. }));
    }
}
