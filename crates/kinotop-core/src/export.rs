use kinotop_config::ExportConfig;
use kinotop_models::{MovieRecord, COLUMNS};
use rust_xlsxwriter::{Format, Image, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("cannot embed poster {path:?}: {source}")]
    Poster {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write the header row and one row per record to a single-sheet workbook.
///
/// Returns the number of rows written, header included.
pub fn write_workbook(records: &[MovieRecord], path: &Path, config: &ExportConfig) -> Result<u32, ExportError> {
    let mut workbook = Workbook::new();
    let wrap = Format::new().set_text_wrap();
    let worksheet = workbook.add_worksheet();

    for (col, label) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *label)?;
    }
    for (col, width) in config.column_widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let mut row: u32 = 1;
    for record in records {
        worksheet.set_row_height(row, config.row_height)?;

        // The path text sits under the picture, same as the image column of the source data
        let image_text = record.image_path.to_string_lossy().to_string();
        worksheet.write_string_with_format(row, 0, image_text, &wrap)?;
        let image = scaled_poster(record.image_path(), config)?;
        worksheet.insert_image(row, 0, &image)?;

        worksheet.write_string_with_format(row, 1, &record.rating, &wrap)?;
        worksheet.write_string_with_format(row, 2, &record.title, &wrap)?;
        worksheet.write_string_with_format(row, 3, &record.description, &wrap)?;
        worksheet.write_number_with_format(row, 4, f64::from(record.year), &wrap)?;

        debug!("Row {}: {}", row + 1, record.title);
        row += 1;
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    workbook.save(path)?;
    info!("Saved {} movies to {:?}", records.len(), path);

    Ok(row)
}

fn scaled_poster(path: &Path, config: &ExportConfig) -> Result<Image, ExportError> {
    let poster_err = |source| ExportError::Poster {
        path: path.to_path_buf(),
        source,
    };
    let image = Image::new(path).map_err(poster_err)?;
    let scale_width = f64::from(config.image_width) / image.width();
    let scale_height = f64::from(config.image_height) / image.height();
    Ok(image.set_scale_width(scale_width).set_scale_height(scale_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use image::{ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn poster(dir: &Path, index: usize) -> PathBuf {
        let path = dir.join(format!("{}.png", index));
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(20, 30, Rgb([10, 20, 30]));
        img.save(&path).unwrap();
        path
    }

    fn records(dir: &Path) -> Vec<MovieRecord> {
        vec![
            MovieRecord::new(poster(dir, 0), "8.8", "Начало", "Кобб - талантливый вор.", 2010),
            MovieRecord::new(poster(dir, 1), "9.1", "Зеленая миля", "Пол Эджкомб...", 1999),
            MovieRecord::new(poster(dir, 2), "8.7", "Список Шиндлера", "Фильм рассказывает...", 1993),
        ]
    }

    #[test]
    fn test_one_row_per_record_plus_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FilmList1.xlsx");
        let records = records(dir.path());

        let rows = write_workbook(&records, &path, &ExportConfig::default()).unwrap();
        assert_eq!(rows, 4);

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.height(), 4);
        assert_eq!(range.width(), 5);

        let header: Vec<String> = (0..5)
            .map(|c| range.get_value((0, c)).unwrap().to_string())
            .collect();
        assert_eq!(header, vec!["Preview", "Rating", "Name", "Description", "Year"]);

        assert_eq!(
            range.get_value((2, 2)),
            Some(&Data::String("Зеленая миля".to_string()))
        );
        assert_eq!(range.get_value((2, 4)), Some(&Data::Float(1999.0)));
        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String(records[0].image_path.to_string_lossy().to_string()))
        );
    }

    #[test]
    fn test_empty_records_write_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("empty.xlsx");

        let rows = write_workbook(&[], &path, &ExportConfig::default()).unwrap();
        assert_eq!(rows, 1);

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        assert_eq!(range.height(), 1);
    }

    #[test]
    fn test_missing_poster_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("FilmList1.xlsx");
        let records = vec![MovieRecord::new(dir.path().join("nope.png"), "9.0", "X", "", 2000)];

        let err = write_workbook(&records, &path, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Poster { .. }));
        assert!(!path.exists());
    }
}
