use super::*;
use crate::fake::{FakeDocument, FakeImageFetcher, FakePage};
use crate::progress::NoProgress;
use kinotop_models::MovieRecord;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

const GREEN_MILE: &str = "https://www.kinopoisk.ru/film/435/";
const SHAWSHANK: &str = "https://www.kinopoisk.ru/film/326/";

fn config(image_dir: PathBuf) -> DetailConfig {
    DetailConfig {
        image_dir,
        ..DetailConfig::default()
    }
}

fn detail_page(poster: &str, rating: &str, heading: &str, description: &str) -> FakeDocument {
    FakeDocument::new()
        .with_attribute(".film-poster", "src", poster)
        .with_text(".styles_ratingKpTop__84afd", rating)
        .with_text("h1", heading)
        .with_text(".styles_paragraph__wEGPz", description)
}

fn green_mile() -> FakeDocument {
    detail_page(
        "//avatars.mds.yandex.net/get-kinopoisk-image/435/poster",
        "9.1",
        "Зеленая миля (1999)",
        "Пол Эджкомб начальник блока смертников в тюрьме «Холодная гора».",
    )
    .with_text(".styles_linkLight__cha3C", "1999")
}

fn shawshank() -> FakeDocument {
    detail_page(
        "https://avatars.mds.yandex.net/get-kinopoisk-image/326/poster",
        "9.1",
        "Побег из Шоушенка (1994)",
        "Бухгалтер Энди Дюфрейн обвинён в убийстве собственной жены.",
    )
    .with_text(".styles_linkDark__7m929", "1994")
}

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<(usize, usize, String)>>,
}

impl ProgressObserver for RecordingObserver {
    fn movie_extracted(&self, current: usize, total: usize, record: &MovieRecord) {
        self.seen.lock().unwrap().push((current, total, record.title.clone()));
    }
}

#[test]
fn test_parse_title_cuts_at_parenthesis() {
    assert_eq!(parse_title("Зеленая миля (1999)"), "Зеленая миля");
    assert_eq!(parse_title("Начало"), "Начало");
    assert_eq!(parse_title("Список Шиндлера (Schindler's List) (1993)"), "Список Шиндлера");
}

#[test]
fn test_parse_year() {
    assert_eq!(parse_year("1999", GREEN_MILE).unwrap(), 1999);
    assert_eq!(parse_year(" 2010\n", GREEN_MILE).unwrap(), 2010);
    assert!(matches!(
        parse_year("1999–2003", GREEN_MILE),
        Err(ScrapeError::InvalidYear { .. })
    ));
    assert!(parse_year("", GREEN_MILE).is_err());
}

#[tokio::test]
async fn test_extract_movie_reads_all_fields() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().join("img"));
    let page = FakePage::new().with_page(GREEN_MILE, green_mile());
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);

    let record = extractor
        .extract_movie(&MovieLink::new(GREEN_MILE, 1), 0)
        .await
        .unwrap();

    assert_eq!(record.image_path, dir.path().join("img").join("0.png"));
    assert_eq!(record.rating, "9.1");
    assert_eq!(record.title, "Зеленая миля");
    assert!(record.description.starts_with("Пол Эджкомб"));
    assert_eq!(record.year, 1999);
    assert!(record.image_path.exists());

    let fetched = fetcher.fetched();
    assert_eq!(
        fetched[0].0,
        "https://avatars.mds.yandex.net/get-kinopoisk-image/435/poster"
    );
}

#[tokio::test]
async fn test_year_falls_back_to_dark_link() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new().with_page(SHAWSHANK, shawshank());
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);

    let record = extractor
        .extract_movie(&MovieLink::new(SHAWSHANK, 1), 3)
        .await
        .unwrap();

    assert_eq!(record.year, 1994);
    assert_eq!(record.image_path, dir.path().join("3.png"));
}

#[tokio::test]
async fn test_missing_both_year_elements_fails() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new().with_page(
        GREEN_MILE,
        detail_page("/poster.jpg", "9.1", "Зеленая миля (1999)", "..."),
    );
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);

    let err = extractor
        .extract_movie(&MovieLink::new(GREEN_MILE, 1), 0)
        .await
        .unwrap_err();

    match err {
        ScrapeError::MissingElement { selector, .. } => {
            assert_eq!(selector, ".styles_linkDark__7m929")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_primary_year_wins_over_fallback() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new().with_page(
        GREEN_MILE,
        green_mile().with_text(".styles_linkDark__7m929", "2000"),
    );
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);

    let record = extractor
        .extract_movie(&MovieLink::new(GREEN_MILE, 1), 0)
        .await
        .unwrap();
    assert_eq!(record.year, 1999);
}

#[tokio::test]
async fn test_missing_poster_fails_before_download() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new().with_page(
        GREEN_MILE,
        FakeDocument::new()
            .with_text(".styles_ratingKpTop__84afd", "9.1")
            .with_text("h1", "Зеленая миля (1999)"),
    );
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);

    let err = extractor
        .extract_movie(&MovieLink::new(GREEN_MILE, 1), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::MissingElement { .. }));
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn test_extract_all_numbers_images_sequentially() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new()
        .with_page(GREEN_MILE, green_mile())
        .with_page(SHAWSHANK, shawshank());
    let fetcher = FakeImageFetcher::new();
    let pacer = Pacer::none();
    let observer = RecordingObserver::default();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);
    let links = vec![MovieLink::new(GREEN_MILE, 1), MovieLink::new(SHAWSHANK, 1)];

    let records = extractor.extract_all(&links, &observer).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].image_path, dir.path().join("0.png"));
    assert_eq!(records[1].image_path, dir.path().join("1.png"));
    assert_eq!(records[1].title, "Побег из Шоушенка");
    assert_eq!(
        *observer.seen.lock().unwrap(),
        vec![
            (1, 2, "Зеленая миля".to_string()),
            (2, 2, "Побег из Шоушенка".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_extract_all_stops_on_download_failure() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_path_buf());
    let page = FakePage::new()
        .with_page(GREEN_MILE, green_mile())
        .with_page(SHAWSHANK, shawshank());
    let fetcher = FakeImageFetcher::new()
        .failing_on("https://avatars.mds.yandex.net/get-kinopoisk-image/435/poster");
    let pacer = Pacer::none();
    let extractor = DetailExtractor::new(&page, &config, &fetcher, &pacer);
    let links = vec![MovieLink::new(GREEN_MILE, 1), MovieLink::new(SHAWSHANK, 1)];

    let err = extractor.extract_all(&links, &NoProgress).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Io(_)));
    assert_eq!(page.visited(), vec![GREEN_MILE.to_string()]);
    assert_eq!(page.captures(), vec!["detail_0".to_string()]);
}
