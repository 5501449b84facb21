use kinotop_models::MovieRecord;

/// Newest first. The sort is stable, so movies from the same year keep their ranking order.
pub fn sort_by_year_desc(records: &mut [MovieRecord]) {
    records.sort_by(|a, b| b.year.cmp(&a.year));
}
