//! Pure views over the dataset: groups, pages of a group, tracks of a page.

use super::model::{DatasetRow, PageEntry, Track};

/// Ordered tracks for `(group, page)`, in dataset order.
pub fn tracks_for(rows: &[DatasetRow], group: &str, page: &str) -> Vec<Track> {
    rows.iter()
        .filter(|r| r.group.trim() == group.trim() && r.page.trim() == page.trim())
        .map(|r| Track::new(r.title.clone(), r.url.clone()))
        .collect()
}

/// Distinct pages of `group` in first-seen order; the first label seen for a page wins.
///
/// Rows whose page is not an integer have no selector entry.
pub fn pages_for(rows: &[DatasetRow], group: &str) -> Vec<PageEntry> {
    let mut pages: Vec<PageEntry> = Vec::new();
    for r in rows.iter().filter(|r| r.group.trim() == group.trim()) {
        let Ok(number) = r.page.trim().parse::<u32>() else {
            continue;
        };
        if !pages.iter().any(|p| p.number == number) {
            pages.push(PageEntry {
                number,
                label: r.page_title.clone(),
            });
        }
    }
    pages
}

/// Distinct group ids in first-seen order.
pub fn groups(rows: &[DatasetRow]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in rows {
        let g = r.group.trim();
        if !g.is_empty() && !out.iter().any(|x| x == g) {
            out.push(g.to_string());
        }
    }
    out
}
