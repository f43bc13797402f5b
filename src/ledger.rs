//! The sales ledger: one record per (book, month) pair.

use std::collections::HashMap;

use crate::models::{new_id, Book, ParsedRow, SalesRecord};
use crate::rows::normalize_title;

/// Parsed rows rolled up by (book, month). Rows whose title key matches no
/// catalog book are dropped here; reconciliation runs before this.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSale {
    pub book_id: String,
    pub month: String,
    pub units: i64,
    pub royalty: f64,
}

pub fn aggregate_rows(rows: &[ParsedRow], books: &[Book]) -> Vec<AggregatedSale> {
    let title_to_book: HashMap<String, &str> = books
        .iter()
        .map(|b| (normalize_title(&b.title), b.id.as_str()))
        .collect();

    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut grouped: Vec<AggregatedSale> = Vec::new();
    for row in rows {
        let Some(book_id) = title_to_book.get(&row.title_key) else {
            continue;
        };
        let key = (book_id.to_string(), row.month.clone());
        if let Some(&i) = index.get(&key) {
            grouped[i].units += row.units;
            grouped[i].royalty += row.royalty;
        } else {
            index.insert(key, grouped.len());
            grouped.push(AggregatedSale {
                book_id: book_id.to_string(),
                month: row.month.clone(),
                units: row.units,
                royalty: row.royalty,
            });
        }
    }
    grouped
}

/// Fold aggregated sales into the ledger. Existing (book, month) cells
/// accumulate units and royalty and remember the contributing import;
/// missing cells are appended. Cells are never replaced, so re-importing
/// overlapping months adds on top, which is why duplicate detection runs
/// before this point.
pub fn merge_sales(sales: &mut Vec<SalesRecord>, aggregated: &[AggregatedSale], import_hash: &str) {
    let index: HashMap<(String, String), usize> = sales
        .iter()
        .enumerate()
        .map(|(i, s)| ((s.book_id.clone(), s.month.clone()), i))
        .collect();

    for agg in aggregated {
        let key = (agg.book_id.clone(), agg.month.clone());
        if let Some(&i) = index.get(&key) {
            let record = &mut sales[i];
            record.units += agg.units;
            record.royalty += agg.royalty;
            if !record.source_imports.iter().any(|h| h == import_hash) {
                record.source_imports.push(import_hash.to_string());
            }
        } else {
            sales.push(SalesRecord {
                id: new_id(),
                book_id: agg.book_id.clone(),
                month: agg.month.clone(),
                units: agg.units,
                royalty: agg.royalty,
                source_imports: vec![import_hash.to_string()],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, month: &str, units: i64, royalty: f64) -> ParsedRow {
        ParsedRow {
            source_title: title.to_string(),
            title_key: normalize_title(title),
            units,
            royalty,
            month: month.to_string(),
        }
    }

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            series: String::new(),
            niche: "Cooking".to_string(),
            format: "Paperback".to_string(),
            publish_date: "2024-01-01".to_string(),
            design_cost: 0.0,
            marketing_cost: 0.0,
        }
    }

    fn record(book_id: &str, month: &str, units: i64, royalty: f64) -> SalesRecord {
        SalesRecord {
            id: format!("s-{book_id}-{month}"),
            book_id: book_id.to_string(),
            month: month.to_string(),
            units,
            royalty,
            source_imports: vec!["111".to_string()],
        }
    }

    #[test]
    fn test_aggregate_rows_groups_by_book_and_month() {
        let books = vec![book("b1", "Sourdough for Beginners"), book("b2", "Night Runs")];
        let rows = vec![
            row("Sourdough for Beginners", "2024-01", 3, 12.5),
            row("sourdough FOR beginners", "2024-01", 2, 8.0),
            row("Sourdough for Beginners", "2024-02", 1, 4.0),
            row("Night Runs", "2024-01", 5, 20.0),
            row("Unknown Book", "2024-01", 9, 99.0),
        ];

        let grouped = aggregate_rows(&rows, &books);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].book_id, "b1");
        assert_eq!(grouped[0].month, "2024-01");
        assert_eq!(grouped[0].units, 5);
        assert_eq!(grouped[0].royalty, 20.5);
        assert_eq!(grouped[1].month, "2024-02");
        assert_eq!(grouped[2].book_id, "b2");
    }

    #[test]
    fn test_aggregate_rows_drops_unmatched() {
        let grouped = aggregate_rows(&[row("Ghost", "2024-01", 1, 1.0)], &[]);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_merge_sales_accumulates_existing_cell() {
        let mut sales = vec![record("b1", "2024-01", 3, 12.5)];
        let aggregated = vec![AggregatedSale {
            book_id: "b1".to_string(),
            month: "2024-01".to_string(),
            units: 2,
            royalty: 8.0,
        }];

        merge_sales(&mut sales, &aggregated, "222");
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].units, 5);
        assert_eq!(sales[0].royalty, 20.5);
        assert_eq!(sales[0].source_imports, vec!["111", "222"]);
    }

    #[test]
    fn test_merge_sales_appends_new_cell() {
        let mut sales = vec![record("b1", "2024-01", 3, 12.5)];
        let aggregated = vec![AggregatedSale {
            book_id: "b1".to_string(),
            month: "2024-02".to_string(),
            units: 1,
            royalty: 4.0,
        }];

        merge_sales(&mut sales, &aggregated, "222");
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[1].month, "2024-02");
        assert_eq!(sales[1].source_imports, vec!["222"]);
        assert!(!sales[1].id.is_empty());
    }

    #[test]
    fn test_merge_sales_does_not_duplicate_import_hash() {
        let mut sales = vec![record("b1", "2024-01", 3, 12.5)];
        let aggregated = vec![AggregatedSale {
            book_id: "b1".to_string(),
            month: "2024-01".to_string(),
            units: 1,
            royalty: 1.0,
        }];

        merge_sales(&mut sales, &aggregated, "111");
        assert_eq!(sales[0].source_imports, vec!["111"]);
        assert_eq!(sales[0].units, 4);
    }
}
