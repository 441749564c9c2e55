use tracing::debug;

use crate::outcome::{Outcome, Payload, RankedProduct};
use crate::table::Table;

/// How many products the ranking keeps.
pub const TOP_N: usize = 5;

/// Best-selling products by total across every data column.
///
/// The question is not consulted. Ties keep report order. Always `Found`,
/// with an empty ranking for an empty table.
pub fn handle(table: &Table) -> Outcome {
    let mut ranking: Vec<RankedProduct> = table
        .rows()
        .iter()
        .map(|row| RankedProduct {
            product: row.product_name.clone(),
            total_sales: row.total(),
        })
        .collect();

    // sort_by is stable, so equal totals keep row order
    ranking.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    ranking.truncate(TOP_N);

    debug!(rows = table.len(), kept = ranking.len(), "top products");
    Outcome::Found(Payload::Ranking(ranking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::handlers::fixtures::table;
    use crate::table::PRODUCT_COLUMN;

    fn ranking(outcome: Outcome) -> Vec<(String, f64)> {
        match outcome {
            Outcome::Found(Payload::Ranking(r)) => {
                r.into_iter().map(|p| (p.product, p.total_sales)).collect()
            }
            other => panic!("expected ranking, got {other:?}"),
        }
    }

    #[test]
    fn test_keeps_top_five_descending() {
        let t = table(
            &["2021-07", "2021-08"],
            &[
                ("A", vec![1.0, 1.0]),
                ("B", vec![10.0, 0.0]),
                ("C", vec![3.0, 3.0]),
                ("D", vec![0.0, 0.0]),
                ("E", vec![50.0, 50.0]),
                ("F", vec![4.0, 0.5]),
                ("G", vec![2.0, 0.0]),
            ],
        );
        let got = ranking(handle(&t));
        assert_eq!(
            got,
            vec![
                ("E".to_string(), 100.0),
                ("B".to_string(), 10.0),
                ("C".to_string(), 6.0),
                ("F".to_string(), 4.5),
                ("A".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn test_ties_keep_row_order() {
        let t = table(
            &["2021-07"],
            &[("first", vec![5.0]), ("second", vec![5.0]), ("third", vec![9.0]), ("fourth", vec![5.0])],
        );
        let names: Vec<String> = ranking(handle(&t)).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["third", "first", "second", "fourth"]);
    }

    #[test]
    fn test_non_numeric_cells_count_as_zero() {
        let mut t = Table::new(PRODUCT_COLUMN, vec!["Region".into(), "2021-07".into()]);
        t.push_row("A", vec![CellValue::Text("North".into()), CellValue::Number(7.0)]).unwrap();
        t.push_row("B", vec![CellValue::Empty, CellValue::Text("n/a".into())]).unwrap();
        assert_eq!(ranking(handle(&t)), vec![("A".to_string(), 7.0), ("B".to_string(), 0.0)]);
    }

    #[test]
    fn test_fewer_rows_than_top_n() {
        let t = table(&["2021-07"], &[("only", vec![1.0])]);
        assert_eq!(ranking(handle(&t)).len(), 1);
    }

    #[test]
    fn test_empty_table_is_found_and_empty() {
        let t = table(&["2021-07"], &[]);
        assert_eq!(handle(&t), Outcome::Found(Payload::Ranking(vec![])));
    }
}
