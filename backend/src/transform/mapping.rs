//! Column mapping between the SK and WP schemas.
//!
//! ```text
//! SK input                      WP output
//! ┌──────────────┐              ┌───────┬──────────┬──────────────┐
//! │ Name         │              │ ID    │ Name     │ Price        │
//! │ A            │   sk_to_wp   │ 20000 │ A        │ 9.99 (dflt)  │
//! │ B            │  ─────────▶  │ 20001 │ B        │ 9.99 (dflt)  │
//! └──────────────┘              └───────┴──────────┴──────────────┘
//! ```
//!
//! SK to WP regenerates `ID` and fills every WP column the input lacks from the
//! first row of the WP reference. WP to SK is a plain projection onto the SK
//! columns and never fills anything in.
//!
//! The two directions are not inverses: a round trip through WP replaces any
//! incoming IDs.

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::{ConvertError, ConvertResult};
use crate::models::{SchemaKind, Table, Value};

/// Name of the generated identifier column.
pub const ID_COLUMN: &str = "ID";

/// First ID assigned by [`sk_to_wp`].
pub const INITIAL_ID: i64 = 20000;

/// Convert an SK table to the WP schema, numbering rows from [`INITIAL_ID`].
pub fn sk_to_wp(sk: Table, wp_reference: &Table) -> ConvertResult<Table> {
    sk_to_wp_from(sk, wp_reference, INITIAL_ID)
}

/// Convert an SK table to the WP schema, numbering rows from `initial_id`.
///
/// Columns of `sk` that WP does not know are dropped. Fails when the reference
/// has no row to take defaults from.
pub fn sk_to_wp_from(mut sk: Table, wp_reference: &Table, initial_id: i64) -> ConvertResult<Table> {
    log_info("Converting SK → WP");

    let defaults = wp_reference
        .first_row()
        .ok_or(ConvertError::EmptyReference {
            schema: SchemaKind::Wp,
        })?;

    let last = last_id(initial_id, sk.len())?;
    // every ID up to `last` fits in i64
    sk.set_column_with(ID_COLUMN, |i| Value::Integer(initial_id + i as i64));
    match last {
        None => log_info_indent("No rows, no IDs assigned", 1),
        Some(last) => log_info_indent(format!("Assigned IDs {}..={}", initial_id, last), 1),
    }

    let mut filled = Vec::new();
    for (col, default) in wp_reference.columns().iter().zip(defaults) {
        if !sk.has_column(col) {
            sk.fill_column(col, default);
            filled.push(col.as_str());
        }
    }
    if !filled.is_empty() {
        log_info_indent(format!("Filled from defaults: {}", filled.join(", ")), 1);
    }

    let target = wp_columns(wp_reference);
    let dropped: Vec<&str> = sk
        .columns()
        .iter()
        .filter(|c| !target.contains(*c))
        .map(String::as_str)
        .collect();
    if !dropped.is_empty() {
        log_warning(format!("Dropping columns unknown to WP: {}", dropped.join(", ")));
    }

    let converted = sk.select(&target)?;
    log_success(format!(
        "{} rows × {} columns",
        converted.len(),
        converted.columns().len()
    ));
    Ok(converted)
}

/// Convert a WP table to the SK schema by keeping only the SK columns.
///
/// Fails with every SK column missing from `wp`.
pub fn wp_to_sk(wp: &Table, sk_reference: &Table) -> ConvertResult<Table> {
    log_info("Converting WP → SK");

    let converted = wp.select(sk_reference.columns())?;
    log_success(format!(
        "{} rows × {} columns",
        converted.len(),
        converted.columns().len()
    ));
    Ok(converted)
}

/// Last ID handed out to `rows` rows starting at `initial_id`.
fn last_id(initial_id: i64, rows: usize) -> ConvertResult<Option<i64>> {
    if rows == 0 {
        return Ok(None);
    }
    i64::try_from(rows - 1)
        .ok()
        .and_then(|offset| initial_id.checked_add(offset))
        .map(Some)
        .ok_or(ConvertError::IdOverflow { initial_id, rows })
}

/// WP output header: `ID` first, then the reference columns in order.
pub fn wp_columns(wp_reference: &Table) -> Vec<String> {
    std::iter::once(ID_COLUMN.to_string())
        .chain(
            wp_reference
                .columns()
                .iter()
                .filter(|c| c.as_str() != ID_COLUMN)
                .cloned(),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn wp_reference() -> Table {
        parse_str("ID,Name,Price\n1,X,9.99\n2,Y,5\n").unwrap()
    }

    #[test]
    fn test_sk_to_wp_scenario() {
        let sk = parse_str("Name\nA\nB\n").unwrap();
        let wp = sk_to_wp(sk, &wp_reference()).unwrap();

        assert_eq!(wp.columns(), ["ID", "Name", "Price"]);
        assert_eq!(
            wp.column("ID").unwrap(),
            vec![&Value::Integer(20000), &Value::Integer(20001)]
        );
        assert_eq!(
            wp.column("Name").unwrap(),
            vec![&Value::from("A"), &Value::from("B")]
        );
        assert_eq!(
            wp.column("Price").unwrap(),
            vec![&Value::Float(9.99), &Value::Float(9.99)]
        );
    }

    #[test]
    fn test_existing_ids_are_overwritten() {
        let sk = parse_str("Name,ID\nA,5\nB,6\nC,7\n").unwrap();
        let wp = sk_to_wp(sk, &wp_reference()).unwrap();

        assert_eq!(
            wp.column("ID").unwrap(),
            vec![&Value::Integer(20000), &Value::Integer(20001), &Value::Integer(20002)]
        );
    }

    #[test]
    fn test_input_values_win_over_defaults() {
        let sk = parse_str("Price,Name\n1.5,A\n").unwrap();
        let wp = sk_to_wp(sk, &wp_reference()).unwrap();

        assert_eq!(wp.columns(), ["ID", "Name", "Price"]);
        assert_eq!(wp.get(0, "Price"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_unknown_columns_dropped() {
        let sk = parse_str("Name,Colour\nA,red\n").unwrap();
        let wp = sk_to_wp(sk, &wp_reference()).unwrap();
        assert!(!wp.has_column("Colour"));
    }

    #[test]
    fn test_id_placed_first_when_reference_lacks_it() {
        let reference = parse_str("Name,Price\nX,1\n").unwrap();
        let wp = sk_to_wp(parse_str("Name\nA\n").unwrap(), &reference).unwrap();
        assert_eq!(wp.columns(), ["ID", "Name", "Price"]);
    }

    #[test]
    fn test_custom_initial_id() {
        let sk = parse_str("Name\nA\nB\n").unwrap();
        let wp = sk_to_wp_from(sk, &wp_reference(), 1).unwrap();
        assert_eq!(wp.get(1, ID_COLUMN), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_id_overflow_is_error() {
        let sk = parse_str("Name\nA\nB\n").unwrap();
        let err = sk_to_wp_from(sk, &wp_reference(), i64::MAX).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::IdOverflow { initial_id: i64::MAX, rows: 2 }
        ));
    }

    #[test]
    fn test_last_id_fits_at_upper_bound() {
        let sk = parse_str("Name\nA\n").unwrap();
        let wp = sk_to_wp_from(sk, &wp_reference(), i64::MAX).unwrap();
        assert_eq!(wp.get(0, ID_COLUMN), Some(&Value::Integer(i64::MAX)));
    }

    #[test]
    fn test_empty_input_keeps_header() {
        let sk = parse_str("Name\n").unwrap();
        let wp = sk_to_wp(sk, &wp_reference()).unwrap();
        assert!(wp.is_empty());
        assert_eq!(wp.columns(), ["ID", "Name", "Price"]);
    }

    #[test]
    fn test_empty_reference_is_error() {
        let reference = parse_str("ID,Name,Price\n").unwrap();
        let err = sk_to_wp(parse_str("Name\nA\n").unwrap(), &reference).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyReference { schema: SchemaKind::Wp }));
    }

    #[test]
    fn test_wp_to_sk_projects() {
        let wp = parse_str("ID,Name,Price\n20000,A,9.99\n20001,B,\n").unwrap();
        let sk_reference = parse_str("Name\nwhatever\n").unwrap();

        let sk = wp_to_sk(&wp, &sk_reference).unwrap();
        assert_eq!(sk.columns(), ["Name"]);
        assert_eq!(
            sk.column("Name").unwrap(),
            vec![&Value::from("A"), &Value::from("B")]
        );
    }

    #[test]
    fn test_wp_to_sk_follows_reference_order() {
        let wp = parse_str("Price,Name,SKU\n1,A,S1\n").unwrap();
        let sk_reference = parse_str("SKU,Name\n").unwrap();

        let sk = wp_to_sk(&wp, &sk_reference).unwrap();
        assert_eq!(sk.columns(), ["SKU", "Name"]);
        assert_eq!(sk.rows()[0], vec![Value::from("S1"), Value::from("A")]);
    }

    #[test]
    fn test_wp_to_sk_missing_column() {
        let wp = parse_str("ID,Name\n1,A\n").unwrap();
        let sk_reference = parse_str("Name,Stock\n").unwrap();

        let err = wp_to_sk(&wp, &sk_reference).unwrap_err();
        assert!(err.to_string().contains("Stock"));
    }

    #[test]
    fn test_round_trip_replaces_ids() {
        let sk_reference = parse_str("ID,Name\n").unwrap();
        let original = parse_str("ID,Name\n7,A\n").unwrap();

        let wp = sk_to_wp(original.clone(), &wp_reference()).unwrap();
        let back = wp_to_sk(&wp, &sk_reference).unwrap();

        assert_eq!(back.get(0, "Name"), original.get(0, "Name"));
        assert_ne!(back.get(0, "ID"), original.get(0, "ID"));
    }
}
