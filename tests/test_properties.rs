//! Property tests for row access laws.
//!
//! Run with: cargo test --test test_properties

use db_row_rs::{Error, RowCollection, RowConfig, RowImpl, RowType, RowView, Slot, Value};
use proptest::prelude::*;

/// Unique lower-case field names with matching values.
fn fields_and_values() -> impl Strategy<Value = (Vec<String>, Vec<i64>)> {
    prop::collection::hash_set("[a-z][a-z0-9_]{0,11}", 1..12).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let len = names.len();
        (Just(names), prop::collection::vec(any::<i64>(), len))
    })
}

fn row_impl() -> impl Strategy<Value = RowImpl> {
    prop_oneof![Just(RowImpl::Slots), Just(RowImpl::Records)]
}

proptest! {
    #[test]
    fn test_every_access_mode_agrees(
        (fields, values) in fields_and_values(),
        row_impl in row_impl(),
        case_insensitive in any::<bool>(),
    ) {
        let config = RowConfig::new()
            .with_row_impl(row_impl)
            .with_case_insensitive(case_insensitive);
        let row_type = RowType::with_config(&fields, &config).unwrap();
        let row = row_type.build(values.iter().copied().map(Value::from)).unwrap();

        for (i, field) in fields.iter().enumerate() {
            let expected = Value::Integer(values[i]);
            prop_assert_eq!(row.get_by_index(i).unwrap(), Some(&expected));
            prop_assert_eq!(row.get_by_name(field).unwrap(), Some(&expected));
            prop_assert_eq!(row.get_attr(field).unwrap(), Some(&expected));
            if case_insensitive {
                let upper = field.to_uppercase();
                prop_assert_eq!(row.get_attr(&upper).unwrap(), Some(&expected));
            }
        }
    }

    #[test]
    fn test_dict_round_trip((fields, values) in fields_and_values(), row_impl in row_impl()) {
        let config = RowConfig::new().with_row_impl(row_impl);
        let row_type = RowType::with_config(&fields, &config).unwrap();
        let row = row_type.build(values.iter().copied().map(Value::from)).unwrap();

        let dict = row.as_dict();
        let rebuilt: Vec<Slot> = fields.iter().map(|f| dict[f].clone()).collect();
        prop_assert_eq!(rebuilt, row.to_tuple());

        // Repeated reads without writes are stable
        prop_assert_eq!(row.keys(), row.keys());
        prop_assert_eq!(row.values(), row.values());
        prop_assert_eq!(row.items(), row.items());
    }

    #[test]
    fn test_short_rows_are_padded(
        (fields, values) in fields_and_values(),
        keep in 0usize..12,
    ) {
        let keep = keep.min(values.len());
        let row_type = RowType::with_config(&fields, &RowConfig::new()).unwrap();
        let row = row_type.build(values[..keep].iter().copied().map(Value::from)).unwrap();

        prop_assert_eq!(row.len(), fields.len());
        for (i, slot) in row.values().iter().enumerate() {
            prop_assert_eq!(slot.is_some(), i < keep);
        }
        let absent = row.items().iter().filter(|(_, v)| v.is_none()).count();
        prop_assert_eq!(absent, fields.len() - keep);
    }

    #[test]
    fn test_case_collisions_rejected(name in "[a-z]{1,8}") {
        let upper = name.to_uppercase();
        let config = RowConfig::new().with_case_insensitive(true);

        let result = RowType::with_config([name.as_str(), upper.as_str()], &config);
        let is_duplicate = matches!(result, Err(Error::DuplicateField { .. }));
        prop_assert!(is_duplicate);

        let sensitive = RowType::with_config([name.as_str(), upper.as_str()], &RowConfig::new());
        prop_assert!(sensitive.is_ok());
    }

    #[test]
    fn test_collection_get_caches_prefix(count in 0usize..20, index in 0usize..25) {
        let row_type = RowType::with_config(["n"], &RowConfig::new()).unwrap();
        let rows: Vec<_> = (0..count as i64)
            .map(|n| row_type.build([Value::from(n)]))
            .collect();
        let mut collection = RowCollection::new(rows);

        let result = collection
            .get(index)
            .map(|row| row.get_by_index(0).unwrap().cloned());
        match result {
            Ok(value) => {
                prop_assert_eq!(value, Some(Value::Integer(index as i64)));
                prop_assert_eq!(collection.len(), index + 1);
            }
            Err(Error::IndexOutOfRange { len, .. }) => {
                prop_assert!(index >= count);
                prop_assert_eq!(len, count);
                prop_assert!(!collection.is_pending());
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}
