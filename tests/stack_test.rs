#[cfg(test)]
mod tests {
    use reshapers::error::Result;
    use reshapers::{
        Column, ColumnType, DataFrame, Error, Float64Column, Int64Column, ReshapeConfig,
        StackOptions, StringColumn, UnifyPolicy, Value, NA,
    };

    fn powers() -> Result<DataFrame> {
        let mut df = DataFrame::new();
        df.add_column("x", Int64Column::new(vec![1, 2, 3, 4]))?;
        df.add_column("xsquare", Int64Column::new(vec![1, 4, 9, 16]))?;
        df.add_column("xcube", Int64Column::new(vec![1, 8, 27, 64]))?;
        df.with_keys(&["x"])
    }

    fn ints(values: &[i64]) -> Vec<NA<Value>> {
        values.iter().map(|&v| NA::Value(Value::Int64(v))).collect()
    }

    fn strs(values: &[&str]) -> Vec<NA<Value>> {
        values.iter().map(|&v| NA::Value(Value::from(v))).collect()
    }

    #[test]
    fn test_stack_powers() -> Result<()> {
        let stacked = powers()?.stack(&StackOptions::default())?;

        assert_eq!(stacked.column_names(), &["x", "variable", "value"]);
        assert_eq!(stacked.key_column_names(), &["x"]);
        assert_eq!(stacked.row_count(), 8);

        assert_eq!(stacked.column("x")?.values(), ints(&[1, 1, 2, 2, 3, 3, 4, 4]));
        assert_eq!(
            stacked.column("variable")?.values(),
            strs(&[
                "xsquare", "xcube", "xsquare", "xcube", "xsquare", "xcube", "xsquare", "xcube"
            ])
        );
        assert_eq!(
            stacked.column("value")?.values(),
            ints(&[1, 1, 4, 8, 9, 27, 16, 64])
        );
        Ok(())
    }

    #[test]
    fn test_stack_row_count_law() -> Result<()> {
        let df = powers()?;
        for select in [vec!["xsquare"], vec!["xcube", "xsquare"]] {
            let options = StackOptions {
                select: Some(select.iter().map(|s| s.to_string()).collect()),
                ..Default::default()
            };
            let stacked = df.stack(&options)?;
            assert_eq!(stacked.row_count(), df.row_count() * select.len());
        }
        Ok(())
    }

    #[test]
    fn test_stack_select_order_drives_label_order() -> Result<()> {
        let options = StackOptions {
            select: Some(vec!["xcube".to_string(), "xsquare".to_string()]),
            var_name: Some("power".to_string()),
            value_name: Some("result".to_string()),
            ..Default::default()
        };
        let stacked = powers()?.stack(&options)?;
        assert_eq!(stacked.column_names(), &["x", "power", "result"]);
        assert_eq!(
            stacked.column("power")?.get(0)?,
            NA::Value(Value::from("xcube"))
        );
        assert_eq!(stacked.column("result")?.get(2)?, NA::Value(Value::Int64(8)));
        Ok(())
    }

    #[test]
    fn test_stack_rekeys_when_by_differs() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("id", Int64Column::new(vec![1, 2]))?;
        df.add_column("name", StringColumn::from_strs(&["a", "b"]))?;
        df.add_column("score", Int64Column::new(vec![10, 20]))?;
        let df = df.with_keys(&["id"])?;

        let options = StackOptions {
            by: Some(vec!["name".to_string()]),
            ..Default::default()
        };
        let stacked = df.stack(&options)?;

        // "id" is no longer a key, so it is stacked together with "score".
        assert_eq!(stacked.column_names(), &["name", "variable", "value"]);
        assert_eq!(stacked.key_column_names(), &["name"]);
        assert_eq!(stacked.row_count(), 4);
        assert_eq!(
            stacked.column("variable")?.values(),
            strs(&["id", "score", "id", "score"])
        );
        assert_eq!(stacked.column("value")?.values(), ints(&[1, 10, 2, 20]));
        Ok(())
    }

    #[test]
    fn test_stack_widens_numeric_values() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("k", Int64Column::new(vec![1]))?;
        df.add_column("a", Int64Column::new(vec![2]))?;
        df.add_column("b", Float64Column::new(vec![0.5]))?;
        let df = df.with_keys(&["k"])?;

        let stacked = df.stack(&StackOptions::default())?;
        assert_eq!(stacked.column_type("value")?, ColumnType::Float64);
        assert_eq!(
            stacked.column("value")?.values(),
            vec![NA::Value(Value::Float64(2.0)), NA::Value(Value::Float64(0.5))]
        );

        let strict = ReshapeConfig {
            unify: UnifyPolicy::Strict,
            ..Default::default()
        };
        let err = df
            .stack_with_config(&StackOptions::default(), &strict)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        Ok(())
    }

    #[test]
    fn test_stack_rejects_incompatible_types() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("k", Int64Column::new(vec![1]))?;
        df.add_column("a", Int64Column::new(vec![2]))?;
        df.add_column("b", StringColumn::from_strs(&["two"]))?;
        let df = df.with_keys(&["k"])?;

        match df.stack(&StackOptions::default()) {
            Err(Error::TypeMismatch { expected, found, .. }) => {
                assert_eq!(expected, ColumnType::Int64);
                assert_eq!(found, ColumnType::String);
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_stack_invalid_column_sets() -> Result<()> {
        let df = powers()?;

        let overlapping = StackOptions {
            select: Some(vec!["x".to_string(), "xcube".to_string()]),
            ..Default::default()
        };
        assert!(matches!(df.stack(&overlapping), Err(Error::InvalidColumnSet(_))));

        let empty = StackOptions {
            select: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(df.stack(&empty), Err(Error::InvalidColumnSet(_))));

        let unknown = StackOptions {
            select: Some(vec!["nope".to_string()]),
            ..Default::default()
        };
        assert!(matches!(df.stack(&unknown), Err(Error::InvalidColumnSet(_))));

        let clashing_name = StackOptions {
            var_name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            df.stack(&clashing_name),
            Err(Error::InvalidColumnSet(_))
        ));

        // Every column is a key, so nothing is left to stack.
        let all_keys = df.clone().with_keys(&["x", "xsquare", "xcube"])?;
        assert!(matches!(
            all_keys.stack(&StackOptions::default()),
            Err(Error::InvalidColumnSet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_stack_drop_missing() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("k", Int64Column::new(vec![1, 2]))?;
        df.add_column("a", Int64Column::from_options(vec![Some(1), None]))?;
        df.add_column("b", Int64Column::from_options(vec![None, Some(4)]))?;
        let df = df.with_keys(&["k"])?;

        let kept = df.stack(&StackOptions::default())?;
        assert_eq!(kept.row_count(), 4);
        assert_eq!(kept.column("value")?.null_count(), 2);

        let dropped = df.stack(&StackOptions {
            drop_missing: true,
            ..Default::default()
        })?;
        assert_eq!(dropped.row_count(), 2);
        assert_eq!(dropped.column("k")?.values(), ints(&[1, 2]));
        assert_eq!(dropped.column("variable")?.values(), strs(&["a", "b"]));
        assert_eq!(dropped.column("value")?.values(), ints(&[1, 4]));
        Ok(())
    }

    #[test]
    fn test_stack_does_not_touch_input() -> Result<()> {
        let df = powers()?;
        let before = df.clone();
        let _ = df.stack(&StackOptions::default())?;
        assert_eq!(df, before);
        Ok(())
    }

    #[test]
    fn test_stack_without_keys() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("a", Int64Column::new(vec![1, 2]))?;
        df.add_column("b", Int64Column::new(vec![3, 4]))?;

        let stacked = df.stack(&StackOptions::default())?;
        assert_eq!(stacked.column_names(), &["variable", "value"]);
        assert_eq!(
            stacked.column("value")?,
            &Column::from(Int64Column::new(vec![1, 3, 2, 4]))
        );
        Ok(())
    }
}
