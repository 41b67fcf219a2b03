#[cfg(test)]
mod tests {
    use reshapers::error::Result;
    use reshapers::{
        ColumnType, DataFrame, DummyOptions, Error, Int64Column, LabelOrder, ReshapeConfig,
        StringColumn, UInt8Column, Value, NA,
    };

    fn sample() -> Result<DataFrame> {
        let mut df = DataFrame::new();
        df.add_column("x", Int64Column::new(vec![1, 4, 9, 16]))?;
        df.add_column("y", StringColumn::from_strs(&["val1", "val1", "val2", "val2"]))?;
        df.with_keys(&["x"])
    }

    fn flags(values: &[u8]) -> Vec<NA<Value>> {
        values.iter().map(|&v| NA::Value(Value::UInt8(v))).collect()
    }

    #[test]
    fn test_create_dummies_discovers_categories() -> Result<()> {
        let df = sample()?;
        let encoded = df.create_dummies(&DummyOptions::column("y"))?;

        assert_eq!(encoded.column_names(), &["x", "y_val1", "y_val2"]);
        assert_eq!(encoded.row_count(), 4);
        assert_eq!(encoded.column_type("y_val1")?, ColumnType::UInt8);
        assert_eq!(encoded.column("y_val1")?.values(), flags(&[1, 1, 0, 0]));
        assert_eq!(encoded.column("y_val2")?.values(), flags(&[0, 0, 1, 1]));
        assert_eq!(encoded.column("x")?, df.column("x")?);
        Ok(())
    }

    #[test]
    fn test_create_dummies_with_supplied_categories() -> Result<()> {
        let options = DummyOptions::column("y").with_categories("y", vec!["val1"]);
        let encoded = sample()?.create_dummies(&options)?;

        assert_eq!(encoded.column_names(), &["x", "y_val1"]);
        assert_eq!(encoded.column("y_val1")?.values(), flags(&[1, 1, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_unseen_category_gives_zero_column() -> Result<()> {
        let options = DummyOptions::column("y").with_categories("y", vec!["val3", "val2"]);
        let encoded = sample()?.create_dummies(&options)?;

        assert_eq!(encoded.column_names(), &["x", "y_val3", "y_val2"]);
        assert_eq!(encoded.column("y_val3")?.values(), flags(&[0, 0, 0, 0]));
        assert_eq!(encoded.column("y_val2")?.values(), flags(&[0, 0, 1, 1]));
        Ok(())
    }

    #[test]
    fn test_column_count_law() -> Result<()> {
        let df = sample()?;
        let distinct = df.value_counts("y")?.len();
        let encoded = df.create_dummies(&DummyOptions::column("y"))?;
        assert_eq!(encoded.column_count(), df.column_count() - 1 + distinct);
        Ok(())
    }

    #[test]
    fn test_second_pass_on_removed_column_fails() -> Result<()> {
        let df = sample()?;
        let options = DummyOptions::column("y");
        let once = df.create_dummies(&options)?;
        assert!(matches!(
            once.create_dummies(&options),
            Err(Error::InvalidColumnSet(_))
        ));

        // Fresh input with the same options is deterministic.
        assert_eq!(df.create_dummies(&options)?, once);
        Ok(())
    }

    #[test]
    fn test_unknown_column_fails() -> Result<()> {
        assert!(matches!(
            sample()?.create_dummies(&DummyOptions::column("nope")),
            Err(Error::InvalidColumnSet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_multiple_columns_left_to_right() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("id", Int64Column::new(vec![1, 2, 3]))?;
        df.add_column("color", StringColumn::from_strs(&["red", "blue", "red"]))?;
        df.add_column("size", UInt8Column::new(vec![2, 1, 2]))?;

        let encoded = df.create_dummies(&DummyOptions::new(&["color", "size"]))?;
        assert_eq!(
            encoded.column_names(),
            &["id", "color_red", "color_blue", "size_2", "size_1"]
        );
        assert_eq!(encoded.column("size_1")?.values(), flags(&[0, 1, 0]));
        Ok(())
    }

    #[test]
    fn test_key_column_can_be_encoded() -> Result<()> {
        let encoded = sample()?.create_dummies(&DummyOptions::column("x"))?;
        assert!(encoded.key_column_names().is_empty());
        assert_eq!(
            encoded.column_names(),
            &["y", "x_1", "x_4", "x_9", "x_16"]
        );
        Ok(())
    }

    #[test]
    fn test_missing_values_are_not_a_category() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column(
            "grade",
            StringColumn::from_options(vec![Some("b".to_string()), None, Some("a".to_string())]),
        )?;

        let config = ReshapeConfig {
            category_order: LabelOrder::Lexicographic,
            dummy_separator: "=".to_string(),
            ..Default::default()
        };
        let encoded = df.create_dummies_with_config(&DummyOptions::column("grade"), &config)?;
        assert_eq!(encoded.column_names(), &["grade=a", "grade=b"]);
        assert_eq!(encoded.column("grade=a")?.values(), flags(&[0, 0, 1]));
        assert_eq!(encoded.column("grade=b")?.values(), flags(&[1, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_numeric_categories_match_after_widening() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("level", UInt8Column::new(vec![1, 2, 1]))?;

        let options = DummyOptions::column("level").with_categories("level", vec![1i64]);
        let encoded = df.create_dummies(&options)?;
        assert_eq!(encoded.column("level_1")?.values(), flags(&[1, 0, 1]));
        Ok(())
    }

    #[test]
    fn test_narrow_category_matches_wider_column() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("level", Int64Column::new(vec![1, 2, 1]))?;

        let options = DummyOptions::column("level").with_categories("level", vec![1u8]);
        let encoded = df.create_dummies(&options)?;
        assert_eq!(encoded.column("level_1")?.values(), flags(&[1, 0, 1]));
        Ok(())
    }

    #[test]
    fn test_indicator_name_clashing_with_value_column_fails() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("x", Int64Column::new(vec![1, 2]))?;
        df.add_column("y", StringColumn::from_strs(&["a", "b"]))?;
        df.add_column("y_a", Int64Column::new(vec![100, 200]))?;
        let df = df.with_keys(&["x"])?;

        match df.create_dummies(&DummyOptions::column("y")) {
            Err(Error::InvalidColumnSet(msg)) => assert!(msg.contains("y_a")),
            other => panic!("expected InvalidColumnSet, got {:?}", other),
        }
        assert_eq!(
            df.column("y_a")?.values(),
            vec![NA::Value(Value::Int64(100)), NA::Value(Value::Int64(200))]
        );
        Ok(())
    }

    #[test]
    fn test_indicator_name_clashing_with_key_column_fails() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("y_b", Int64Column::new(vec![1, 2]))?;
        df.add_column("y", StringColumn::from_strs(&["a", "b"]))?;
        let df = df.with_keys(&["y_b"])?;

        assert!(matches!(
            df.create_dummies(&DummyOptions::column("y")),
            Err(Error::InvalidColumnSet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_repeated_supplied_categories_fail() -> Result<()> {
        let options = DummyOptions::column("y").with_categories("y", vec!["val1", "val1"]);
        assert!(matches!(
            sample()?.create_dummies(&options),
            Err(Error::InvalidColumnSet(_))
        ));
        Ok(())
    }

    #[test]
    fn test_indicator_may_reuse_encoded_column_name() -> Result<()> {
        let mut df = DataFrame::new();
        df.add_column("id", Int64Column::new(vec![1, 2]))?;
        df.add_column("y", StringColumn::from_strs(&["a", "b"]))?;

        let config = ReshapeConfig {
            dummy_separator: String::new(),
            ..Default::default()
        };
        let options = DummyOptions::column("y").with_categories("y", vec![""]);
        let encoded = df.create_dummies_with_config(&options, &config)?;
        assert_eq!(encoded.column_names(), &["id", "y"]);
        assert_eq!(encoded.column("y")?.values(), flags(&[0, 0]));
        Ok(())
    }
}
