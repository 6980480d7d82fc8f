//! Property-based tests for the insert/select round trips
//!
//! These tests verify that:
//! - A row inserted with `insert_one` is read back unchanged by its rowid
//! - A batch inserted with `insert_many` is read back unchanged and in order
//! - A rejected duplicate leaves the table untouched

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sqlite_exec::{create_table, insert_many, insert_one, row, select_many, select_one, Row, Value};
    use tempfile::TempDir;

    const CREATE_PEOPLE: &str = "CREATE TABLE IF NOT EXISTS people (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER,
        score REAL,
        avatar BLOB
    )";

    const INSERT_PEOPLE: &str = "INSERT INTO people (name, age, score, avatar) VALUES (?1, ?2, ?3, ?4)";

    // Test infrastructure

    fn arb_name() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9 _'-]{0,29}".prop_map(|s: String| s)
    }

    /// Finite reals only: NaN is stored as NULL by SQLite
    fn arb_score() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            (-1.0e9f64..1.0e9f64).prop_map(Value::Real),
        ]
    }

    fn arb_avatar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Blob),
        ]
    }

    fn arb_person() -> impl Strategy<Value = Row> {
        (arb_name(), prop::option::of(any::<i64>()), arb_score(), arb_avatar())
            .prop_map(|(name, age, score, avatar)| row![name, age, score, avatar])
    }

    fn people_db() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.db");
        create_table(&path, CREATE_PEOPLE).unwrap();
        (dir, path)
    }

    // Property tests

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// A single inserted row is found again by the rowid insert_one returned
        #[test]
        fn prop_insert_one_round_trips(person in arb_person()) {
            let (_dir, path) = people_db();

            let id = insert_one(&path, INSERT_PEOPLE, &person).unwrap();
            let fetched = select_one(&path, "SELECT * FROM people WHERE id = ?", &row![id])
                .unwrap()
                .expect("row should exist");

            prop_assert_eq!(&fetched[0], &Value::Integer(id));
            prop_assert_eq!(&fetched[1..], &person[..]);
        }

        /// A batch comes back in insertion order with identical trailing columns
        #[test]
        fn prop_insert_many_preserves_order(people in prop::collection::vec(arb_person(), 1..20)) {
            let (_dir, path) = people_db();

            let last_id = insert_many(&path, INSERT_PEOPLE, &people).unwrap();
            prop_assert_eq!(last_id, Some(people.len() as i64));

            let fetched = select_many(&path, "SELECT * FROM people", &[]).unwrap();
            let tails: Vec<Row> = fetched.iter().map(|r| r[1..].to_vec()).collect();
            prop_assert_eq!(tails, people);
        }

        /// A primary key collision is rejected and the table keeps its rows
        #[test]
        fn prop_duplicate_key_leaves_table_unchanged(
            people in prop::collection::vec(arb_person(), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let (_dir, path) = people_db();
            insert_many(&path, INSERT_PEOPLE, &people).unwrap();
            let before = select_many(&path, "SELECT * FROM people", &[]).unwrap();

            let existing_id = pick.index(people.len()) as i64 + 1;
            let err = insert_one(
                &path,
                "INSERT INTO people (id, name) VALUES (?, ?)",
                &row![existing_id, "duplicate"],
            )
            .unwrap_err();
            prop_assert!(err.is_constraint());

            let after = select_many(&path, "SELECT * FROM people", &[]).unwrap();
            prop_assert_eq!(before, after);
        }
    }
}
