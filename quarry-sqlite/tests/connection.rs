#[cfg(test)]
mod tests {
    use quarry_core::{
        AsValue, Connection, DatabaseVariant, Executor, Prepared, Query, QueryResult, Value,
        stream::{StreamExt, TryStreamExt},
    };
    use quarry_sqlite::{SqliteConnection, SqliteDriver};
    use quarry_tests::{init_logs, silent_logs};
    use std::{collections::BTreeMap, path::Path, pin::pin, sync::Mutex, thread};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn concurrent_detection() {
        init_logs();
        let detected = thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| scope.spawn(|| DatabaseVariant::detect(&SqliteDriver::new())))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|v| v.join().expect("Detection thread panicked"))
                .collect::<Vec<_>>()
        });
        assert!(detected.iter().all(|v| *v == DatabaseVariant::Sqlite));
        assert_eq!(DatabaseVariant::current(), DatabaseVariant::Sqlite);
    }

    #[tokio::test]
    async fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .await
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .await
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
            assert!(
                SqliteConnection::connect("postgres://localhost/db").await.is_err(),
                "Should refuse urls of other drivers"
            );
        }
        assert_eq!(DatabaseVariant::current(), DatabaseVariant::Sqlite);
    }

    #[tokio::test]
    async fn raw_statements() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let affected = connection
            .execute(
                "CREATE TABLE numbers (n INTEGER);
                -- two rows
                INSERT INTO numbers VALUES (1), (2);
                DROP TABLE IF EXISTS missing;
                UPDATE numbers SET n = n * 10 WHERE n = 2;"
                    .into(),
            )
            .await
            .expect("Failed to run the statements");
        assert_eq!(affected.rows_affected, 3);
        let rows = connection
            .fetch("SELECT n, n || 'x' AS label, NULL AS empty FROM numbers ORDER BY n".into())
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to fetch the numbers");
        assert_eq!(rows.len(), 2);
        assert_eq!(&*rows[0].labels, ["n", "label", "empty"]);
        assert_eq!(rows[0].values[0], Value::Int64(Some(1)));
        assert_eq!(rows[1].get_column("label"), Some(&Value::from("20x")));
        assert_eq!(rows[1].get_column("empty"), Some(&Value::Null));
        silent_logs! {
            let mut results = pin!(connection.run("SELECT * FROM missing".into()));
            assert!(matches!(results.next().await, Some(Err(..))));
        }
    }

    #[tokio::test]
    async fn named_parameters() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let Query::Prepared(mut prepared) = connection
            .prepare("SELECT :a + :b AS total, :name AS name".into())
            .await
            .expect("Failed to prepare the query")
        else {
            panic!("Expected a prepared query");
        };
        let mut parameters = BTreeMap::new();
        parameters.insert("a".to_string(), 1.as_value());
        parameters.insert("b".to_string(), 2.5.as_value());
        parameters.insert("name".to_string(), Value::from("Albedo"));
        prepared
            .bind_parameters(&parameters)
            .expect("Failed to bind the parameters");
        assert!(prepared.to_string().contains(":a + :b"));
        silent_logs! {
            assert!(prepared.bind_named("missing", Value::Null).is_err());
        }
        let rows = connection
            .fetch(Query::Prepared(prepared))
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to run the query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_column("total"), Some(&Value::Float64(Some(3.5))));
        assert_eq!(rows[0].get_column("name"), Some(&Value::from("Albedo")));
    }

    #[tokio::test]
    async fn positional_parameters() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let mut query = connection
            .prepare("SELECT ?, ?".into())
            .await
            .expect("Failed to prepare the query");
        query
            .bind(true)
            .and_then(|v| v.bind("second".to_string()))
            .expect("Failed to bind the parameters");
        assert!(query.bind(3).is_err());
        let row = connection
            .fetch(query)
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to run the query")
            .pop()
            .expect("One row");
        assert_eq!(row.values[0], Value::Int64(Some(1)));
        assert_eq!(bool::try_from_value(row.values[0].clone()).unwrap(), true);
        assert_eq!(row.values[1], Value::from("second"));
        silent_logs! {
            assert!(
                connection.prepare("SELECT 1; SELECT 2".into()).await.is_err(),
                "Only one statement can be prepared"
            );
        }
    }
}
