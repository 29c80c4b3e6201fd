use indoc::indoc;
use quarry::{Condition, Dao, Entity, Executor};

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(table = "articles")]
pub struct Article {
    #[quarry(id)]
    pub id: i64,
    pub body: String,
}

pub async fn articles<E: Executor>(executor: &mut E) {
    executor
        .execute(
            indoc! {r#"
                DROP TABLE IF EXISTS articles;
                CREATE TABLE articles (
                    id INTEGER PRIMARY KEY,
                    body VARCHAR(255) NOT NULL
                );
                INSERT INTO articles (id, body) VALUES
                    (1, 'The fat cat sat on the mat'),
                    (2, 'A lean dog'),
                    (3, 'FAT dogs chase cats');
            "#}
            .into(),
        )
        .await
        .expect("Failed to create the articles table");
    let everything = Article::find_all_by(executor, Condition::NoCondition, &[Article::ID.asc()], None, None)
        .await
        .expect("Failed to load the articles");
    for (query, expected) in [
        ("fat cat", vec![1, 3]),
        ("Dog", vec![2, 3]),
        ("lean dog", vec![2]),
        ("unicorn", vec![]),
    ] {
        let condition = Article::BODY.full_text_matches(query);
        let in_memory = everything
            .iter()
            .filter(|v| condition.test(*v).expect("Failed to evaluate full text"))
            .map(|v| v.id)
            .collect::<Vec<_>>();
        assert_eq!(in_memory, expected, "In memory search of `{}`", query);
        let found = Article::find_all_by(executor, condition, &[Article::ID.asc()], None, None)
            .await
            .expect("Failed to search the articles");
        assert_eq!(
            found.iter().map(|v| v.id).collect::<Vec<_>>(),
            expected,
            "Search of `{}`",
            query
        );
    }
    assert_eq!(Article::BODY.full_text_matches("  "), Condition::NoCondition);
}
