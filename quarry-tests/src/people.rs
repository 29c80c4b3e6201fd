use indoc::indoc;
use crate::silent_logs;
use quarry::{
    CardinalityError, Condition, Dao, Driver, Entity, Executor, NativeSql, Property, SqlWriter,
    stream::TryStreamExt,
};

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(table = "people")]
pub struct Person {
    #[quarry(id)]
    pub id: i64,
    pub full_name: String,
    pub age: i32,
    pub nickname: Option<String>,
    pub active: bool,
    #[quarry(ignore)]
    pub visits: u32,
}

async fn setup<E: Executor>(executor: &mut E) {
    executor
        .execute(
            indoc! {r#"
                DROP TABLE IF EXISTS people;
                CREATE TABLE people (
                    id INTEGER PRIMARY KEY,
                    full_name VARCHAR(64) NOT NULL,
                    age INTEGER NOT NULL,
                    nickname VARCHAR(64),
                    active INTEGER NOT NULL
                );
                INSERT INTO people (id, full_name, age, nickname, active) VALUES
                    (1, 'Albedo', 25, NULL, 1),
                    (2, 'Shalltear', 14, 'Vampire', 0),
                    (3, 'Demiurge', 30, 'Arch devil', 1),
                    (4, 'Cocytus', 2, NULL, 0);
            "#}
            .into(),
        )
        .await
        .expect("Failed to create the people table");
}

fn ids(people: &[Person]) -> Vec<i64> {
    people.iter().map(|v| v.id).collect()
}

pub async fn people<E: Executor>(executor: &mut E) {
    setup(executor).await;

    // Every row, in id order
    let everyone = Person::find_all_by(executor, Condition::NoCondition, &[Person::ID.asc()], None, None)
        .await
        .expect("Failed to load the people");
    assert_eq!(ids(&everyone), [1, 2, 3, 4]);
    let albedo = &everyone[0];
    assert_eq!(albedo.full_name, "Albedo");
    assert_eq!(albedo.age, 25);
    assert_eq!(albedo.nickname, None);
    assert!(albedo.active);
    assert_eq!(albedo.visits, 0);
    assert_eq!(everyone[2].nickname.as_deref(), Some("Arch devil"));

    // Inclusive range, in memory and in the database
    let young = Person::AGE.between(2, 25).and(Person::ID.eq(1));
    assert!(young.test(albedo).expect("Failed to evaluate between"));
    let found = Person::find_all_by(executor, young, &[], None, None)
        .await
        .expect("Failed to query between 2 and 25");
    assert_eq!(found, [albedo.clone()]);
    let younger = Person::AGE.between(2, 3).and(Person::ID.eq(1));
    assert!(!younger.test(albedo).expect("Failed to evaluate between"));
    let found = Person::find_all_by(executor, younger, &[], None, None)
        .await
        .expect("Failed to query between 2 and 3");
    assert!(found.is_empty());

    // The database and the in memory evaluation agree
    let conditions = [
        Person::AGE.gt(14),
        Person::AGE.le(14),
        Person::AGE.ne(25),
        Person::AGE.not_between(3, 25),
        Person::ID.is_in([1, 3]),
        Person::ID.not_in([1, 3]),
        Person::FULL_NAME.like("%ur%"),
        Person::FULL_NAME.like_ignore_case("a%"),
        Person::FULL_NAME.eq_ignore_case("ALBEDO"),
        Person::FULL_NAME.lower().eq("cocytus"),
        Person::NICKNAME.is_null(),
        Person::NICKNAME.is_not_null(),
        Person::NICKNAME
            .coalesce(Some("none".to_string()))
            .eq("none"),
        Person::ACTIVE.is_true(),
        Person::ACTIVE.is_false(),
        Person::ACTIVE.is(None),
        Person::AGE.lt(20).or(Person::ACTIVE.is_true()).not(),
        // Negations over a nullable column keep the rows where it is null
        Person::NICKNAME.eq("Vampire".to_string()).not(),
        Person::NICKNAME.not_in(["Vampire".to_string(), "Arch devil".to_string()]),
        Person::NICKNAME.like("%e%").or(Person::AGE.gt(20)).not(),
        Person::NICKNAME.is_null().not(),
        Person::AGE.cast_as_varchar().eq("30"),
    ];
    for condition in conditions {
        let expected = everyone
            .iter()
            .filter(|v| condition.test(*v).expect("Failed to evaluate the condition"))
            .map(|v| v.id)
            .collect::<Vec<_>>();
        let found = Person::find_all_by(executor, condition.clone(), &[Person::ID.asc()], None, None)
            .await
            .unwrap_or_else(|e| panic!("Failed to query {}: {:#}", condition, e));
        assert_eq!(ids(&found), expected, "Disagreement on {}", condition);
    }

    // Native sql spliced next to generated parameters
    let native = Condition::native(NativeSql::new("age > :min_age").bind("min_age", 20))
        .and(Person::ACTIVE.is_true());
    let found = Person::find_all_by(executor, native, &[Person::AGE.desc()], None, None)
        .await
        .expect("Failed to query with native sql");
    assert_eq!(ids(&found), [3, 1]);

    // Ordering and windows
    let page = Person::find_all_by(executor, Condition::NoCondition, &[Person::AGE.desc()], Some(1), Some(2))
        .await
        .expect("Failed to query a page");
    assert_eq!(ids(&page), [1, 2]);
    let tail = Person::find_all_by(executor, Condition::NoCondition, &[Person::AGE.desc()], Some(3), None)
        .await
        .expect("Failed to query the last page");
    assert_eq!(ids(&tail), [4]);
    let oldest = Person::find_first_by(executor, Condition::NoCondition, &[Person::AGE.desc()])
        .await
        .expect("Failed to query the oldest");
    assert_eq!(oldest.map(|v| v.id), Some(3));
    let nobody = Person::find_first_by(executor, Person::AGE.gt(100), &[Person::AGE.desc()])
        .await
        .expect("Failed to query the centenarians");
    assert_eq!(nobody, None);

    // Ids
    let demiurge = Person::find_by_id(executor, 3i64)
        .await
        .expect("Failed to find by id")
        .expect("Demiurge should exist");
    assert_eq!(demiurge.full_name, "Demiurge");
    let ghost = Person::find_by_id(executor, 99i64)
        .await
        .expect("Failed to find by id");
    assert_eq!(ghost, None);
    let error = Person::get_by_id(executor, 99i64)
        .await
        .expect_err("A missing id should be an error");
    let Some(CardinalityError::NoRow { entity, condition }) = error.downcast_ref() else {
        panic!("Expected a missing row, got: {:#}", error);
    };
    assert_eq!(entity, "Person");
    assert!(condition.contains("p1=99"), "{}", condition);
    assert!(
        error
            .to_string()
            .starts_with("no row matching Person: '"),
        "{}",
        error
    );

    // Cardinality
    let albedo_again = Person::single_by(executor, Person::FULL_NAME.eq("Albedo"))
        .await
        .expect("Failed to find Albedo");
    assert_eq!(albedo_again.id, 1);
    let mut result = None;
    silent_logs! {
        result = Some(Person::find_single_by(executor, Person::ACTIVE.is_true()).await);
    }
    let error = result
        .expect("The query did run")
        .expect_err("Two active people should be an error");
    assert!(matches!(
        error.downcast_ref(),
        Some(CardinalityError::TooManyRows { .. })
    ));

    // Counting
    assert_eq!(Person::count(executor).await.expect("Failed to count"), 4);
    assert_eq!(
        Person::count_by(executor, Person::NICKNAME.is_null())
            .await
            .expect("Failed to count"),
        2
    );
    assert!(
        Person::exists_by(executor, Person::FULL_NAME.eq("Cocytus"))
            .await
            .expect("Failed to check existence")
    );
    assert!(
        !Person::exists_by(executor, Person::FULL_NAME.eq("Momonga"))
            .await
            .expect("Failed to check existence")
    );

    // Rows fetched directly are rows too
    let sql = executor
        .driver()
        .sql_writer()
        .select(
            Person::meta().expect("Person metadata"),
            &Person::ID.eq(2),
            &[],
            None,
            None,
        )
        .expect("Failed to render the select");
    let query = executor
        .prepare_parametrized(&sql)
        .await
        .expect("Failed to prepare the select");
    let rows = executor
        .fetch(query)
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to fetch the rows");
    assert_eq!(rows.len(), 1);
    let nickname = Property::of::<Person>("nickname").expect("nickname is mapped");
    assert!(
        nickname
            .expression()
            .eq("Vampire")
            .test(&rows[0])
            .expect("Failed to evaluate on a row")
    );
}

pub async fn people_deletion<E: Executor>(executor: &mut E) {
    setup(executor).await;
    let deleted = Person::delete_by(executor, Person::AGE.lt(10))
        .await
        .expect("Failed to delete the children");
    assert_eq!(deleted.rows_affected, 1);
    assert_eq!(Person::count(executor).await.expect("Failed to count"), 3);
    let deleted = Person::delete_by_id(executor, 2i64)
        .await
        .expect("Failed to delete by id");
    assert_eq!(deleted.rows_affected, 1);
    let deleted = Person::delete_by_id(executor, 2i64)
        .await
        .expect("Failed to delete by id");
    assert_eq!(deleted.rows_affected, 0);
    let deleted = Person::delete_all(executor)
        .await
        .expect("Failed to delete everyone");
    assert_eq!(deleted.rows_affected, 2);
    assert!(
        Person::find_all(executor)
            .await
            .expect("Failed to load the people")
            .is_empty()
    );
}
