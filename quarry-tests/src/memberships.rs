use indoc::indoc;
use quarry::{
    Condition, ConfigurationError, Dao, Driver, Embeddable, Entity, EntityMeta, Executor, Property,
    SqlWriter, Value,
};

#[derive(Embeddable, Debug, Clone, PartialEq)]
pub struct MembershipId {
    pub person_id: i64,
    pub department_id: i64,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(table = "memberships")]
pub struct Membership {
    #[quarry(id, embedded)]
    pub id: MembershipId,
    #[quarry(column = "role_name")]
    pub role: String,
}

pub async fn memberships<E: Executor>(executor: &mut E) {
    executor
        .execute(
            indoc! {r#"
                DROP TABLE IF EXISTS memberships;
                CREATE TABLE memberships (
                    person_id INTEGER NOT NULL,
                    department_id INTEGER NOT NULL,
                    role_name VARCHAR(64) NOT NULL,
                    PRIMARY KEY (person_id, department_id)
                );
                INSERT INTO memberships (person_id, department_id, role_name) VALUES
                    (1, 1, 'Overseer'),
                    (1, 2, 'Guardian'),
                    (2, 1, 'Floor guardian');
            "#}
            .into(),
        )
        .await
        .expect("Failed to create the memberships table");

    let meta = Membership::meta().expect("Membership metadata");
    assert_eq!(meta.table_name(), "memberships");
    assert_eq!(
        meta.id_properties()
            .map(|v| v.property.name().to_string())
            .collect::<Vec<_>>(),
        ["id.person_id", "id.department_id"]
    );
    assert!(std::ptr::eq(
        meta,
        EntityMeta::by_name("Membership").expect("Membership is registered")
    ));

    // The id chain
    let person_id = Property::of::<Membership>("id.person_id").expect("id.person_id is mapped");
    let department_id =
        Property::of::<Membership>("id.department_id").expect("id.department_id is mapped");
    let condition = meta
        .id_condition((1i64, 2i64))
        .expect("Failed to build the id condition");
    assert_eq!(
        condition,
        Condition::NoCondition
            .and(person_id.expression().eq(1i64))
            .and(department_id.expression().eq(2i64))
    );
    let sql = executor
        .driver()
        .sql_writer()
        .render(&condition)
        .expect("Failed to render the id condition");
    assert_eq!(sql.parameters.len(), 2);
    assert_eq!(sql.parameters.get("p1"), Some(&Value::Int64(Some(1))));
    assert_eq!(sql.parameters.get("p2"), Some(&Value::Int64(Some(2))));
    let error = meta
        .id_condition(1i64)
        .expect_err("A single value is not a composite id");
    assert!(matches!(
        error.downcast_ref(),
        Some(ConfigurationError::IdArity {
            expected: 2,
            actual: 1,
            ..
        })
    ));

    // Finders
    let guardian = Membership::get_by_id(executor, (1i64, 2i64))
        .await
        .expect("Failed to get the membership");
    assert_eq!(
        guardian,
        Membership {
            id: MembershipId {
                person_id: 1,
                department_id: 2,
            },
            role: "Guardian".into(),
        }
    );
    assert!(condition.test(&guardian).expect("Failed to evaluate"));
    let missing = Membership::find_by_id(executor, (2i64, 2i64))
        .await
        .expect("Failed to find the membership");
    assert_eq!(missing, None);
    let first_floor = Membership::find_all_by(
        executor,
        department_id.expression().eq(1i64),
        &[person_id.desc()],
        None,
        None,
    )
    .await
    .expect("Failed to find the first department");
    assert_eq!(
        first_floor.iter().map(|v| v.role.as_str()).collect::<Vec<_>>(),
        ["Floor guardian", "Overseer"]
    );

    // Deletion by composite id
    let deleted = Membership::delete_by_id(executor, (1i64, 1i64))
        .await
        .expect("Failed to delete the membership");
    assert_eq!(deleted.rows_affected, 1);
    assert_eq!(Membership::count(executor).await.expect("Failed to count"), 2);
}
