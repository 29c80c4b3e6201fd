mod resource {
    pub mod staff;
}

#[cfg(test)]
mod tests {
    use crate::resource::staff::{Employee, Shift};
    use quarry::{
        Condition, Entity, EntityMeta, GenericSqlWriter, MssqlSqlWriter, ParametrizedSql,
        SqlWriter,
    };
    use std::{sync::Barrier, thread};

    const THREADS: usize = 16;

    fn condition() -> Condition {
        (Employee::AGE.between(18, 65) | Employee::FIRST_NAME.like_ignore_case("a%"))
            & Employee::ID.not_in([3, 4])
            & !Employee::RETIRED.is_true()
    }

    /// Runs `f` on many threads released together, returns every result.
    fn together<T: Send>(f: impl Fn() -> T + Sync) -> Vec<T> {
        let barrier = Barrier::new(THREADS);
        thread::scope(|scope| {
            let handles = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        f()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|v| v.join().expect("Worker thread panicked"))
                .collect()
        })
    }

    #[test]
    fn meta_is_built_once() {
        // Shift is not touched by any other test of this binary, the first access races here
        let metas = together(|| {
            (
                Shift::meta().unwrap() as *const EntityMeta as usize,
                EntityMeta::by_name("Shift").unwrap() as *const EntityMeta as usize,
                Employee::meta().unwrap() as *const EntityMeta as usize,
            )
        });
        let first = metas[0];
        assert!(metas.iter().all(|v| *v == first));
        assert_eq!(first.0, first.1);
        assert!(std::ptr::eq(Shift::meta().unwrap(), first.0 as *const EntityMeta));
        assert!(std::ptr::eq(Employee::meta().unwrap(), first.2 as *const EntityMeta));
    }

    #[test]
    fn same_tree_same_output() {
        let condition = condition();
        let expected: (ParametrizedSql, ParametrizedSql) = (
            GenericSqlWriter::new().render(&condition).unwrap(),
            MssqlSqlWriter::new().render(&condition).unwrap(),
        );
        let employees = [
            Employee::new(1, "Ainz", Some(41), 1200.5, false),
            Employee::new(2, "Albedo", None, 900.0, true),
            Employee::new(5, "Aura", Some(12), 10.0, false),
        ];
        let results = together(|| {
            let rendered = (
                GenericSqlWriter::new().render(&condition).unwrap(),
                MssqlSqlWriter::new().render(&condition).unwrap(),
            );
            let matching = employees
                .iter()
                .filter(|v| condition.test(*v).unwrap())
                .map(|v| v.id)
                .collect::<Vec<_>>();
            (rendered, matching)
        });
        for (rendered, matching) in results {
            assert_eq!(rendered, expected);
            assert_eq!(matching, [1, 5]);
        }
    }
}
