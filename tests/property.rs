mod resource {
    pub mod staff;
}

#[cfg(test)]
mod tests {
    use crate::resource::staff::{Employee, Shift};
    use quarry::{Order, OrderBy, Property, PropertyName};
    use std::collections::HashSet;

    fn properties() -> Vec<Property> {
        vec![
            Employee::ID.property(),
            Employee::FIRST_NAME.aliased("e"),
            Property::of::<Shift>("key.employee_id").unwrap(),
            Property::of::<Shift>("key.day").unwrap().aliased("s 1"),
            Shift::REMARK.property(),
            Property::new("My Entity", PropertyName::new("odd field.sub@part").unwrap()),
            Property::new("Ünïcode", PropertyName::new("naïve").unwrap()).aliased("a.b@c%d"),
        ]
    }

    #[test]
    fn external_string_round_trip() {
        for property in properties() {
            let external = property.to_external_string();
            assert_eq!(
                Property::from_external_string(&external).unwrap(),
                property,
                "{external}"
            );
            assert_eq!(external.parse::<Property>().unwrap(), property);
        }
    }

    #[test]
    fn external_string_format() {
        assert_eq!(
            Employee::ID.property().to_external_string(),
            "property::resource::staff::Employee.id"
        );
        assert_eq!(
            Employee::FIRST_NAME.aliased("e").to_external_string(),
            "property::resource::staff::Employee.first_name@e"
        );
        assert_eq!(
            Property::of::<Shift>("key.day")
                .unwrap()
                .aliased("s 1")
                .to_external_string(),
            "property::resource::staff::Shift.key.day@s%201"
        );
        assert_eq!(
            Shift::REMARK.property().to_external_string(),
            "property::resource::staff::Shift._remark"
        );
        assert_eq!(
            Property::new("a.b::C", PropertyName::new("x").unwrap()).to_external_string(),
            "a%2Eb::C.x"
        );
    }

    #[test]
    fn serde_round_trip() {
        for property in properties() {
            let json = serde_json::to_string(&property).unwrap();
            assert_eq!(
                json,
                serde_json::to_string(&property.to_external_string()).unwrap()
            );
            let back: Property = serde_json::from_str(&json).unwrap();
            assert_eq!(back, property);
        }
        let order = vec![Employee::AGE.desc(), Employee::FIRST_NAME.asc()];
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"[{"property":"property::resource::staff::Employee.age","order":"Desc"},{"property":"property::resource::staff::Employee.first_name","order":"Asc"}]"#
        );
        let back: Vec<OrderBy> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
        assert!(serde_json::from_str::<Property>(r#""Employee""#).is_err());
    }

    #[test]
    fn value_semantics() {
        let mut set = HashSet::new();
        assert!(set.insert(Employee::AGE.property()));
        assert!(!set.insert(Property::of::<Employee>("age").unwrap()));
        assert!(set.insert(Employee::AGE.aliased("e")));
        assert!(set.insert(Employee::SALARY.property()));
        assert_eq!(set.len(), 3);
        assert_eq!(Employee::AGE.aliased("e").unaliased(), Employee::AGE.property());
        assert_eq!(Employee::AGE.aliased("e").alias(), Some("e"));
        assert_eq!(Property::from(Employee::AGE), Employee::AGE.property());
    }

    #[test]
    fn order_by() {
        let order = Employee::AGE.desc();
        assert_eq!(order.order, Order::Desc);
        assert_eq!(order.to_string(), "Employee.age DESC");
        assert_eq!(OrderBy::asc(Employee::ID.property()), Employee::ID.asc());
        assert_eq!(Employee::ID.property().asc().to_string(), "Employee.id ASC");
        assert_eq!(Order::default(), Order::Asc);
    }
}
