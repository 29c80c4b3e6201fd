use crate::Property;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// One term of an `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub property: Property,
    pub order: Order,
}

impl OrderBy {
    pub fn new(property: Property, order: Order) -> Self {
        Self { property, order }
    }
    pub fn asc(property: Property) -> Self {
        Self::new(property, Order::Asc)
    }
    pub fn desc(property: Property) -> Self {
        Self::new(property, Order::Desc)
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.property, self.order.sql())
    }
}
